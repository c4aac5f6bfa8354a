use raylib::prelude::*;

use super::App;
use gloam_map::{CharKind, Mode, VertexHandle, VertexOwner};

const WALL_THICKNESS: f32 = 3.0;
const HANDLE_RADIUS: f32 = 6.0;
const TOKEN_RADIUS: f32 = 10.0;

impl App {
    pub fn render(&self, d: &mut RaylibDrawHandle) {
        d.clear_background(Color::BLACK);
        d.draw_texture(&self.map_tex, 0, 0, Color::WHITE);

        match self.session.map.mode() {
            Mode::View => {}
            Mode::EditWalls => self.render_walls(d),
            Mode::Play => {
                d.draw_texture(&self.fog_tex, 0, 0, Color::WHITE);
                self.render_characters(d);
            }
        }

        self.render_status_bar(d);
    }

    /// Wall overlay: committed polylines, the draft with a preview segment to
    /// the cursor, and a handle on every vertex.
    fn render_walls(&self, d: &mut RaylibDrawHandle) {
        for wall in self.session.map.walls() {
            for seg in wall.vertices.windows(2) {
                d.draw_line_ex(
                    Vector2::new(seg[0].x, seg[0].y),
                    Vector2::new(seg[1].x, seg[1].y),
                    WALL_THICKNESS,
                    Color::RED,
                );
            }
            for (i, v) in wall.vertices.iter().enumerate() {
                let handle = VertexHandle {
                    owner: VertexOwner::Wall(wall.id),
                    index: i,
                };
                self.render_handle(d, v.x, v.y, handle);
            }
        }

        if let Some(draft) = self.session.map.draft() {
            for seg in draft.vertices.windows(2) {
                d.draw_line_ex(
                    Vector2::new(seg[0].x, seg[0].y),
                    Vector2::new(seg[1].x, seg[1].y),
                    WALL_THICKNESS,
                    Color::ORANGE,
                );
            }
            if let Some(last) = draft.vertices.last() {
                d.draw_line_ex(
                    Vector2::new(last.x, last.y),
                    self.last_mouse,
                    1.0,
                    Color::ORANGE,
                );
            }
            for (i, v) in draft.vertices.iter().enumerate() {
                let handle = VertexHandle {
                    owner: VertexOwner::Draft,
                    index: i,
                };
                self.render_handle(d, v.x, v.y, handle);
            }
        }
    }

    fn render_handle(&self, d: &mut RaylibDrawHandle, x: f32, y: f32, handle: VertexHandle) {
        let selected = self.session.map.selected_vertex == Some(handle);
        let fill = if selected { Color::YELLOW } else { Color::WHITE };
        d.draw_circle_v(Vector2::new(x, y), HANDLE_RADIUS, fill);
        d.draw_circle_lines(x as i32, y as i32, HANDLE_RADIUS, Color::MAROON);
    }

    /// Tokens stay visible above the fog; this is the table-master's view.
    fn render_characters(&self, d: &mut RaylibDrawHandle) {
        for c in self.session.map.characters() {
            let center = Vector2::new(c.pos.x, c.pos.y);
            let fill = match c.kind {
                CharKind::Pc => Color::ROYALBLUE,
                CharKind::Npc => Color::CRIMSON,
            };
            d.draw_circle_v(center, TOKEN_RADIUS, fill);
            d.draw_circle_lines(c.pos.x as i32, c.pos.y as i32, TOKEN_RADIUS, Color::WHITE);
            if self.session.map.selected_pc == Some(c.id) {
                d.draw_circle_lines(
                    c.pos.x as i32,
                    c.pos.y as i32,
                    TOKEN_RADIUS + 4.0,
                    Color::YELLOW,
                );
            }
        }
    }

    fn render_status_bar(&self, d: &mut RaylibDrawHandle) {
        let bar_h = 26;
        let y = self.height - bar_h;
        d.draw_rectangle(0, y, self.width, bar_h, Color::new(0, 0, 0, 180));
        let mode = match self.session.map.mode() {
            Mode::View => "VIEW",
            Mode::EditWalls => "EDIT",
            Mode::Play => "PLAY",
        };
        d.draw_text(mode, 8, y + 6, 14, Color::GOLD);
        d.draw_text(self.session.status(), 70, y + 6, 14, Color::RAYWHITE);
        if self.session.map.mode() == Mode::View {
            let hints = "E edit walls  P play  R reset fog  C clear walls  X export";
            let w = measure_text(hints, 14);
            d.draw_text(hints, self.width - w - 8, y + 6, 14, Color::LIGHTGRAY);
        }
    }
}
