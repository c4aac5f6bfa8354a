use raylib::prelude::*;

use super::App;
use gloam_map::Mode;

impl App {
    /// One frame of input translation and session work. Runs before drawing
    /// so the fog texture upload happens outside the draw pass.
    pub fn step(&mut self, rl: &mut RaylibHandle) {
        let now = rl.get_time();
        let mouse = rl.get_mouse_position();

        // Mode keys.
        if rl.is_key_pressed(KeyboardKey::KEY_V) {
            self.session.request_mode(Mode::View);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_E) {
            self.session.request_mode(Mode::EditWalls);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_P) {
            self.session.request_mode(Mode::Play);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_R) {
            self.session.request_fog_reset();
        }
        if rl.is_key_pressed(KeyboardKey::KEY_C) {
            self.session.request_clear_walls();
        }
        if rl.is_key_pressed(KeyboardKey::KEY_DELETE)
            || rl.is_key_pressed(KeyboardKey::KEY_BACKSPACE)
        {
            self.session.key_delete_pressed();
        }
        if rl.is_key_pressed(KeyboardKey::KEY_X) {
            self.export_walls();
        }

        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            self.session.pointer_pressed(mouse.x, mouse.y);
        }
        if mouse != self.last_mouse {
            self.session.pointer_moved(mouse.x, mouse.y);
            self.last_mouse = mouse;
        }
        if rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT) {
            self.session.pointer_released(mouse.x, mouse.y, now);
        }

        self.session.step(now);

        if self.session.map.mode() == Mode::Play {
            self.upload_fog(now);
        }
    }

    /// Rebuild the RGBA fog pixels from the live bitmask and push them to the
    /// GPU texture. Hidden cells get a slow alpha shimmer so the fog reads as
    /// a layer rather than a hole in the map.
    fn upload_fog(&mut self, now: f64) {
        let Self {
            session,
            fog_tex,
            fog_pixels,
            width,
            height,
            ..
        } = self;
        let Some(fog) = session.fog() else {
            return;
        };
        let live = fog.live();
        let shimmer = (now * 1.3).sin() as f32;
        let hidden_alpha = (225.0 + 12.0 * shimmer) as u8;
        let w = *width as usize;
        for y in 0..*height {
            for x in 0..*width {
                let i = (y as usize * w + x as usize) * 4;
                fog_pixels[i] = 0;
                fog_pixels[i + 1] = 0;
                fog_pixels[i + 2] = 0;
                fog_pixels[i + 3] = if live.revealed(x, y) { 0 } else { hidden_alpha };
            }
        }
        let _ = fog_tex.update_texture(fog_pixels);
    }

    fn export_walls(&mut self) {
        let out = self.walls_path.with_extension("export.json");
        match gloam_io::export_walls(self.session.map.walls()) {
            Ok(json) => match std::fs::write(&out, json) {
                Ok(()) => log::info!("exported walls to {}", out.display()),
                Err(e) => log::error!("wall export to {} failed: {}", out.display(), e),
            },
            Err(e) => log::error!("wall export failed: {}", e),
        }
    }
}
