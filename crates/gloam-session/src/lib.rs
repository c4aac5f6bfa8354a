//! Interaction controller: the mode state machine, click disambiguation,
//! drag lifecycles, and the per-frame fog refresh.
//!
//! All mutation flows through here synchronously. Input handlers either act
//! immediately (drags) or emit intents into the event queue; `step` fires any
//! matured click burst, drains the queue, and rebuilds the live fog frame
//! while the session is in play mode. The refresh is cancelled by the mode
//! check itself: no tick runs once the mode moves away from play.
#![forbid(unsafe_code)]

mod click;
mod config;
mod event;

pub use click::{CLICK_WINDOW_SECS, ClickArbiter, ClickBurst};
pub use config::SessionConfig;
pub use event::{Event, EventEnvelope, EventQueue};

use std::error::Error;

use gloam_fog::FogField;
use gloam_geom::Vec2;
use gloam_map::{CharKind, CharacterId, MapState, Mode, PICK_RADIUS, VertexHandle, Wall};

/// Persistence seam. The session pushes wall mutations out through this
/// trait; the io crate supplies the JSON-file implementation, tests supply
/// recording stubs.
pub trait WallStore {
    fn save(&mut self, walls: &[Wall]);
    fn clear(&mut self);
}

/// Store for sessions without a backing file.
#[derive(Default)]
pub struct NullWallStore;

impl WallStore for NullWallStore {
    fn save(&mut self, _walls: &[Wall]) {}
    fn clear(&mut self) {}
}

enum DragState {
    Idle,
    Vertex { handle: VertexHandle, offset: Vec2 },
    Character { id: CharacterId, offset: Vec2 },
}

pub struct Session {
    pub map: MapState,
    pub config: SessionConfig,
    fog: Option<FogField>,
    surface: Option<(u32, u32)>,
    queue: EventQueue,
    clicks: ClickArbiter,
    drag: DragState,
    store: Box<dyn WallStore>,
    status: String,
}

impl Session {
    pub fn new(config: SessionConfig, store: Box<dyn WallStore>) -> Self {
        Self {
            map: MapState::new(),
            config,
            fog: None,
            surface: None,
            queue: EventQueue::new(),
            clicks: ClickArbiter::new(),
            drag: DragState::Idle,
            store,
            status: String::from("Load a map to begin."),
        }
    }

    /// Size the fog and wall coordinate space to the displayed map. Rejects
    /// zero dimensions (image not laid out yet); wall and fog operations
    /// require an attached surface.
    pub fn attach_surface(&mut self, w: u32, h: u32) -> Result<(), Box<dyn Error>> {
        if w == 0 || h == 0 {
            return Err(format!("map surface has zero area ({w}x{h})").into());
        }
        self.config.fit_grid_to_surface(w, h);
        self.surface = Some((w, h));
        self.fog = Some(FogField::new(w, h));
        self.map.reset_for_new_map();
        self.drag = DragState::Idle;
        self.clicks.reset();
        log::info!(
            "surface attached: {}x{} px, {:.2} px/ft",
            w,
            h,
            self.config.grid_px_per_ft
        );
        self.set_status("Map loaded. You can now edit walls or start playing.");
        Ok(())
    }

    #[inline]
    pub fn surface(&self) -> Option<(u32, u32)> {
        self.surface
    }

    #[inline]
    pub fn fog(&self) -> Option<&FogField> {
        self.fog.as_ref()
    }

    #[inline]
    pub fn status(&self) -> &str {
        &self.status
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
        log::info!(target: "status", "{}", self.status);
    }

    /// Install walls loaded from storage or import.
    pub fn install_walls(&mut self, walls: Vec<Wall>) {
        let n = walls.len();
        self.map.install_walls(walls);
        if n > 0 {
            self.set_status(format!("Map has {n} saved walls."));
        }
    }

    pub fn set_sight_radius(&mut self, feet: f32) {
        self.config.sight_radius_ft = feet;
        self.set_status(format!("Sight radius set to {feet} ft."));
    }

    #[inline]
    fn reveal_radius(&self) -> f32 {
        self.config.reveal_radius()
    }

    // ---- input surface (called by the windowing layer) ----

    pub fn request_mode(&mut self, mode: Mode) {
        self.queue.emit(Event::ModeSet { mode });
    }

    pub fn request_fog_reset(&mut self) {
        self.queue.emit(Event::FogResetRequested);
    }

    pub fn request_clear_walls(&mut self) {
        self.queue.emit(Event::WallsClearRequested);
    }

    pub fn key_delete_pressed(&mut self) {
        self.queue.emit(Event::DeletePressed);
    }

    /// Press begins a drag when it lands on a draggable target (a vertex in
    /// edit mode, a PC in play mode); the offset keeps the dragged point at
    /// its pointer-relative position.
    pub fn pointer_pressed(&mut self, x: f32, y: f32) {
        let p = Vec2::new(x, y);
        match self.map.mode() {
            Mode::EditWalls => {
                if let Some(handle) = self.map.find_vertex_near(p, PICK_RADIUS) {
                    self.map.selected_vertex = Some(handle);
                    if let Some(vpos) = self.map.vertex_pos(handle) {
                        self.drag = DragState::Vertex {
                            handle,
                            offset: p - vpos,
                        };
                    }
                }
            }
            Mode::Play => {
                if let Some(id) = self.map.find_pc_near(p, PICK_RADIUS) {
                    self.map.selected_pc = Some(id);
                    if let Some(c) = self.map.character(id) {
                        self.drag = DragState::Character {
                            id,
                            offset: p - c.pos,
                        };
                    }
                }
            }
            Mode::View => {}
        }
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let p = Vec2::new(x, y);
        match self.drag {
            DragState::Idle => {}
            DragState::Vertex { handle, offset } => {
                self.map.set_vertex(handle, p - offset);
            }
            DragState::Character { id, offset } => {
                let pos = p - offset;
                if self.map.set_character_pos(id, pos) {
                    // Exploration is durable: every move commits a permanent
                    // reveal; the frame refresh supplies the ephemeral one.
                    let radius = self.reveal_radius();
                    if let Some(fog) = self.fog.as_mut() {
                        fog.reveal_permanent(self.map.walls(), pos, radius);
                    }
                }
            }
        }
    }

    /// Release either ends a drag (persisting walls when a vertex moved) or
    /// counts as a click for the burst arbiter.
    pub fn pointer_released(&mut self, x: f32, y: f32, now: f64) {
        match std::mem::replace(&mut self.drag, DragState::Idle) {
            DragState::Vertex { .. } => {
                self.store.save(self.map.walls());
                self.set_status("Vertex moved. Walls saved.");
            }
            DragState::Character { .. } => {
                self.set_status("PC moved. Fog cleared along its new line of sight.");
            }
            DragState::Idle => {
                if matches!(self.map.mode(), Mode::EditWalls | Mode::Play) {
                    self.clicks.click(x, y, now);
                }
            }
        }
    }

    /// One controller tick: fire matured click bursts, drain queued intents,
    /// then refresh the live fog frame while in play mode.
    pub fn step(&mut self, now: f64) {
        if let Some(burst) = self.clicks.poll(now) {
            match self.map.mode() {
                Mode::EditWalls => {
                    if burst.count == 1 {
                        self.queue.emit(Event::EditClicked {
                            x: burst.x,
                            y: burst.y,
                        });
                    } else {
                        self.queue.emit(Event::WallFinishRequested {
                            x: burst.x,
                            y: burst.y,
                        });
                    }
                }
                Mode::Play => {
                    self.queue.emit(Event::PlayBurst {
                        x: burst.x,
                        y: burst.y,
                        count: burst.count,
                    });
                }
                Mode::View => {}
            }
        }

        while let Some(env) = self.queue.pop() {
            log::debug!(target: "events", "handle {} id={}", env.kind.label(), env.id);
            self.handle_event(env.kind);
        }

        // The only recurring task; self-cancels by mode.
        if self.map.mode() == Mode::Play {
            let radius = self.reveal_radius();
            if let Some(fog) = self.fog.as_mut() {
                fog.begin_frame();
                for pc in self.map.pcs() {
                    fog.reveal_ephemeral(self.map.walls(), pc.pos, radius);
                }
                fog.refresh_live();
            }
        }
    }

    fn handle_event(&mut self, kind: Event) {
        match kind {
            Event::ModeSet { mode } => {
                self.set_mode(mode);
            }
            Event::EditClicked { x, y } => {
                self.edit_click(Vec2::new(x, y));
            }
            Event::WallFinishRequested { x, y } => {
                self.finish_wall(Vec2::new(x, y));
            }
            Event::PlayBurst { x, y, count } => {
                self.play_burst(Vec2::new(x, y), count);
            }
            Event::DeletePressed => {
                self.delete_selected_wall();
            }
            Event::WallsClearRequested => {
                self.clear_walls();
            }
            Event::FogResetRequested => {
                self.reset_fog();
            }
        }
    }

    // ---- mode state machine ----

    /// Any mode is reachable from any other; transitions run the entry/exit
    /// actions. Re-entering play re-initializes fog from scratch.
    pub fn set_mode(&mut self, next: Mode) -> bool {
        if next == Mode::Play && self.fog.is_none() {
            self.set_status("Load a map before starting play mode.");
            return false;
        }
        let prev = self.map.mode();
        if prev == Mode::EditWalls && next != Mode::EditWalls {
            // Exiting edit discards the draft and the vertex selection.
            self.map.discard_draft();
            self.map.selected_vertex = None;
        }
        self.drag = DragState::Idle;
        self.clicks.reset();
        self.map.set_mode(next);
        match next {
            Mode::View => {
                self.set_status("View mode.");
            }
            Mode::EditWalls => {
                self.map.selected_vertex = None;
                self.map.selected_pc = None;
                self.set_status(
                    "Edit mode: click to place vertices, double-click to finish, \
                     select a vertex and press Delete to remove its wall.",
                );
            }
            Mode::Play => {
                self.map.selected_vertex = None;
                let radius = self.reveal_radius();
                let pcs = self.map.pc_positions();
                if let Some(fog) = self.fog.as_mut() {
                    fog.initialize(self.map.walls(), &pcs, radius);
                }
                self.set_status(
                    "Play mode: click to select a PC, double-click for a new PC, \
                     triple-click for an NPC.",
                );
            }
        }
        log::info!("mode {:?} -> {:?}", prev, next);
        true
    }

    // ---- wall editing (legal only in edit mode) ----

    /// Single click on the wall surface: select a vertex if one is under the
    /// pointer, otherwise extend (or start) the draft wall.
    pub fn edit_click(&mut self, p: Vec2) -> bool {
        if self.map.mode() != Mode::EditWalls {
            self.set_status("Wall editing is only available in edit mode.");
            return false;
        }
        if let Some(handle) = self.map.find_vertex_near(p, PICK_RADIUS) {
            self.map.selected_vertex = Some(handle);
            self.set_status("Vertex selected. Drag to move, press Delete to remove its wall.");
            return true;
        }
        self.map.selected_vertex = None;
        let n = self.map.push_draft_vertex(p);
        if n == 1 {
            self.set_status("Started a new wall. Double-click to finish.");
        } else {
            self.set_status(format!("Wall has {n} vertices. Double-click to finish."));
        }
        true
    }

    /// Double click: append the final vertex and commit the draft.
    pub fn finish_wall(&mut self, p: Vec2) -> bool {
        if self.map.mode() != Mode::EditWalls {
            self.set_status("Wall editing is only available in edit mode.");
            return false;
        }
        if self.map.finish_draft(p).is_none() {
            self.set_status("No wall in progress.");
            return false;
        }
        self.store.save(self.map.walls());
        self.set_status("Wall completed. Click to start a new wall.");
        true
    }

    /// Deleting a selected vertex removes the whole wall that owns it.
    pub fn delete_selected_wall(&mut self) -> bool {
        if self.map.mode() != Mode::EditWalls {
            self.set_status("Wall deletion is only available in edit mode.");
            return false;
        }
        let Some(handle) = self.map.selected_vertex.take() else {
            return false;
        };
        if !self.map.remove_wall_containing(handle) {
            return false;
        }
        self.store.save(self.map.walls());
        self.set_status("Wall deleted.");
        true
    }

    /// Clear-all is reachable from any mode, matching the dedicated button.
    pub fn clear_walls(&mut self) {
        self.map.clear_all_walls();
        self.store.clear();
        self.set_status("All walls cleared and removed from storage.");
    }

    // ---- play mode (characters and fog) ----

    /// Resolved click burst on the play surface, classified by final count.
    pub fn play_burst(&mut self, p: Vec2, count: u32) -> bool {
        if self.map.mode() != Mode::Play {
            self.set_status("Characters are only available in play mode.");
            return false;
        }
        match count {
            1 => {
                match self.map.find_pc_near(p, PICK_RADIUS) {
                    Some(id) => {
                        self.map.selected_pc = Some(id);
                        self.set_status("PC selected. Drag to move.");
                    }
                    None => {
                        self.map.selected_pc = None;
                        self.set_status(
                            "No PC here. Double-click for a new PC, triple-click for an NPC.",
                        );
                    }
                }
                true
            }
            2 => {
                let id = self.map.add_character(CharKind::Pc, p);
                self.map.selected_pc = Some(id);
                let radius = self.reveal_radius();
                if let Some(fog) = self.fog.as_mut() {
                    fog.reveal_permanent(self.map.walls(), p, radius);
                }
                self.set_status(format!(
                    "New PC created; it sees {} ft around it.",
                    self.config.sight_radius_ft
                ));
                true
            }
            3 => {
                self.map.add_character(CharKind::Npc, p);
                self.set_status("New NPC created. NPCs do not affect fog.");
                true
            }
            _ => false,
        }
    }

    /// Drop all accumulated exploration, keeping only what current PCs see.
    pub fn reset_fog(&mut self) -> bool {
        if self.map.mode() != Mode::Play {
            self.set_status("Fog reset only works in play mode.");
            return false;
        }
        let radius = self.reveal_radius();
        let pcs = self.map.pc_positions();
        if let Some(fog) = self.fog.as_mut() {
            fog.reset_to_current_pcs(self.map.walls(), &pcs, radius);
        }
        self.set_status("Fog reset. Only current PC sight areas remain clear.");
        true
    }
}
