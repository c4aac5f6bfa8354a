//! Map model: wall polylines, characters, interaction mode, hit-testing.
//!
//! Walls and vertices are addressed by stable handles (wall id + vertex
//! index) rather than references, so the session layer can hold a selection
//! across frames while the owning collections move around.
#![forbid(unsafe_code)]

use gloam_geom::Vec2;

/// Hit-test radius for vertex and character picking, in display pixels.
pub const PICK_RADIUS: f32 = 15.0;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct WallId(pub u64);

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CharacterId(pub u64);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Mode {
    #[default]
    View,
    EditWalls,
    Play,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CharKind {
    /// Player character: a sight origin that reveals fog.
    Pc,
    /// Decorative token; never affects fog and is not selectable.
    Npc,
}

/// Open polyline that blocks line of sight. A wall with fewer than two
/// vertices contributes no occluding segments.
#[derive(Clone, Debug, PartialEq)]
pub struct Wall {
    pub id: WallId,
    pub vertices: Vec<Vec2>,
}

impl Wall {
    #[inline]
    pub fn occludes(&self) -> bool {
        self.vertices.len() >= 2
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Character {
    pub id: CharacterId,
    pub pos: Vec2,
    pub kind: CharKind,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum VertexOwner {
    /// The in-progress draft wall.
    Draft,
    Wall(WallId),
}

/// Stable address of one vertex: owning wall plus index into its polyline.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct VertexHandle {
    pub owner: VertexOwner,
    pub index: usize,
}

/// In-memory map state. All operations are synchronous and perform no I/O;
/// mode gating lives in the session layer.
pub struct MapState {
    mode: Mode,
    walls: Vec<Wall>,
    draft: Option<Wall>,
    characters: Vec<Character>,
    next_wall_id: u64,
    next_char_id: u64,
    pub selected_vertex: Option<VertexHandle>,
    pub selected_pc: Option<CharacterId>,
}

impl Default for MapState {
    fn default() -> Self {
        Self::new()
    }
}

impl MapState {
    pub fn new() -> Self {
        Self {
            mode: Mode::View,
            walls: Vec::new(),
            draft: None,
            characters: Vec::new(),
            next_wall_id: 1,
            next_char_id: 1,
            selected_vertex: None,
            selected_pc: None,
        }
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    // ---- walls ----

    #[inline]
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    #[inline]
    pub fn draft(&self) -> Option<&Wall> {
        self.draft.as_ref()
    }

    /// Committed wall polylines for the geometry kernel. The draft never
    /// occludes; it only becomes a wall on completion.
    pub fn occluders(&self) -> impl Iterator<Item = &[Vec2]> + Clone {
        self.walls.iter().map(|w| w.vertices.as_slice())
    }

    fn alloc_wall_id(&mut self) -> WallId {
        let id = WallId(self.next_wall_id);
        self.next_wall_id += 1;
        id
    }

    pub fn add_wall(&mut self, vertices: Vec<Vec2>) -> WallId {
        let id = self.alloc_wall_id();
        self.walls.push(Wall { id, vertices });
        id
    }

    /// Replace the committed wall set wholesale (load / import). Keeps the id
    /// counter ahead of every installed id so future walls stay unique.
    pub fn install_walls(&mut self, walls: Vec<Wall>) {
        let max_id = walls.iter().map(|w| w.id.0).max().unwrap_or(0);
        self.next_wall_id = self.next_wall_id.max(max_id + 1);
        self.walls = walls;
        self.selected_vertex = None;
    }

    pub fn remove_wall(&mut self, id: WallId) -> bool {
        let before = self.walls.len();
        self.walls.retain(|w| w.id != id);
        self.walls.len() != before
    }

    /// Deleting a vertex always deletes the whole wall that owns it; there is
    /// no partial-wall vertex removal. Returns true if anything was removed.
    pub fn remove_wall_containing(&mut self, handle: VertexHandle) -> bool {
        match handle.owner {
            VertexOwner::Draft => {
                if self.draft.is_some() {
                    self.draft = None;
                    true
                } else {
                    false
                }
            }
            VertexOwner::Wall(id) => self.remove_wall(id),
        }
    }

    pub fn clear_all_walls(&mut self) {
        self.walls.clear();
        self.draft = None;
        self.selected_vertex = None;
    }

    // ---- draft wall ----

    pub fn has_draft(&self) -> bool {
        self.draft.is_some()
    }

    /// Add a vertex to the draft, starting one if none is in progress.
    pub fn push_draft_vertex(&mut self, pos: Vec2) -> usize {
        match &mut self.draft {
            Some(d) => {
                d.vertices.push(pos);
                d.vertices.len()
            }
            None => {
                let id = self.alloc_wall_id();
                self.draft = Some(Wall {
                    id,
                    vertices: vec![pos],
                });
                1
            }
        }
    }

    /// Append the final vertex and promote the draft to a committed wall.
    pub fn finish_draft(&mut self, final_vertex: Vec2) -> Option<WallId> {
        let mut d = self.draft.take()?;
        d.vertices.push(final_vertex);
        let id = d.id;
        self.walls.push(d);
        Some(id)
    }

    pub fn discard_draft(&mut self) {
        self.draft = None;
    }

    // ---- vertices ----

    /// First vertex within `radius` of `p`: the draft is searched before the
    /// committed walls, walls in insertion order.
    pub fn find_vertex_near(&self, p: Vec2, radius: f32) -> Option<VertexHandle> {
        if let Some(d) = &self.draft {
            for (i, v) in d.vertices.iter().enumerate() {
                if v.distance(p) <= radius {
                    return Some(VertexHandle {
                        owner: VertexOwner::Draft,
                        index: i,
                    });
                }
            }
        }
        for wall in &self.walls {
            for (i, v) in wall.vertices.iter().enumerate() {
                if v.distance(p) <= radius {
                    return Some(VertexHandle {
                        owner: VertexOwner::Wall(wall.id),
                        index: i,
                    });
                }
            }
        }
        None
    }

    fn wall_by_id(&self, id: WallId) -> Option<&Wall> {
        self.walls.iter().find(|w| w.id == id)
    }

    /// Wall that owns the handle, or the draft. None when the handle is stale.
    pub fn wall_containing(&self, handle: VertexHandle) -> Option<&Wall> {
        let wall = match handle.owner {
            VertexOwner::Draft => self.draft.as_ref()?,
            VertexOwner::Wall(id) => self.wall_by_id(id)?,
        };
        (handle.index < wall.vertices.len()).then_some(wall)
    }

    pub fn vertex_pos(&self, handle: VertexHandle) -> Option<Vec2> {
        self.wall_containing(handle)
            .map(|w| w.vertices[handle.index])
    }

    /// Move an existing vertex. False when the handle no longer resolves.
    pub fn set_vertex(&mut self, handle: VertexHandle, pos: Vec2) -> bool {
        let wall = match handle.owner {
            VertexOwner::Draft => self.draft.as_mut(),
            VertexOwner::Wall(id) => self.walls.iter_mut().find(|w| w.id == id),
        };
        match wall {
            Some(w) if handle.index < w.vertices.len() => {
                w.vertices[handle.index] = pos;
                true
            }
            _ => false,
        }
    }

    // ---- characters ----

    #[inline]
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn pcs(&self) -> impl Iterator<Item = &Character> {
        self.characters
            .iter()
            .filter(|c| c.kind == CharKind::Pc)
    }

    pub fn pc_positions(&self) -> Vec<Vec2> {
        self.pcs().map(|c| c.pos).collect()
    }

    pub fn add_character(&mut self, kind: CharKind, pos: Vec2) -> CharacterId {
        let id = CharacterId(self.next_char_id);
        self.next_char_id += 1;
        self.characters.push(Character { id, pos, kind });
        id
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn set_character_pos(&mut self, id: CharacterId, pos: Vec2) -> bool {
        match self.characters.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.pos = pos;
                true
            }
            None => false,
        }
    }

    /// First PC within `radius` of `p`. NPCs are not selectable or movable,
    /// so only PCs are searched.
    pub fn find_pc_near(&self, p: Vec2, radius: f32) -> Option<CharacterId> {
        self.pcs()
            .find(|c| c.pos.distance(p) <= radius)
            .map(|c| c.id)
    }

    /// New-map reset: drops session-local state but keeps committed walls.
    pub fn reset_for_new_map(&mut self) {
        self.draft = None;
        self.characters.clear();
        self.selected_vertex = None;
        self.selected_pc = None;
        self.mode = Mode::View;
    }
}
