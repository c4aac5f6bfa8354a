//! Visibility and fog-of-war engine.
//!
//! Two bitmask layers cover the map's cell space: `base` is the durable
//! record of everything a PC has ever seen, `overlay` is rebuilt every frame
//! so moving PCs always see their current surroundings before a permanent
//! reveal lands. `compose` unions the two into the live frame the renderer
//! consumes. Only the base layer is semantically meaningful.
#![forbid(unsafe_code)]

use gloam_geom::{Vec2, clip_distance};
use gloam_map::Wall;
use hashbrown::HashSet;

/// One ray per integer degree: bounded cost at acceptable precision.
pub const RAY_COUNT: u32 = 360;

/// Per-cell revealed/hidden bitmask. A set bit means revealed.
#[derive(Clone, Debug, PartialEq)]
pub struct FogBuffer {
    w: u32,
    h: u32,
    words: Vec<u64>,
}

impl FogBuffer {
    /// All-hidden buffer covering `w x h` cells.
    pub fn new(w: u32, h: u32) -> Self {
        let cells = w as usize * h as usize;
        Self {
            w,
            h,
            words: vec![0; cells.div_ceil(64)],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.w
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.h
    }

    #[inline]
    fn bit(&self, x: i32, y: i32) -> Option<(usize, u64)> {
        if x < 0 || y < 0 || x >= self.w as i32 || y >= self.h as i32 {
            return None;
        }
        let idx = y as usize * self.w as usize + x as usize;
        Some((idx / 64, 1u64 << (idx % 64)))
    }

    /// Out-of-bounds cells read as hidden.
    #[inline]
    pub fn revealed(&self, x: i32, y: i32) -> bool {
        match self.bit(x, y) {
            Some((word, mask)) => self.words[word] & mask != 0,
            None => false,
        }
    }

    /// Marks a cell revealed; out-of-bounds marks are ignored.
    #[inline]
    pub fn reveal_cell(&mut self, x: i32, y: i32) {
        if let Some((word, mask)) = self.bit(x, y) {
            self.words[word] |= mask;
        }
    }

    pub fn hide_all(&mut self) {
        self.words.fill(0);
    }

    pub fn copy_from(&mut self, other: &FogBuffer) {
        debug_assert_eq!((self.w, self.h), (other.w, other.h));
        self.words.copy_from_slice(&other.words);
    }

    /// Word-level union of `other` into self.
    pub fn union_with(&mut self, other: &FogBuffer) {
        debug_assert_eq!((self.w, self.h), (other.w, other.h));
        for (dst, src) in self.words.iter_mut().zip(&other.words) {
            *dst |= src;
        }
    }

    pub fn count_revealed(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

/// Pure composition of base fog plus the transient overlay into `out`.
/// The result is the live frame; it carries no durable state of its own.
pub fn compose(base: &FogBuffer, overlay: &FogBuffer, out: &mut FogBuffer) {
    out.copy_from(base);
    out.union_with(overlay);
}

/// Ray-cast reveal into a single target layer. Casts `RAY_COUNT` rays from
/// `origin`, clips each against the nearest occluding wall segment once, then
/// marks every unit step's floored cell out to the radius, stopping short of
/// the clip distance when a wall is hit. A clear ray reveals its full range,
/// including the cell at exactly the radius. Cells are deduplicated within
/// the operation. Walls with fewer than two vertices are skipped.
pub fn reveal(target: &mut FogBuffer, walls: &[Wall], origin: Vec2, radius: f32) -> usize {
    let mut marked: HashSet<(i32, i32)> = HashSet::new();
    let max_step = radius.floor() as i32;
    for deg in 0..RAY_COUNT {
        let dir = Vec2::from_angle((deg as f32).to_radians());
        let limit = clip_distance(
            walls
                .iter()
                .filter(|w| w.occludes())
                .map(|w| w.vertices.as_slice()),
            origin,
            dir,
            radius,
        );
        for step in 0..=max_step {
            let d = step as f32;
            // The origin cell is always visible, even standing on a wall.
            if step > 0 && d >= limit {
                break;
            }
            let p = origin + dir * d;
            let cell = (p.x.floor() as i32, p.y.floor() as i32);
            if marked.insert(cell) {
                target.reveal_cell(cell.0, cell.1);
            }
        }
    }
    marked.len()
}

/// Base + overlay fog layers plus the composed live frame for one map.
pub struct FogField {
    base: FogBuffer,
    overlay: FogBuffer,
    live: FogBuffer,
}

impl FogField {
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            base: FogBuffer::new(w, h),
            overlay: FogBuffer::new(w, h),
            live: FogBuffer::new(w, h),
        }
    }

    #[inline]
    pub fn base(&self) -> &FogBuffer {
        &self.base
    }

    /// Live frame as of the last `refresh_live` call.
    #[inline]
    pub fn live(&self) -> &FogBuffer {
        &self.live
    }

    /// Durable reveal: survives until the next explicit fog reset.
    pub fn reveal_permanent(&mut self, walls: &[Wall], origin: Vec2, radius: f32) {
        let n = reveal(&mut self.base, walls, origin, radius);
        log::debug!(target: "fog", "permanent reveal at ({:.1},{:.1}) r={} cells={}", origin.x, origin.y, radius, n);
    }

    /// Frame-local reveal: lives in the overlay and is discarded by the next
    /// `begin_frame`.
    pub fn reveal_ephemeral(&mut self, walls: &[Wall], origin: Vec2, radius: f32) {
        reveal(&mut self.overlay, walls, origin, radius);
    }

    /// Start a fresh frame: the previous overlay is discarded.
    pub fn begin_frame(&mut self) {
        self.overlay.hide_all();
    }

    /// Recompute the live frame from base + overlay.
    pub fn refresh_live(&mut self) {
        compose(&self.base, &self.overlay, &mut self.live);
    }

    /// Fill everything hidden, then permanently reveal around every PC.
    /// Used on entering play and for the explicit fog reset.
    pub fn initialize(&mut self, walls: &[Wall], pc_positions: &[Vec2], radius: f32) {
        self.base.hide_all();
        self.overlay.hide_all();
        for &pos in pc_positions {
            self.reveal_permanent(walls, pos, radius);
        }
        self.refresh_live();
        log::info!(
            target: "fog",
            "fog initialized: {} pcs, {} cells revealed",
            pc_positions.len(),
            self.base.count_revealed()
        );
    }

    /// Undo all accumulated exploration, keeping only what current PCs see.
    pub fn reset_to_current_pcs(&mut self, walls: &[Wall], pc_positions: &[Vec2], radius: f32) {
        self.initialize(walls, pc_positions, radius);
    }
}

#[cfg(test)]
mod tests;
