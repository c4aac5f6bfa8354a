use serde::Deserialize;

/// Session tunables. The sight radius is an explicit configuration field read
/// at reveal time and adjusted through [`crate::Session::set_sight_radius`];
/// there is no ambient global.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// PC sight radius in map feet.
    pub sight_radius_ft: f32,
    /// Display pixels per map foot; recomputed when a map surface attaches.
    pub grid_px_per_ft: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sight_radius_ft: 6.0,
            grid_px_per_ft: 5.0,
        }
    }
}

impl SessionConfig {
    /// Reveal radius in display pixels.
    #[inline]
    pub fn reveal_radius(&self) -> f32 {
        self.sight_radius_ft * self.grid_px_per_ft
    }

    /// The map is assumed to span roughly 50x50 feet; the scale follows the
    /// displayed dimensions.
    pub fn fit_grid_to_surface(&mut self, w: u32, h: u32) {
        self.grid_px_per_ft = (w.min(h) as f32) / 50.0;
    }
}
