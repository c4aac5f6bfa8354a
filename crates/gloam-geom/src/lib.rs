//! 2D geometry kernel for line-of-sight occlusion (no raylib dependency).
#![forbid(unsafe_code)]

use core::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

/// Determinant magnitudes below this are treated as parallel lines.
/// Collinear overlap is deliberately reported as non-intersecting.
pub const PARALLEL_EPS: f32 = 1e-10;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector for an angle in radians (ray direction).
    #[inline]
    pub fn from_angle(radians: f32) -> Self {
        Self::new(radians.cos(), radians.sin())
    }

    #[inline]
    pub fn dot(self, rhs: Vec2) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn distance(self, rhs: Vec2) -> f32 {
        (self - rhs).length()
    }

    #[inline]
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len > 0.0 { self / len } else { self }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

/// True iff the closed segments `a1..a2` and `b1..b2` meet at a single point,
/// by the standard two-line parametric-determinant test. Parallel (and thus
/// collinear-overlapping) segments are non-intersecting.
pub fn segments_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let denom = (a1.x - a2.x) * (b1.y - b2.y) - (a1.y - a2.y) * (b1.x - b2.x);
    if denom.abs() < PARALLEL_EPS {
        return false;
    }
    let t = ((a1.x - b1.x) * (b1.y - b2.y) - (a1.y - b1.y) * (b1.x - b2.x)) / denom;
    let u = -((a1.x - a2.x) * (a1.y - b1.y) - (a1.y - a2.y) * (a1.x - b1.x)) / denom;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Parametric position along `a1..a2` of its intersection with `b1..b2`,
/// or `None` when the segments do not cross.
fn hit_param(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<f32> {
    let denom = (a1.x - a2.x) * (b1.y - b2.y) - (a1.y - a2.y) * (b1.x - b2.x);
    if denom.abs() < PARALLEL_EPS {
        return None;
    }
    let t = ((a1.x - b1.x) * (b1.y - b2.y) - (a1.y - b1.y) * (b1.x - b2.x)) / denom;
    let u = -((a1.x - a2.x) * (a1.y - b1.y) - (a1.y - a2.y) * (a1.x - b1.x)) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(t)
    } else {
        None
    }
}

/// True iff the sight line `origin..target` crosses any segment of any
/// polyline. Polylines with fewer than two vertices contribute no segments.
pub fn is_blocked<'a, I>(polylines: I, origin: Vec2, target: Vec2) -> bool
where
    I: IntoIterator<Item = &'a [Vec2]>,
{
    for verts in polylines {
        if verts.len() < 2 {
            continue;
        }
        for seg in verts.windows(2) {
            if segments_intersect(origin, target, seg[0], seg[1]) {
                return true;
            }
        }
    }
    false
}

/// Distance along the unit ray `origin + d * dir` to the nearest occluding
/// segment within `max_dist`, or `f32::INFINITY` when the ray is clear.
/// Equivalent to walking the ray and stopping at the first blocked step,
/// computed once per ray instead; a clear ray blocks nothing, so the whole
/// walked range stays reachable.
pub fn clip_distance<'a, I>(polylines: I, origin: Vec2, dir: Vec2, max_dist: f32) -> f32
where
    I: IntoIterator<Item = &'a [Vec2]>,
{
    let end = origin + dir * max_dist;
    let mut nearest = f32::INFINITY;
    for verts in polylines {
        if verts.len() < 2 {
            continue;
        }
        for seg in verts.windows(2) {
            if let Some(t) = hit_param(origin, end, seg[0], seg[1]) {
                let d = t * max_dist;
                if d < nearest {
                    nearest = d;
                }
            }
        }
    }
    nearest
}
