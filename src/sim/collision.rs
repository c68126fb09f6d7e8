//! Collision tests
//!
//! Pools are small and capped, so everything is pairwise: sphere overlap for
//! ships and bullets, box containment for the boss hull.

use glam::Vec3;

/// Boss hull half-extents (x, y, z)
pub const BOSS_HALF_EXTENTS: Vec3 = Vec3::new(5.0, 3.0, 3.0);

/// True when `a` and `b` are closer than `radius`
#[inline]
pub fn within_radius(a: Vec3, b: Vec3, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// Axis-aligned box given by center and half-extents
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self { center, half_extents }
    }

    /// Strict containment (points on the surface miss)
    #[inline]
    pub fn contains(&self, point: Vec3) -> bool {
        let d = (point - self.center).abs();
        d.x < self.half_extents.x && d.y < self.half_extents.y && d.z < self.half_extents.z
    }
}

/// Unit direction from `from` to `to`; zero when the points coincide
#[inline]
pub fn direction(from: Vec3, to: Vec3) -> Vec3 {
    (to - from).normalize_or_zero()
}
