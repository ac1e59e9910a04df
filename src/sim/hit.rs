//! Tap hit-testing against the rendered target

use glam::Vec2;

/// True if `point` lands on a circular target of `radius` centred at `center`
#[inline]
pub fn point_hits_target(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) <= radius * radius
}
