//! Arcade Physics
//!
//! The small slice of arcade physics the game needs:
//! - Dynamic bodies with velocity and optional gravity
//! - Static groups of axis-aligned boxes
//! - AABB overlap tests (no separation solver)

use glam::Vec2;

/// Axis-aligned bounding box stored as center + half extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_size: Vec2,
}

impl Aabb {
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_size: size * 0.5,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_size
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_size
    }

    /// Strict overlap; touching edges do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half_size + other.half_size;
        d.x < reach.x && d.y < reach.y
    }

    /// Inclusive point containment, used for pointer hit tests.
    pub fn contains(&self, point: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }
}

// ============================================================================
// Dynamic Body
// ============================================================================

/// A moving body integrated with explicit Euler at the fixed timestep.
#[derive(Clone, Debug)]
pub struct ArcadeBody {
    /// Center position in game pixels.
    pub position: Vec2,
    /// Velocity in pixels per second.
    pub velocity: Vec2,
    /// Display and collision size.
    pub size: Vec2,
    pub allow_gravity: bool,
}

impl ArcadeBody {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
            allow_gravity: true,
        }
    }

    /// Advances the body by `dt` seconds.
    pub fn step(&mut self, gravity: Vec2, dt: f32) {
        if self.allow_gravity {
            self.velocity += gravity * dt;
        }
        self.position += self.velocity * dt;
    }

    /// Halts the body in place.
    pub fn freeze(&mut self) {
        self.velocity = Vec2::ZERO;
        self.allow_gravity = false;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.size)
    }
}

// ============================================================================
// Static Group
// ============================================================================

/// Immovable collision boxes, e.g. a row of ground tiles.
#[derive(Clone, Debug, Default)]
pub struct StaticGroup {
    members: Vec<Aabb>,
}

impl StaticGroup {
    /// Places `quantity` boxes of `size` evenly along the segment `start..end`.
    ///
    /// Points are taken at `i / quantity` along the segment, so the end point
    /// itself is never occupied.
    pub fn place_on_line(quantity: usize, start: Vec2, end: Vec2, size: Vec2) -> Self {
        let members = (0..quantity)
            .map(|i| {
                let t = i as f32 / quantity as f32;
                Aabb::from_center_size(start.lerp(end, t), size)
            })
            .collect();
        Self { members }
    }

    pub fn members(&self) -> &[Aabb] {
        &self.members
    }

    pub fn overlaps(&self, body: &ArcadeBody) -> bool {
        let bounds = body.bounds();
        self.members.iter().any(|m| m.overlaps(&bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_placement_matches_tile_spacing() {
        let ground = StaticGroup::place_on_line(
            20,
            Vec2::new(20.0, 580.0),
            Vec2::new(820.0, 580.0),
            Vec2::splat(40.0),
        );
        let xs: Vec<f32> = ground.members().iter().map(|m| m.center.x).collect();
        assert_eq!(xs.len(), 20);
        assert_eq!(xs[0], 20.0);
        assert_eq!(xs[1], 60.0);
        assert_eq!(xs[19], 780.0);
        assert!(ground.members().iter().all(|m| m.center.y == 580.0));
    }

    #[test]
    fn gravity_accelerates_body() {
        let mut body = ArcadeBody::new(Vec2::ZERO, Vec2::splat(10.0));
        body.velocity = Vec2::new(0.0, 200.0);
        body.step(Vec2::new(0.0, 100.0), 0.5);
        assert_eq!(body.velocity, Vec2::new(0.0, 250.0));
        assert_eq!(body.position, Vec2::new(0.0, 125.0));
    }

    #[test]
    fn frozen_body_stays_put() {
        let mut body = ArcadeBody::new(Vec2::new(5.0, 5.0), Vec2::splat(10.0));
        body.velocity = Vec2::new(0.0, 200.0);
        body.freeze();
        body.step(Vec2::new(0.0, 100.0), 1.0);
        assert_eq!(body.position, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn touching_is_not_overlapping() {
        let a = Aabb::from_center_size(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::from_center_size(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let c = Aabb::from_center_size(Vec2::new(9.0, 0.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(a.contains(Vec2::new(5.0, -5.0)));
        assert!(!a.contains(Vec2::new(5.1, 0.0)));
    }
}
