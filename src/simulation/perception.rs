//! Perception system - what enemies notice about their target

use crate::core::types::{wrap_signed_degrees, Vec2};

/// Observer's viewpoint for a perception query
#[derive(Debug, Clone, Copy)]
pub struct ViewCone {
    pub origin: Vec2,
    /// Facing in degrees
    pub look_angle: f32,
    /// Full cone width in degrees
    pub fov: f32,
    pub view_range: f32,
}

impl ViewCone {
    /// Signed angle between facing and the bearing to `target`, in [-180, 180)
    pub fn angle_off(&self, target: Vec2) -> f32 {
        wrap_signed_degrees(self.origin.bearing_to(&target) - self.look_angle)
    }

    /// Target is within range and inside the cone
    pub fn sees(&self, target: Vec2) -> bool {
        let dx = target.x - self.origin.x;
        let dy = target.y - self.origin.y;
        if dx * dx + dy * dy > self.view_range * self.view_range {
            return false;
        }
        self.angle_off(target).abs() <= self.fov / 2.0
    }
}

/// Target is close enough to be noticed regardless of facing
pub fn within_proximity(origin: Vec2, target: Vec2, radius: f32) -> bool {
    origin.distance(&target) <= radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cone(look_angle: f32) -> ViewCone {
        ViewCone {
            origin: Vec2::new(0.0, 0.0),
            look_angle,
            fov: 60.0,
            view_range: 150.0,
        }
    }

    #[test]
    fn test_sees_straight_ahead() {
        assert!(cone(0.0).sees(Vec2::new(100.0, 0.0)));
    }

    #[test]
    fn test_half_fov_edge() {
        let c = cone(0.0);
        let at = |deg: f32| Vec2::from_angle(deg) * 100.0;
        assert!(c.sees(at(29.0)));
        assert!(c.sees(at(-29.0)));
        assert!(!c.sees(at(31.0)));
        assert!(!c.sees(at(-45.0)));
    }

    #[test]
    fn test_out_of_range() {
        assert!(!cone(0.0).sees(Vec2::new(151.0, 0.0)));
        assert!(cone(0.0).sees(Vec2::new(150.0, 0.0)));
    }

    #[test]
    fn test_behind_is_unseen() {
        assert!(!cone(0.0).sees(Vec2::new(-50.0, 0.0)));
        assert!(cone(180.0).sees(Vec2::new(-50.0, 0.0)));
    }

    #[test]
    fn test_wraps_across_zero() {
        // Facing 350 degrees, target at bearing 10 degrees: 20 degrees off
        let c = cone(350.0);
        assert!((c.angle_off(Vec2::from_angle(10.0) * 50.0) - 20.0).abs() < 0.01);
        assert!(c.sees(Vec2::from_angle(10.0) * 50.0));
    }

    #[test]
    fn test_proximity_inclusive() {
        let origin = Vec2::new(0.0, 0.0);
        assert!(within_proximity(origin, Vec2::new(50.0, 0.0), 50.0));
        assert!(!within_proximity(origin, Vec2::new(50.1, 0.0), 50.0));
    }
}
