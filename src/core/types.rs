//! Identifiers, units and plane geometry shared by every module

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short form is enough to tell entities apart in logs
        let s = self.0.simple().to_string();
        write!(f, "{}", &s[..8])
    }
}

/// Simulation tick counter
pub type Tick = u64;

/// Hit points. Never negative, never healed.
pub type Hp = u32;

/// 2D position on the play area (screen orientation: y grows downwards)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Unit vector pointing along `degrees` (0 = +x, 90 = +y)
    pub fn from_angle(degrees: f32) -> Self {
        let rad = degrees.to_radians();
        Self { x: rad.cos(), y: rad.sin() }
    }

    /// Bearing from `self` to `other` in degrees, in (-180, 180]
    pub fn bearing_to(&self, other: &Self) -> f32 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }
}

/// Scale, e.g. a heading by a travel distance
impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Entity footprint in whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }
}

/// Wrap an angle into [0, 360)
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wrap an angle difference into [-180, 180)
pub fn wrap_signed_degrees(angle: f32) -> f32 {
    angle - 360.0 * ((angle + 180.0) / 360.0).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_short_display() {
        let id = EntityId::new();
        assert_eq!(id.to_string().len(), 8);
        assert_ne!(id, EntityId::new());
    }

    #[test]
    fn test_vec2_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 0.0001);
    }

    #[test]
    fn test_bearing_screen_orientation() {
        let origin = Vec2::new(0.0, 0.0);
        assert!(origin.bearing_to(&Vec2::new(10.0, 0.0)).abs() < 0.001);
        assert!((origin.bearing_to(&Vec2::new(0.0, 10.0)) - 90.0).abs() < 0.001);
        assert!((origin.bearing_to(&Vec2::new(-10.0, 0.0)) - 180.0).abs() < 0.001);
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(370.0), 10.0);
        assert_eq!(wrap_degrees(-90.0), 270.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
    }

    #[test]
    fn test_wrap_signed_degrees() {
        assert_eq!(wrap_signed_degrees(190.0), -170.0);
        assert_eq!(wrap_signed_degrees(-190.0), 170.0);
        assert_eq!(wrap_signed_degrees(180.0), -180.0);
        assert_eq!(wrap_signed_degrees(45.0), 45.0);
    }
}
