//! Color definitions for entities and combat overlays

use serde::{Deserialize, Serialize};

/// Straight RGBA, each channel in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

/// Enemy marker once it has committed to attacking
pub const AGGRO: Color = Color::rgb(1.0, 0.0, 0.0);

/// Transient swing overlay
pub const ATTACK_BOX: Color = Color::rgb(0.745, 0.745, 0.745);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_opaque_and_distinct() {
        for c in [WHITE, BLACK, AGGRO, ATTACK_BOX] {
            assert_eq!(c.a, 1.0);
        }
        assert_ne!(AGGRO, WHITE);
        assert_ne!(ATTACK_BOX, BLACK);
    }
}
