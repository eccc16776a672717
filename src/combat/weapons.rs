//! Weapon records consumed by attack resolution
//!
//! A weapon is plain immutable data. Entities share one through an `Arc`.

use serde::{Deserialize, Serialize};

use crate::core::types::Hp;

/// Complete weapon properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    /// Hit points removed per connecting swing
    pub damage: Hp,
    /// Added to the wielder's base attack speed; higher = shorter cooldown
    pub attack_speed: u32,
    /// Horizontal reach of the attack box
    pub attack_range: i32,
    /// Half the vertical extent of the attack box
    pub attack_width: i32,
}

impl Weapon {
    pub fn new(
        name: impl Into<String>,
        damage: Hp,
        attack_speed: u32,
        attack_range: i32,
        attack_width: i32,
    ) -> Self {
        Self {
            name: name.into(),
            damage,
            attack_speed,
            attack_range,
            attack_width,
        }
    }

    /// Common weapon: Sword
    pub fn sword() -> Self {
        Self::new("sword", 30, 50, 50, 30)
    }

    /// Common weapon: Dagger (fast, short)
    pub fn dagger() -> Self {
        Self::new("dagger", 15, 120, 25, 15)
    }

    /// Common weapon: Spear (slow, long and narrow)
    pub fn spear() -> Self {
        Self::new("spear", 35, 30, 90, 10)
    }

    /// Common weapon: Fists (unarmed)
    pub fn fists() -> Self {
        Self::new("fists", 5, 80, 15, 10)
    }
}

impl Default for Weapon {
    fn default() -> Self {
        Self::sword()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sword() {
        let weapon = Weapon::default();
        assert_eq!(weapon.name, "sword");
        assert_eq!(weapon.damage, 30);
        assert_eq!(weapon.attack_speed, 50);
        assert_eq!(weapon.attack_range, 50);
        assert_eq!(weapon.attack_width, 30);
    }

    #[test]
    fn test_common_weapons_differ() {
        assert!(Weapon::spear().attack_range > Weapon::sword().attack_range);
        assert!(Weapon::dagger().attack_speed > Weapon::sword().attack_speed);
    }
}
