//! Melee swing geometry
//!
//! A swing covers a rectangle that starts at the attacker's center and
//! extends `attack_range` to one side, `attack_width` above and below.

use serde::{Deserialize, Serialize};

use crate::combat::constants::{ATTACK_COOLDOWN_BASE, COOLDOWN_SCALE};
use crate::combat::weapons::Weapon;
use crate::core::types::{EntityId, Vec2};
use crate::spatial::rect::Rect;

/// Horizontal side a swing extends to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Right,
    Left,
}

impl Side {
    /// Side facing `target_x` from `origin_x`; a target straight above or
    /// below counts as right
    pub fn toward(origin_x: f32, target_x: f32) -> Self {
        if origin_x <= target_x {
            Side::Right
        } else {
            Side::Left
        }
    }

    /// Side from a facing angle: exactly 0 is right, anything else left
    pub fn from_angle(angle: f32) -> Self {
        if angle == 0.0 {
            Side::Right
        } else {
            Side::Left
        }
    }
}

/// Rectangle covered by a swing from `origin` toward `side`
pub fn attack_box(origin: Vec2, side: Side, weapon: &Weapon) -> Rect {
    let offset = match side {
        Side::Right => 0.0,
        Side::Left => weapon.attack_range as f32,
    };
    Rect::from_f32(
        origin.x - offset,
        origin.y - weapon.attack_width as f32,
        weapon.attack_range,
        2 * weapon.attack_width,
    )
}

/// Ticks between arming an attack and the swing landing
pub fn cooldown_ticks(base_attack_speed: u32, weapon: &Weapon) -> u32 {
    let speed = base_attack_speed.saturating_add(weapon.attack_speed).max(1);
    ATTACK_COOLDOWN_BASE / speed / COOLDOWN_SCALE
}

/// Who a scheduled swing is aimed at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackTargets {
    Single(EntityId),
    Group(Vec<EntityId>),
}

impl AttackTargets {
    pub fn ids(&self) -> &[EntityId] {
        match self {
            AttackTargets::Single(id) => std::slice::from_ref(id),
            AttackTargets::Group(ids) => ids,
        }
    }
}

impl From<EntityId> for AttackTargets {
    fn from(id: EntityId) -> Self {
        AttackTargets::Single(id)
    }
}

impl From<Vec<EntityId>> for AttackTargets {
    fn from(ids: Vec<EntityId>) -> Self {
        AttackTargets::Group(ids)
    }
}
