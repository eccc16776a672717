//! Combat system constants

/// Numerator of the attack cooldown formula
pub const ATTACK_COOLDOWN_BASE: u32 = 10_000;

/// Cooldowns are scaled down by one order of magnitude
pub const COOLDOWN_SCALE: u32 = 10;
