//! Simulation configuration with documented constants
//!
//! Every tunable of the combat loop lives here. The config is built once by
//! the driver and handed to the world explicitly; nothing reads it globally.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::weapons::Weapon;
use crate::core::error::{Result, SkirmishError};
use crate::core::types::{Hp, Size};

/// Configuration for the simulation systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === TIME ===
    /// Ticks per second. Velocities are expressed in units per second and
    /// divided by this to get the per-tick displacement.
    pub frame_rate: f32,

    // === PLAY AREA ===
    /// Width of the play area when the world creates its own surface
    pub arena_width: u32,
    /// Height of the play area when the world creates its own surface
    pub arena_height: u32,

    // === TIMERS (ticks) ===
    /// Default pass-through window for `sleep`
    pub sleep_ticks: u32,
    /// How long a swing stays on screen before it is erased
    pub clear_attack_ticks: u32,
    /// Player invulnerability after taking damage
    pub invulnerability_ticks: u32,
    /// Delay between an enemy noticing someone nearby and going aggro
    pub player_near_ticks: u32,

    // === COMBAT ===
    /// Innate attack speed added to the weapon's before computing cooldowns
    pub base_attack_speed: u32,
    /// Weapon handed to every entity unless the caller supplies another
    pub weapon: Weapon,

    // === ENEMY AI ===
    /// Radius that alerts an idle enemy regardless of facing
    pub proximity_radius: f32,
    /// Per-tick chance for an idle enemy to pick a new heading
    ///
    /// At 0.001 an idle enemy turns on average once every 1000 ticks.
    pub idle_turn_chance: f32,
    /// Largest heading change (either way) of an idle turn, in degrees
    pub idle_turn_range: i32,

    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
}

/// Construction defaults for the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub size: Size,
    pub velocity: f32,
    pub hp: Hp,
}

/// Construction defaults for enemies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub size: Size,
    pub velocity: f32,
    pub hp: Hp,
    /// Full field-of-view cone in degrees
    pub fov: f32,
    pub view_range: f32,
    pub team: i32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,

            arena_width: 800,
            arena_height: 600,

            sleep_ticks: 100,
            clear_attack_ticks: 10,
            invulnerability_ticks: 40,
            player_near_ticks: 100,

            base_attack_speed: 1,
            weapon: Weapon::default(),

            proximity_radius: 50.0,
            idle_turn_chance: 0.001,
            idle_turn_range: 90,

            player: PlayerConfig::default(),
            enemy: EnemyConfig::default(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: Size::new(20, 20),
            velocity: 300.0,
            hp: 100,
        }
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            size: Size::new(20, 20),
            velocity: 30.0,
            hp: 100,
            fov: 60.0,
            view_range: 150.0,
            team: 1,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document. Missing keys fall back to defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Distance covered in one tick at `velocity` units per second
    pub fn step(&self, velocity: f32) -> f32 {
        velocity / self.frame_rate
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.frame_rate <= 0.0 {
            return Err(SkirmishError::InvalidConfig(format!(
                "frame_rate must be positive, got {}",
                self.frame_rate
            )));
        }

        if !(0.0..=1.0).contains(&self.idle_turn_chance) {
            return Err(SkirmishError::InvalidConfig(format!(
                "idle_turn_chance ({}) must be within [0, 1]",
                self.idle_turn_chance
            )));
        }

        if self.idle_turn_range < 0 {
            return Err(SkirmishError::InvalidConfig(
                "idle_turn_range must not be negative".into(),
            ));
        }

        // Cooldown divides by this sum
        match self.base_attack_speed.checked_add(self.weapon.attack_speed) {
            Some(0) => {
                return Err(SkirmishError::InvalidConfig(
                    "base_attack_speed + weapon.attack_speed must be positive".into(),
                ))
            }
            None => {
                return Err(SkirmishError::InvalidConfig(format!(
                    "base_attack_speed ({}) + weapon.attack_speed ({}) overflows",
                    self.base_attack_speed, self.weapon.attack_speed
                )))
            }
            Some(_) => {}
        }

        for (who, size) in [("player", self.player.size), ("enemy", self.enemy.size)] {
            if size.w <= 0 || size.h <= 0 {
                return Err(SkirmishError::InvalidConfig(format!(
                    "{} size must be positive, got {}x{}",
                    who, size.w, size.h
                )));
            }
        }

        for (who, size) in [("player", self.player.size), ("enemy", self.enemy.size)] {
            if size.w as i64 > self.arena_width as i64 || size.h as i64 > self.arena_height as i64 {
                return Err(SkirmishError::InvalidConfig(format!(
                    "{} size {}x{} does not fit a {}x{} arena",
                    who, size.w, size.h, self.arena_width, self.arena_height
                )));
            }
        }

        if self.enemy.fov < 0.0 || self.enemy.fov > 360.0 {
            return Err(SkirmishError::InvalidConfig(format!(
                "enemy.fov ({}) must be within [0, 360]",
                self.enemy.fov
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_step_scales_by_frame_rate() {
        let config = SimulationConfig::default();
        assert!((config.step(300.0) - 5.0).abs() < 0.0001);
        assert!((config.step(30.0) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            frame_rate = 30.0

            [enemy]
            fov = 90.0
            "#,
        )
        .unwrap();

        assert_eq!(config.frame_rate, 30.0);
        assert_eq!(config.enemy.fov, 90.0);
        assert_eq!(config.enemy.view_range, 150.0);
        assert_eq!(config.player_near_ticks, 100);
        assert_eq!(config.weapon.damage, 30);
    }

    #[test]
    fn test_rejects_zero_frame_rate() {
        let result = SimulationConfig::from_toml_str("frame_rate = 0.0");
        assert!(matches!(result, Err(SkirmishError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_overflowing_attack_speed() {
        let result = SimulationConfig::from_toml_str("base_attack_speed = 4294967295");
        assert!(matches!(result, Err(SkirmishError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_arena_smaller_than_entities() {
        let result = SimulationConfig::from_toml_str(
            r#"
            arena_width = 10
            arena_height = 10
            "#,
        );
        assert!(matches!(result, Err(SkirmishError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let result = SimulationConfig::from_toml_str("frame_rate = \"fast\"");
        assert!(matches!(result, Err(SkirmishError::ConfigParse(_))));
    }
}
