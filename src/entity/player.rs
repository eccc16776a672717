//! Player-specific state: facing-driven swings and invulnerability frames

use serde::{Deserialize, Serialize};

use crate::core::types::Hp;
use crate::entity::base::{EntityBase, HurtOutcome};
use crate::entity::timers::{TimerEvent, TimerKind};
use crate::render::Surface;
use crate::simulation::timer::Timer;

/// Player component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerState {
    /// Set after taking damage; enemies hold their swings while true
    pub invul: bool,
    /// 0 swings right, anything else swings left
    pub attack_angle: f32,
}

impl PlayerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the invulnerability timer on the player's base
    pub fn install_timers(base: &mut EntityBase, invulnerability_ticks: u32) {
        base.timers.insert(
            TimerKind::Invulnerability,
            Timer::with_event(invulnerability_ticks, TimerEvent::EndInvulnerability),
        );
    }

    /// Track facing from horizontal input; vertical-only input keeps it
    pub fn face(&mut self, base: &mut EntityBase, dx: f32) {
        let angle = if dx > 0.0 {
            0.0
        } else if dx < 0.0 {
            180.0
        } else {
            return;
        };
        base.set_look_angle(angle);
        self.attack_angle = angle;
    }

    /// Take damage, then open the invulnerability window
    ///
    /// Damage is applied even while already invulnerable. The window only
    /// stops enemies from arming new swings at the player.
    pub fn hurt(&mut self, base: &mut EntityBase, damage: Hp, surface: &mut dyn Surface) -> HurtOutcome {
        if base.is_dead() {
            return HurtOutcome::default();
        }
        let outcome = base.hurt(damage, surface);
        if !outcome.killed {
            self.invul = true;
            base.timers.start(TimerKind::Invulnerability, None);
        }
        outcome
    }

    pub fn end_invulnerability(&mut self) {
        self.invul = false;
    }
}

#[cfg(test)]
mod tests {
    use crate::core::config::SimulationConfig;
    use crate::core::types::Vec2;
    use crate::entity::Entity;
    use crate::render::FrameBuffer;

    fn player() -> Entity {
        Entity::player(Vec2::new(100.0, 100.0), &SimulationConfig::default())
    }

    #[test]
    fn test_hurt_opens_invulnerability() {
        let mut fb = FrameBuffer::blank(200, 200);
        let mut p = player();
        p.hurt(30, &mut fb);
        assert_eq!(p.hp(), 70);
        assert!(p.is_invulnerable());
        p.hurt(30, &mut fb);
        assert_eq!(p.hp(), 40);
    }

    #[test]
    fn test_lethal_hit_leaves_no_window() {
        let mut fb = FrameBuffer::blank(200, 200);
        let mut p = player();
        let outcome = p.hurt(500, &mut fb);
        assert!(outcome.killed);
        assert_eq!(outcome.dealt, 100);
        assert!(!p.is_invulnerable());
    }

    #[test]
    fn test_horizontal_input_sets_facing() {
        let mut p = player();
        let crate::entity::EntityKind::Player(state) = &mut p.kind else {
            unreachable!()
        };
        state.face(&mut p.base, -3.0);
        assert_eq!(state.attack_angle, 180.0);
        assert_eq!(p.base.look_angle(), 180.0);
        state.face(&mut p.base, 0.0);
        assert_eq!(state.attack_angle, 180.0);
        state.face(&mut p.base, 1.0);
        assert_eq!(state.attack_angle, 0.0);
    }
}
