//! Enemy AI: wander, notice, escalate, pursue
//!
//! Awareness only ever climbs. An idle enemy wanders until its target comes
//! near (alert) or into view (aggro). An alert enemy calms down if the target
//! leaves before the alert timer expires, otherwise it goes aggro. Aggro is
//! permanent: the enemy chases its target and swings whenever it is in reach.

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{Hp, Vec2};
use crate::ecs::world::Neighbors;
use crate::entity::base::{EntityBase, HurtOutcome};
use crate::entity::timers::{TimerEvent, TimerKind};
use crate::entity::UpdateContext;
use crate::render::colors;
use crate::render::Surface;
use crate::simulation::perception::{within_proximity, ViewCone};
use crate::simulation::tick::SimulationEvent;
use crate::simulation::timer::Timer;

/// Perception state of an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Awareness {
    Idle,
    Alerted,
    Aggro,
}

/// Enemy component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyState {
    /// Full view cone in degrees
    pub fov: f32,
    pub view_range: f32,
    /// Faction tag, not used for targeting yet
    pub team: i32,
    /// Committed to pursuing and attacking the target
    pub attacking: bool,
    proximity_radius: f32,
    idle_turn_chance: f32,
    idle_turn_range: i32,
}

impl EnemyState {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            fov: config.enemy.fov,
            view_range: config.enemy.view_range,
            team: config.enemy.team,
            attacking: false,
            proximity_radius: config.proximity_radius,
            idle_turn_chance: config.idle_turn_chance,
            idle_turn_range: config.idle_turn_range,
        }
    }

    /// Install the alert timer on the enemy's base
    pub fn install_timers(base: &mut EntityBase, player_near_ticks: u32) {
        base.timers.insert(
            TimerKind::PlayerNear,
            Timer::with_event(player_near_ticks, TimerEvent::Aggro),
        );
    }

    pub fn awareness(&self, base: &EntityBase) -> Awareness {
        if self.attacking {
            Awareness::Aggro
        } else if base.timers.is_armed(TimerKind::PlayerNear) {
            Awareness::Alerted
        } else {
            Awareness::Idle
        }
    }

    /// Switch to aggro. Returns false if already there.
    pub fn aggro(&mut self, base: &mut EntityBase) -> bool {
        if self.attacking {
            return false;
        }
        base.color = colors::AGGRO;
        self.attacking = true;
        base.timers.stop(TimerKind::PlayerNear);
        if let Some(timer) = base.timers.get_mut(TimerKind::PlayerNear) {
            timer.reset();
        }
        tracing::debug!(enemy = %base.id, "aggro");
        true
    }

    /// Being hit always provokes, even an unalerted enemy
    pub fn hurt(&mut self, base: &mut EntityBase, damage: Hp, surface: &mut dyn Surface) -> HurtOutcome {
        if base.is_dead() {
            return HurtOutcome::default();
        }
        let provoked = self.aggro(base);
        HurtOutcome {
            provoked,
            ..base.hurt(damage, surface)
        }
    }

    /// One tick of AI, run after the timers have been advanced
    pub fn behave(&mut self, base: &mut EntityBase, ctx: &mut UpdateContext, neighbors: &Neighbors) {
        if base.is_sleeping() {
            return;
        }

        if self.attacking {
            self.move_to_target(base, ctx, neighbors);
        } else {
            self.wander(base, ctx, neighbors);
            self.check_for_player(base, ctx, neighbors);
        }
    }

    /// Chase the target and arm a swing once it is in reach
    pub fn move_to_target(&mut self, base: &mut EntityBase, ctx: &mut UpdateContext, neighbors: &Neighbors) {
        let Some(target_pos) = live_target_position(base, neighbors) else {
            return;
        };
        if base.position() == target_pos {
            return;
        }

        let obstacles = neighbors.obstacles();
        base.move_to(target_pos, &obstacles, false, &mut *ctx.surface);
        if let Some(cooldown) = base.try_to_attack(neighbors) {
            ctx.events.push(SimulationEvent::AttackScheduled {
                tick: ctx.tick,
                attacker: base.id,
                cooldown,
            });
        }
    }

    fn wander(&mut self, base: &mut EntityBase, ctx: &mut UpdateContext, neighbors: &Neighbors) {
        if ctx.rng.chance(self.idle_turn_chance) {
            let turn = ctx
                .rng
                .range_inclusive(-self.idle_turn_range, self.idle_turn_range);
            base.rotate(turn as f32);
        }
        self.move_forward(base, neighbors, &mut *ctx.surface);
    }

    /// Step along the current heading; turn around when blocked
    pub fn move_forward(&self, base: &mut EntityBase, neighbors: &Neighbors, surface: &mut dyn Surface) -> bool {
        let heading = Vec2::from_angle(base.look_angle());
        let obstacles = neighbors.obstacles();
        let moved = base.move_by(heading.x, heading.y, &obstacles, false, surface);
        if !moved {
            base.rotate(180.0);
        }
        moved
    }

    /// Update awareness from the target's current position
    pub fn check_for_player(&mut self, base: &mut EntityBase, ctx: &mut UpdateContext, neighbors: &Neighbors) {
        if self.attacking {
            return;
        }
        let Some(target_pos) = live_target_position(base, neighbors) else {
            return;
        };

        if within_proximity(base.position(), target_pos, self.proximity_radius) {
            if !base.timers.is_armed(TimerKind::PlayerNear) {
                base.timers.start(TimerKind::PlayerNear, None);
                tracing::debug!(enemy = %base.id, "alerted");
                ctx.events.push(SimulationEvent::Alerted {
                    tick: ctx.tick,
                    enemy: base.id,
                });
            }
        } else {
            if base.timers.is_armed(TimerKind::PlayerNear) {
                ctx.events.push(SimulationEvent::Calmed {
                    tick: ctx.tick,
                    enemy: base.id,
                });
            }
            base.timers.stop(TimerKind::PlayerNear);
            if let Some(timer) = base.timers.get_mut(TimerKind::PlayerNear) {
                timer.reset();
            }
        }

        let cone = ViewCone {
            origin: base.position(),
            look_angle: base.look_angle(),
            fov: self.fov,
            view_range: self.view_range,
        };
        if cone.sees(target_pos) && self.aggro(base) {
            ctx.events.push(SimulationEvent::Aggro {
                tick: ctx.tick,
                enemy: base.id,
            });
        }
    }
}

/// Position of our target, if it exists and is still alive
fn live_target_position(base: &EntityBase, neighbors: &Neighbors) -> Option<Vec2> {
    let target = neighbors.get(base.target?)?;
    if target.base.is_dead() {
        None
    } else {
        Some(target.base.position())
    }
}
