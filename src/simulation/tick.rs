//! Tick system - advances every entity once, in storage order
//!
//! Within an entity's update its timers fire first (a pending swing lands
//! before the entity moves), then its behavior runs. Entities later in the
//! order see the effects of earlier ones within the same tick.

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Hp, Tick};
use crate::ecs::world::World;
use crate::render::Surface;
use crate::simulation::random::RandomSource;
use crate::spatial::rect::Rect;

/// Events generated during a simulation tick
///
/// Returned by `run_simulation_tick` for logs, replays and the runner's report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimulationEvent {
    /// A swing was armed and will land after `cooldown` ticks
    AttackScheduled {
        tick: Tick,
        attacker: EntityId,
        cooldown: u32,
    },
    /// A swing landed (whether or not it hit anything)
    Swing {
        tick: Tick,
        attacker: EntityId,
        area: Rect,
    },
    Hit {
        tick: Tick,
        attacker: EntityId,
        target: EntityId,
        damage: Hp,
        hp_left: Hp,
    },
    Killed {
        tick: Tick,
        attacker: Option<EntityId>,
        target: EntityId,
    },
    /// An enemy committed to attacking its target
    Aggro { tick: Tick, enemy: EntityId },
    /// An enemy noticed its target nearby
    Alerted { tick: Tick, enemy: EntityId },
    /// The target left before the alert ran out
    Calmed { tick: Tick, enemy: EntityId },
}

impl SimulationEvent {
    pub fn tick(&self) -> Tick {
        match self {
            SimulationEvent::AttackScheduled { tick, .. }
            | SimulationEvent::Swing { tick, .. }
            | SimulationEvent::Hit { tick, .. }
            | SimulationEvent::Killed { tick, .. }
            | SimulationEvent::Aggro { tick, .. }
            | SimulationEvent::Alerted { tick, .. }
            | SimulationEvent::Calmed { tick, .. } => *tick,
        }
    }
}

/// Run one simulation tick, returning everything that happened
pub fn run_simulation_tick<S: Surface, R: RandomSource>(world: &mut World<S, R>) -> Vec<SimulationEvent> {
    let mut events = Vec::new();
    let tick = world.current_tick;

    for idx in 0..world.entity_count() {
        world.update_entity_at(idx, tick, &mut events);
    }

    world.current_tick += 1;
    if !events.is_empty() {
        tracing::trace!(tick, count = events.len(), "tick events");
    }
    events
}
