//! Per-entity timer table
//!
//! Every entity owns a small set of named timers. They are advanced in
//! insertion order; the events they fire are collected and returned so the
//! entity can act on them once the whole set has been advanced.

use crate::combat::attack::AttackTargets;
use crate::simulation::timer::Timer;
use crate::spatial::rect::Rect;

/// Which slot of the table a timer occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Armed while the entity is excluded from collisions
    Sleep,
    /// Delay before a scheduled swing lands
    AttackCooldown,
    /// Erases the swing overlay
    ClearAttack,
    /// Player only: ends the post-hit invulnerability window
    Invulnerability,
    /// Enemy only: escalates an alert into aggro
    PlayerNear,
}

/// Deferred action delivered by an expiring timer
#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    Attack(AttackTargets),
    ClearAttack(Rect),
    EndInvulnerability,
    Aggro,
}

/// Ordered kind → timer table
#[derive(Debug, Clone, Default)]
pub struct TimerSet {
    timers: Vec<(TimerKind, Timer<TimerEvent>)>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a timer, replacing any existing one of the same kind
    pub fn insert(&mut self, kind: TimerKind, timer: Timer<TimerEvent>) {
        match self.timers.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, slot)) => *slot = timer,
            None => self.timers.push((kind, timer)),
        }
    }

    pub fn get(&self, kind: TimerKind) -> Option<&Timer<TimerEvent>> {
        self.timers.iter().find(|(k, _)| *k == kind).map(|(_, t)| t)
    }

    pub fn get_mut(&mut self, kind: TimerKind) -> Option<&mut Timer<TimerEvent>> {
        self.timers.iter_mut().find(|(k, _)| *k == kind).map(|(_, t)| t)
    }

    /// Missing timers count as disarmed
    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.get(kind).is_some_and(|t| t.is_armed())
    }

    pub fn start(&mut self, kind: TimerKind, duration: Option<u32>) {
        if let Some(timer) = self.get_mut(kind) {
            timer.start(duration);
        }
    }

    pub fn stop(&mut self, kind: TimerKind) {
        if let Some(timer) = self.get_mut(kind) {
            timer.stop();
        }
    }

    /// Stop every timer, e.g. when the owner dies
    pub fn stop_all(&mut self) {
        for (_, timer) in &mut self.timers {
            timer.stop();
        }
    }

    /// Advance every armed timer by one tick and collect what fired
    pub fn advance_armed(&mut self) -> Vec<(TimerKind, TimerEvent)> {
        let mut fired = Vec::new();
        for (kind, timer) in &mut self.timers {
            if !timer.is_armed() {
                continue;
            }
            if let Some(event) = timer.advance(1).into_event() {
                fired.push((*kind, event));
            }
        }
        fired
    }

    pub fn kinds(&self) -> impl Iterator<Item = TimerKind> + '_ {
        self.timers.iter().map(|(k, _)| *k)
    }
}
