//! Tick-driven countdown timers
//!
//! A timer carries the event it should deliver instead of a callback. When it
//! fires, [`Timer::advance`] hands the event back to the owner, which
//! dispatches it after it has finished advancing its timers. A fired event
//! can therefore never re-enter `advance` on the timer that produced it.

use serde::{Deserialize, Serialize};

/// What happens to the armed flag after firing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimerMode {
    /// Disarms itself after firing
    #[default]
    OneShot,
    /// Stays armed and starts the next countdown from the default
    Repeating,
}

/// Outcome of one [`Timer::advance`] call
#[derive(Debug, Clone, PartialEq)]
pub enum Advance<E> {
    /// Still counting down
    Pending,
    /// Expired; carries the captured event, if one was set
    Fired(Option<E>),
}

impl<E> Advance<E> {
    pub fn fired(&self) -> bool {
        matches!(self, Advance::Fired(_))
    }

    pub fn into_event(self) -> Option<E> {
        match self {
            Advance::Fired(event) => event,
            Advance::Pending => None,
        }
    }
}

/// Countdown timer owned by a single entity
#[derive(Debug, Clone, PartialEq)]
pub struct Timer<E> {
    remaining: i64,
    default: u32,
    armed: bool,
    mode: TimerMode,
    event: Option<E>,
}

impl<E: Clone> Timer<E> {
    /// Disarmed one-shot timer with no event
    pub fn new(default: u32) -> Self {
        Self {
            remaining: default as i64,
            default,
            armed: false,
            mode: TimerMode::OneShot,
            event: None,
        }
    }

    /// Disarmed one-shot timer that delivers `event`
    pub fn with_event(default: u32, event: E) -> Self {
        Self {
            event: Some(event),
            ..Self::new(default)
        }
    }

    pub fn repeating(mut self) -> Self {
        self.mode = TimerMode::Repeating;
        self
    }

    /// Arm the timer. An override replaces the remaining count; without one
    /// the countdown continues from wherever it currently stands.
    pub fn start(&mut self, duration: Option<u32>) {
        self.armed = true;
        if let Some(duration) = duration {
            self.remaining = duration as i64;
        }
    }

    /// Disarm without touching the remaining count
    pub fn stop(&mut self) {
        self.armed = false;
    }

    pub fn reset(&mut self) {
        self.remaining = self.default as i64;
    }

    /// Count down by `delta`, or fire if already at zero
    pub fn advance(&mut self, delta: u32) -> Advance<E> {
        if self.remaining > 0 {
            self.remaining -= delta as i64;
            return Advance::Pending;
        }

        if self.mode == TimerMode::OneShot {
            self.stop();
        }
        let event = self.event.clone();
        self.reset();
        Advance::Fired(event)
    }

    /// Replace the event delivered on the next firing
    pub fn set_event(&mut self, event: E) {
        self.event = Some(event);
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    pub fn default_duration(&self) -> u32 {
        self.default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Ping {
        Hello(u32, &'static str),
    }

    fn run(timer: &mut Timer<Ping>, times: u32) -> Vec<Option<Ping>> {
        (0..times)
            .filter_map(|_| match timer.advance(1) {
                Advance::Fired(event) => Some(event),
                Advance::Pending => None,
            })
            .collect()
    }

    #[test]
    fn test_fires_once_after_duration_plus_one() {
        let mut timer = Timer::new(5);
        timer.set_event(Ping::Hello(7, "args"));
        timer.start(None);

        let fired = run(&mut timer, 6);

        assert_eq!(fired, vec![Some(Ping::Hello(7, "args"))]);
    }

    #[test]
    fn test_not_fired_before_expiry() {
        let mut timer = Timer::with_event(3, Ping::Hello(0, ""));
        timer.start(None);
        assert!(run(&mut timer, 3).is_empty());
        assert_eq!(timer.remaining(), 0);
        assert!(timer.advance(1).fired());
    }

    #[test]
    fn test_one_shot_disarms() {
        let mut timer: Timer<Ping> = Timer::new(2);
        timer.start(None);
        run(&mut timer, 3);
        assert!(!timer.is_armed());
        assert_eq!(timer.remaining(), 2);
    }

    #[test]
    fn test_repeating_stays_armed_and_resets() {
        let mut timer = Timer::with_event(2, Ping::Hello(1, "r")).repeating();
        timer.start(None);

        let fired = run(&mut timer, 9);

        assert_eq!(fired.len(), 3);
        assert!(timer.is_armed());
        assert_eq!(timer.remaining(), 2);
    }

    #[test]
    fn test_start_override_replaces_remaining() {
        let mut timer: Timer<Ping> = Timer::new(100);
        timer.start(Some(1));
        assert_eq!(timer.remaining(), 1);
        assert!(!timer.advance(1).fired());
        assert!(timer.advance(1).fired());
        // Reset goes back to the default, not the override
        assert_eq!(timer.remaining(), 100);
    }

    #[test]
    fn test_start_without_override_resumes() {
        let mut timer: Timer<Ping> = Timer::new(10);
        timer.start(None);
        run(&mut timer, 4);
        timer.stop();
        assert_eq!(timer.remaining(), 6);
        timer.start(None);
        assert_eq!(timer.remaining(), 6);
    }

    #[test]
    fn test_zero_duration_fires_every_advance() {
        let mut timer = Timer::with_event(0, Ping::Hello(0, "z")).repeating();
        timer.start(None);
        assert_eq!(run(&mut timer, 4).len(), 4);
    }

    #[test]
    fn test_fires_without_event() {
        let mut timer: Timer<Ping> = Timer::new(0);
        timer.start(None);
        assert_eq!(timer.advance(1), Advance::Fired(None));
    }

    #[test]
    fn test_large_delta_overshoots_then_fires() {
        let mut timer: Timer<Ping> = Timer::new(3);
        timer.start(None);
        assert!(!timer.advance(5).fired());
        assert_eq!(timer.remaining(), -2);
        assert!(timer.advance(5).fired());
    }
}
