pub mod perception;
pub mod random;
pub mod tick;
pub mod timer;

pub use perception::{within_proximity, ViewCone};
pub use random::RandomSource;
pub use tick::{run_simulation_tick, SimulationEvent};
pub use timer::{Advance, Timer, TimerMode};
