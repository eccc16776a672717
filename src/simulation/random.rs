//! Random source consumed by enemy wandering

use rand::Rng;

/// Uniform randomness the simulation needs
pub trait RandomSource {
    /// Float in [0, 1)
    fn next_f32(&mut self) -> f32;

    /// Integer in `low..=high`
    fn range_inclusive(&mut self, low: i32, high: i32) -> i32;

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}

impl<R: Rng> RandomSource for R {
    fn next_f32(&mut self) -> f32 {
        self.gen::<f32>()
    }

    fn range_inclusive(&mut self, low: i32, high: i32) -> i32 {
        self.gen_range(low..=high)
    }
}
