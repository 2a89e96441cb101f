//! Fixed-interval movement clock
//!
//! Accumulates frame time and converts it into discrete movement ticks. The
//! leftover fraction is exposed as `progress` for render interpolation only.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_CATCH_UP_TICKS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementClock {
    interval: f32,
    timer: f32,
}

impl MovementClock {
    /// # Panics
    /// If `interval` is not positive.
    pub fn new(interval: f32) -> Self {
        assert!(interval > 0.0, "tick interval must be positive");
        Self {
            interval,
            timer: 0.0,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Accumulate `dt` seconds and return how many ticks elapsed
    ///
    /// At most `MAX_CATCH_UP_TICKS` are returned; whole intervals beyond that
    /// are dropped, only the fractional remainder is kept.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.timer += dt.max(0.0);
        if self.timer < self.interval {
            return 0;
        }
        let elapsed = (self.timer / self.interval).floor();
        self.timer = (self.timer - elapsed * self.interval).max(0.0);
        if self.timer >= self.interval {
            // Precision loss on huge timers
            self.timer = self.timer.rem_euclid(self.interval);
        }
        // Float to int casts saturate
        (elapsed as u32).min(MAX_CATCH_UP_TICKS)
    }

    /// Time since the last tick as a fraction of the interval, in [0, 1)
    pub fn progress(&self) -> f32 {
        (self.timer / self.interval).clamp(0.0, 1.0 - f32::EPSILON)
    }
}
