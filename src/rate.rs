//! Per-second rate derivation from a cumulative counter.
//!
//! A [`RateCounter`] remembers exactly one prior [`Sample`] and turns each new
//! cumulative reading into `(value - previous) / elapsed_seconds`.

use std::time::Instant;
use tracing::{debug, warn};

/// A cumulative counter reading paired with the instant it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub value: i64,
    pub taken_at: Instant,
}

/// Converts successive cumulative readings into a per-second rate.
///
/// The first reading only seeds the counter and yields `0.0`. A clock that
/// did not advance yields `0.0`. A counter that went backwards (reset on the
/// data source) yields a negative rate, passed through unchanged.
///
/// One instance per metric stream. `next` takes `&mut self`; wrap the owner
/// in a lock to share it across threads.
#[derive(Debug, Default)]
pub struct RateCounter {
    previous: Option<Sample>,
}

impl RateCounter {
    pub fn new() -> Self {
        Self { previous: None }
    }

    /// Returns the last stored sample, if any reading has been seen.
    pub fn previous(&self) -> Option<Sample> {
        self.previous
    }

    /// Records `value` taken at `now` and returns the rate since the prior reading.
    pub fn next(&mut self, value: i64, now: Instant) -> f32 {
        let current = Sample {
            value,
            taken_at: now,
        };

        match self.previous.replace(current) {
            None => {
                debug!("First sample seeded with cumulative value {}", value);
                0.0
            }
            Some(previous) => {
                // checked_duration_since is None when the clock went backwards
                let elapsed = now
                    .checked_duration_since(previous.taken_at)
                    .map(|d| d.as_secs_f64())
                    .unwrap_or(0.0);

                if elapsed <= 0.0 {
                    debug!("Clock did not advance between samples, reporting 0");
                    0.0
                } else {
                    let delta = value.wrapping_sub(previous.value);
                    if delta < 0 {
                        warn!(
                            "Cumulative counter went backwards ({} -> {}), reporting negative rate",
                            previous.value, value
                        );
                    }
                    (delta as f64 / elapsed) as f32
                }
            }
        }
    }

    /// Forgets the stored sample; the next reading bootstraps again.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}
