//! The sampling contract shared by every performance statistic.

use std::time::Instant;

use crate::error::Result;
use crate::rate::RateCounter;

/// A source of a single scalar "current value" for an OS performance counter.
///
/// Every call advances internal state, so two calls in quick succession can
/// differ even if the system did nothing. Implementations only fail when the
/// underlying source itself can no longer be read.
pub trait PerformanceStatistic: Send {
    fn next_value(&mut self) -> Result<f32>;
}

/// A monotonically increasing total (until reset) that needs differencing.
pub trait CumulativeCounter: Send {
    fn read_cumulative(&mut self) -> Result<i64>;
}

/// Turns a [`CumulativeCounter`] into a per-second [`PerformanceStatistic`].
#[derive(Debug)]
pub struct PerSecondStatistic<C> {
    counter: C,
    rate: RateCounter,
}

impl<C: CumulativeCounter> PerSecondStatistic<C> {
    pub fn new(counter: C) -> Self {
        Self {
            counter,
            rate: RateCounter::new(),
        }
    }

    pub fn counter(&self) -> &C {
        &self.counter
    }
}

impl<C: CumulativeCounter> PerformanceStatistic for PerSecondStatistic<C> {
    fn next_value(&mut self) -> Result<f32> {
        let total = self.counter.read_cumulative()?;
        Ok(self.rate.next(total, Instant::now()))
    }
}
