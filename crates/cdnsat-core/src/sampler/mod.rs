//! Throughput sampler: reads interface counters every interval and reports
//! the delta-based rate.
//!
//! Runs on its own OS thread for the lifetime of the process. It owns the
//! previous snapshot outright; nothing else reads or writes it.

mod reading;
mod snapshot;

pub use reading::{compute_reading, ThroughputReading};
pub use snapshot::{
    CounterSource, InterfaceCounterSnapshot, InterfaceCounters, SampleError, SysinfoCounters,
};

use std::time::Duration;

use crate::control::StopToken;
use crate::report::ReportSink;

pub struct Sampler<C> {
    source: C,
    interval: Duration,
    previous: InterfaceCounterSnapshot,
}

impl<C: CounterSource> Sampler<C> {
    /// Takes the baseline snapshot the first reading is measured against.
    pub fn new(mut source: C, interval: Duration) -> Result<Self, SampleError> {
        let previous = source.snapshot()?;
        tracing::debug!(interfaces = previous.len(), "sampler baseline taken");
        Ok(Self {
            source,
            interval,
            previous,
        })
    }

    /// Reads a new snapshot, derives the reading against the previous one and
    /// makes the new snapshot the baseline for the next tick.
    pub fn tick(&mut self) -> Result<ThroughputReading, SampleError> {
        let current = self.source.snapshot()?;
        let reading = compute_reading(&self.previous, &current, self.interval);
        if !reading.reset_interfaces.is_empty() {
            tracing::debug!(
                interfaces = ?reading.reset_interfaces,
                "counter went backwards; interface skipped this tick"
            );
        }
        self.previous = current;
        Ok(reading)
    }

    /// Sleep, tick, report; until `stop` is set or a read fails.
    pub fn run(mut self, sink: &dyn ReportSink, stop: &StopToken) -> Result<(), SampleError> {
        loop {
            std::thread::sleep(self.interval);
            if stop.is_stopped() {
                return Ok(());
            }
            let reading = self.tick()?;
            sink.reading(&reading);
        }
    }
}
