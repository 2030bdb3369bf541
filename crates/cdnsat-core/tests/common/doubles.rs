//! Test doubles: recording report sink, scripted counters, recording restarter.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use cdnsat_core::report::ReportSink;
use cdnsat_core::sampler::{CounterSource, InterfaceCounterSnapshot, SampleError, ThroughputReading};
use cdnsat_core::supervisor::Restarter;
use cdnsat_core::target::Target;

#[derive(Debug, Clone)]
pub enum Event {
    Banner,
    Reading(ThroughputReading),
    HttpStatus { worker: usize, status: u32 },
    Fatal(String),
}

#[derive(Debug, Default)]
pub struct RecordingReport {
    events: Mutex<Vec<Event>>,
    panic_on_status: bool,
}

impl RecordingReport {
    /// A sink whose `http_status` panics, to blow up the fleet thread.
    pub fn panicking_on_status() -> Self {
        Self {
            panic_on_status: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn banners(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Banner))
            .count()
    }

    pub fn readings(&self) -> Vec<ThroughputReading> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Reading(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    pub fn http_statuses(&self) -> Vec<(usize, u32)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::HttpStatus { worker, status } => Some((worker, status)),
                _ => None,
            })
            .collect()
    }

    pub fn fatals(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Fatal(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    fn push(&self, e: Event) {
        self.events.lock().unwrap().push(e);
    }
}

impl ReportSink for RecordingReport {
    fn banner(&self, _target: &Target, _workers: usize, _interval: Duration) {
        self.push(Event::Banner);
    }

    fn reading(&self, reading: &ThroughputReading) {
        self.push(Event::Reading(reading.clone()));
    }

    fn http_status(&self, worker: usize, status: u32) {
        if self.panic_on_status {
            panic!("status sink exploded on HTTP {}", status);
        }
        self.push(Event::HttpStatus { worker, status });
    }

    fn fatal(&self, error: &anyhow::Error) {
        self.push(Event::Fatal(format!("{:#}", error)));
    }
}

/// Counters that grow by a fixed amount per read; `fail_after` reads succeed,
/// every later read fails (or panics, with `panic_after`).
#[derive(Debug)]
pub struct FakeCounters {
    reads: u64,
    fail_after: Option<u64>,
    panic_after: Option<u64>,
}

impl FakeCounters {
    pub const RX_STEP: u64 = 1_000_000;
    pub const TX_STEP: u64 = 10_000;

    pub fn new() -> Self {
        Self {
            reads: 0,
            fail_after: None,
            panic_after: None,
        }
    }

    pub fn failing_after(reads: u64) -> Self {
        Self {
            fail_after: Some(reads),
            ..Self::new()
        }
    }

    pub fn panicking_after(reads: u64) -> Self {
        Self {
            panic_after: Some(reads),
            ..Self::new()
        }
    }
}

impl CounterSource for FakeCounters {
    fn snapshot(&mut self) -> Result<InterfaceCounterSnapshot, SampleError> {
        if let Some(limit) = self.fail_after {
            if self.reads >= limit {
                return Err(SampleError::Read("counter api unavailable".into()));
            }
        }
        if let Some(limit) = self.panic_after {
            if self.reads >= limit {
                panic!("counter source gave up after {} reads", limit);
            }
        }
        let n = self.reads;
        self.reads += 1;
        Ok([
            ("eth0", n * Self::RX_STEP, n * Self::TX_STEP),
            ("lo", 42, 42),
        ]
        .into_iter()
        .collect())
    }
}

#[derive(Debug, Default)]
pub struct RecordingRestarter {
    restarts: AtomicUsize,
}

impl RecordingRestarter {
    pub fn restarts(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }
}

impl Restarter for RecordingRestarter {
    fn restart(&self) -> anyhow::Result<()> {
        self.restarts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
