//! Download fleet: N workers repeatedly GET one target and drain the bodies.
//!
//! All workers share a single `curl::multi` handle driven from the calling
//! thread, which makes the multi event loop the cooperative scheduler: a
//! worker only suspends on socket I/O and when its finished handle is handed
//! back to the loop for the next request.

mod arm;
mod handler;
mod run;

pub use run::run_fleet;

use std::time::Duration;

/// Curl transfer options applied to every worker handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    /// Hard limit for one request; `None` = no limit.
    pub timeout: Option<Duration>,
    /// Certificate and host name validation.
    pub verify_tls: bool,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Some(Duration::from_secs(300)),
            verify_tls: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Running,
    Faulted,
    Cancelled,
}

/// What a completed request means for the worker that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// 200: the body was drained; this is the load.
    Drained,
    /// Anything else: warn and go again.
    Unexpected(u32),
}

pub fn classify_response(status: u32) -> ResponseOutcome {
    if status == 200 {
        ResponseOutcome::Drained
    } else {
        ResponseOutcome::Unexpected(status)
    }
}

/// One worker's identity, state and counters. Owned by the fleet run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerHandle {
    pub index: usize,
    pub state: WorkerState,
    pub requests: u64,
    pub ok_responses: u64,
    pub other_responses: u64,
    /// Body bytes drained from 200 responses.
    pub bytes: u64,
}

impl WorkerHandle {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            state: WorkerState::Running,
            requests: 0,
            ok_responses: 0,
            other_responses: 0,
            bytes: 0,
        }
    }

    /// Account for one completed request.
    pub fn record(&mut self, status: u32, bytes: u64) -> ResponseOutcome {
        self.requests += 1;
        let outcome = classify_response(status);
        match outcome {
            ResponseOutcome::Drained => {
                self.ok_responses += 1;
                self.bytes += bytes;
            }
            ResponseOutcome::Unexpected(_) => self.other_responses += 1,
        }
        outcome
    }
}

/// Per-worker totals of a fleet run that ended by stop request.
#[derive(Debug, Clone, Default)]
pub struct FleetSummary {
    pub workers: Vec<WorkerHandle>,
}

impl FleetSummary {
    pub fn requests(&self) -> u64 {
        self.workers.iter().map(|w| w.requests).sum()
    }

    pub fn ok_responses(&self) -> u64 {
        self.workers.iter().map(|w| w.ok_responses).sum()
    }

    pub fn other_responses(&self) -> u64 {
        self.workers.iter().map(|w| w.other_responses).sum()
    }

    pub fn bytes(&self) -> u64 {
        self.workers.iter().map(|w| w.bytes).sum()
    }
}
