//! Error returned by a fleet run.

use super::classify::{classify_curl_error, FaultKind};

/// Why the fleet stopped. Every variant is fatal and leads to a process restart.
#[derive(Debug, thiserror::Error)]
pub enum FleetError {
    /// A worker's transfer failed (reset, DNS, TLS, timeout, ...).
    #[error("worker {worker} faulted ({kind})")]
    Worker {
        worker: usize,
        kind: FaultKind,
        #[source]
        source: curl::Error,
    },
    /// A worker's handle could not be configured.
    #[error("worker {worker} setup failed")]
    Setup {
        worker: usize,
        #[source]
        source: curl::Error,
    },
    /// The shared multi handle failed; no single worker is to blame.
    #[error("curl multi handle failed")]
    Multi(#[from] curl::MultiError),
}

impl FleetError {
    pub fn worker_fault(worker: usize, source: curl::Error) -> Self {
        FleetError::Worker {
            worker,
            kind: classify_curl_error(&source),
            source,
        }
    }

    /// Index of the worker that failed, if the failure belongs to one.
    pub fn worker(&self) -> Option<usize> {
        match self {
            FleetError::Worker { worker, .. } | FleetError::Setup { worker, .. } => Some(*worker),
            FleetError::Multi(_) => None,
        }
    }

    pub fn kind(&self) -> FaultKind {
        match self {
            FleetError::Worker { kind, .. } => *kind,
            FleetError::Setup { .. } | FleetError::Multi(_) => FaultKind::Other,
        }
    }
}
