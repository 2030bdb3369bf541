//! Fault taxonomy for the download fleet.
//!
//! Every transfer error is fatal for the process; classification exists so the
//! fatal report and the log say what kind of failure ended the run.

mod classify;
mod error;

pub use classify::{classify_curl_error, FaultKind};
pub use error::FleetError;
