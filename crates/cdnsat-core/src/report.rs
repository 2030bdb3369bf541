//! Console report sink: banner, throughput lines, warnings, the fatal line.

use std::io::Write;
use std::time::Duration;

use crate::sampler::ThroughputReading;
use crate::target::Target;

/// Destination for everything the user sees. Shared between the fleet (main
/// thread) and the sampler thread.
pub trait ReportSink: Send + Sync {
    /// Startup line; printed once per process generation.
    fn banner(&self, target: &Target, workers: usize, interval: Duration);
    /// One throughput reading per sampling interval.
    fn reading(&self, reading: &ThroughputReading);
    /// Non-fatal: a worker got a status other than 200 and keeps going.
    fn http_status(&self, worker: usize, status: u32);
    /// The single fatal line written right before the process restarts.
    fn fatal(&self, error: &anyhow::Error);
}

pub fn format_banner(target: &Target, workers: usize, interval: Duration) -> String {
    format!(
        "cdnsat: {} workers -> {} (sampling every {:.1}s)",
        workers,
        target.url(),
        interval.as_secs_f64()
    )
}

pub fn format_http_status(worker: usize, status: u32) -> String {
    format!("Failed to download file: HTTP {} (worker {})", status, worker)
}

pub fn format_fatal(error: &anyhow::Error) -> String {
    format!("Critical error occurred: {:#}. Restarting the program.", error)
}

/// Prints to stdout/stderr and mirrors each line into the log.
#[derive(Debug, Default)]
pub struct ConsoleReport;

impl ReportSink for ConsoleReport {
    fn banner(&self, target: &Target, workers: usize, interval: Duration) {
        tracing::info!(workers, url = target.url(), "fleet starting");
        println!("{}", format_banner(target, workers, interval));
    }

    fn reading(&self, reading: &ThroughputReading) {
        tracing::debug!(
            received = reading.received_bytes,
            sent = reading.sent_bytes,
            "throughput reading"
        );
        println!("{}", reading);
    }

    fn http_status(&self, worker: usize, status: u32) {
        tracing::warn!(worker, status, "non-200 response");
        eprintln!("{}", format_http_status(worker, status));
    }

    fn fatal(&self, error: &anyhow::Error) {
        tracing::error!("fatal: {:#}", error);
        eprintln!("{}", format_fatal(error));
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
    }
}
