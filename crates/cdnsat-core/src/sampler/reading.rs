//! Throughput derived from two consecutive snapshots.

use std::fmt;
use std::time::Duration;

use super::snapshot::InterfaceCounterSnapshot;

const MIB: f64 = 1024.0 * 1024.0;

/// Host-wide throughput over one sampling interval.
#[derive(Debug, Clone, PartialEq)]
pub struct ThroughputReading {
    /// Bytes received across interfaces present in both snapshots.
    pub received_bytes: u64,
    /// Bytes sent across interfaces present in both snapshots.
    pub sent_bytes: u64,
    pub interval: Duration,
    /// Interfaces whose counters went backwards this tick (reset or replaced);
    /// they were left out of both sums.
    pub reset_interfaces: Vec<String>,
}

impl ThroughputReading {
    pub fn received_per_sec(&self) -> f64 {
        per_sec(self.received_bytes, self.interval)
    }

    pub fn sent_per_sec(&self) -> f64 {
        per_sec(self.sent_bytes, self.interval)
    }

    pub fn received_mib_s(&self) -> f64 {
        self.received_per_sec() / MIB
    }

    pub fn sent_mib_s(&self) -> f64 {
        self.sent_per_sec() / MIB
    }
}

fn per_sec(bytes: u64, interval: Duration) -> f64 {
    let secs = interval.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    bytes as f64 / secs
}

impl fmt::Display for ThroughputReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Network speed: received {:.2} MB/s | sent {:.2} MB/s",
            self.received_mib_s(),
            self.sent_mib_s()
        )
    }
}

/// Sums per-interface deltas between `previous` and `current`.
///
/// Only interfaces present in both snapshots count. An interface with either
/// counter lower than before is skipped entirely for this tick and listed in
/// `reset_interfaces`.
pub fn compute_reading(
    previous: &InterfaceCounterSnapshot,
    current: &InterfaceCounterSnapshot,
    interval: Duration,
) -> ThroughputReading {
    let mut received_bytes = 0u64;
    let mut sent_bytes = 0u64;
    let mut reset_interfaces = Vec::new();

    for (name, now) in current.iter() {
        let Some(before) = previous.get(name) else {
            continue;
        };
        match (
            now.received.checked_sub(before.received),
            now.sent.checked_sub(before.sent),
        ) {
            (Some(rx), Some(tx)) => {
                received_bytes = received_bytes.saturating_add(rx);
                sent_bytes = sent_bytes.saturating_add(tx);
            }
            _ => reset_interfaces.push(name.to_string()),
        }
    }

    ThroughputReading {
        received_bytes,
        sent_bytes,
        interval,
        reset_interfaces,
    }
}
