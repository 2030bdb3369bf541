//! Point-in-time cumulative byte counters per network interface.

use std::collections::BTreeMap;

/// Cumulative counters of one interface since it came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterfaceCounters {
    pub received: u64,
    pub sent: u64,
}

/// Interface name -> cumulative counters, as reported by the OS at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InterfaceCounterSnapshot {
    interfaces: BTreeMap<String, InterfaceCounters>,
}

impl InterfaceCounterSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, received: u64, sent: u64) {
        self.interfaces
            .insert(name.into(), InterfaceCounters { received, sent });
    }

    pub fn get(&self, name: &str) -> Option<&InterfaceCounters> {
        self.interfaces.get(name)
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    /// Interfaces in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InterfaceCounters)> {
        self.interfaces.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<S: Into<String>> FromIterator<(S, u64, u64)> for InterfaceCounterSnapshot {
    fn from_iter<I: IntoIterator<Item = (S, u64, u64)>>(iter: I) -> Self {
        let mut snap = Self::new();
        for (name, received, sent) in iter {
            snap.insert(name, received, sent);
        }
        snap
    }
}

/// Failure to read interface counters. Fatal for the process.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("reading interface counters: {0}")]
    Read(String),
}

/// Source of interface counter snapshots (the OS, or a fixture in tests).
pub trait CounterSource {
    fn snapshot(&mut self) -> Result<InterfaceCounterSnapshot, SampleError>;
}

/// Reads counters through `sysinfo`. A fresh interface list is taken on every
/// call so that hot-plugged interfaces appear and vanished ones disappear.
/// A host with no visible interfaces yields an empty snapshot, which reads as
/// zero throughput.
#[derive(Debug, Default)]
pub struct SysinfoCounters;

impl SysinfoCounters {
    pub fn new() -> Self {
        Self
    }
}

impl CounterSource for SysinfoCounters {
    fn snapshot(&mut self) -> Result<InterfaceCounterSnapshot, SampleError> {
        let networks = sysinfo::Networks::new_with_refreshed_list();
        let snap: InterfaceCounterSnapshot = networks
            .list()
            .iter()
            .map(|(name, data)| (name.as_str(), data.total_received(), data.total_transmitted()))
            .collect();
        if snap.is_empty() {
            tracing::debug!("no network interfaces visible");
        }
        Ok(snap)
    }
}
