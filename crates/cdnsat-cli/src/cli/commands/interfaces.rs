//! `cdnsat interfaces` – print one counter snapshot.

use anyhow::Result;
use cdnsat_core::sampler::{CounterSource, SysinfoCounters};

pub fn run_interfaces() -> Result<()> {
    let snap = SysinfoCounters::new().snapshot()?;
    println!("  {:<16}  {:>16}  {:>16}", "Interface", "Received", "Sent");
    println!("  {}  {}  {}", "-".repeat(16), "-".repeat(16), "-".repeat(16));
    for (name, c) in snap.iter() {
        println!("  {:<16}  {:>16}  {:>16}", name, c.received, c.sent);
    }
    Ok(())
}
