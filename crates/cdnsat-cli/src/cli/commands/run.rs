//! `cdnsat run` – start the supervisor: sampler thread plus download fleet.

use anyhow::{bail, Result};
use cdnsat_core::config::SaturateConfig;
use cdnsat_core::control::StopToken;
use cdnsat_core::report::ConsoleReport;
use cdnsat_core::sampler::SysinfoCounters;
use cdnsat_core::supervisor::{ExecRestarter, RunOutcome, Supervisor};
use std::sync::Arc;

/// Per-run values from the command line; they win over config.toml.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunOverrides {
    pub url: Option<String>,
    pub workers: Option<usize>,
    pub interval: Option<f64>,
    pub user_agent: Option<String>,
}

impl RunOverrides {
    pub fn apply(self, mut cfg: SaturateConfig) -> SaturateConfig {
        if let Some(url) = self.url {
            cfg.url = url;
        }
        if let Some(workers) = self.workers {
            cfg.workers = workers;
        }
        if let Some(interval) = self.interval {
            cfg.sample_interval_secs = interval;
        }
        if let Some(ua) = self.user_agent {
            cfg.user_agent = ua;
        }
        cfg
    }
}

pub fn run_saturate(cfg: SaturateConfig, overrides: RunOverrides) -> Result<()> {
    let cfg = overrides.apply(cfg);
    let restarter = Arc::new(ExecRestarter::current()?);
    tracing::debug!(args = ?restarter.args(), "restart command captured");
    let supervisor = Supervisor::from_config(&cfg, Arc::new(ConsoleReport), restarter)?;

    match supervisor.run(SysinfoCounters::new(), StopToken::new())? {
        // exec only hands control back when it fails, and that surfaces as Err above.
        RunOutcome::Restarted => bail!("restart returned without replacing the process"),
        RunOutcome::Stopped(summary) => {
            tracing::info!(requests = summary.requests(), "run stopped");
            Ok(())
        }
    }
}
