//! Process supervisor: runs the sampler beside the fleet and restarts the
//! whole process on the first fatal error from either.
//!
//! There is no in-process recovery. Every fatal path goes through the
//! [`FatalGate`], which writes one fatal line and replaces the process image.

mod restart;

pub use restart::{ExecRestarter, FatalGate, Restarter};

use anyhow::{anyhow, bail, Result};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::SaturateConfig;
use crate::control::StopToken;
use crate::downloader::{self, CurlOptions, FleetSummary};
use crate::report::ReportSink;
use crate::sampler::{CounterSource, Sampler};
use crate::target::Target;

/// How a supervised run ended without the process being replaced.
#[derive(Debug)]
pub enum RunOutcome {
    /// The stop token was set from outside; no fault occurred.
    Stopped(FleetSummary),
    /// A fatal error tripped the gate and the restarter returned.
    Restarted,
}

pub struct Supervisor {
    target: Target,
    workers: usize,
    interval: Duration,
    curl: CurlOptions,
    sink: Arc<dyn ReportSink>,
    restarter: Arc<dyn Restarter>,
}

impl Supervisor {
    /// Fails for an empty fleet or a zero sampling interval.
    pub fn new(
        target: Target,
        workers: usize,
        interval: Duration,
        curl: CurlOptions,
        sink: Arc<dyn ReportSink>,
        restarter: Arc<dyn Restarter>,
    ) -> Result<Self> {
        if workers == 0 {
            bail!("supervisor needs at least one worker");
        }
        if interval.is_zero() {
            bail!("sampling interval must be positive");
        }
        Ok(Self {
            target,
            workers,
            interval,
            curl,
            sink,
            restarter,
        })
    }

    /// Build from a validated config.
    pub fn from_config(
        cfg: &SaturateConfig,
        sink: Arc<dyn ReportSink>,
        restarter: Arc<dyn Restarter>,
    ) -> Result<Self> {
        cfg.validate()?;
        Self::new(
            cfg.target()?,
            cfg.workers,
            cfg.sample_interval(),
            cfg.curl_options(),
            sink,
            restarter,
        )
    }

    /// Starts the sampler thread, runs the fleet on this thread, and routes
    /// the first fatal error to a restart. Returns `Err` only if the restart
    /// itself failed.
    pub fn run<C>(&self, source: C, stop: StopToken) -> Result<RunOutcome>
    where
        C: CounterSource + Send + 'static,
    {
        self.sink.banner(&self.target, self.workers, self.interval);
        let gate = Arc::new(FatalGate::new(
            Arc::clone(&self.sink),
            Arc::clone(&self.restarter),
            stop.clone(),
        ));

        let sampler = match Sampler::new(source, self.interval) {
            Ok(s) => s,
            Err(e) => {
                gate.trip(anyhow!(e).context("throughput sampler"))?;
                return Ok(RunOutcome::Restarted);
            }
        };
        let sampler_thread = {
            let sink = Arc::clone(&self.sink);
            let gate = Arc::clone(&gate);
            let stop = stop.clone();
            thread::Builder::new()
                .name("throughput-sampler".into())
                .spawn(move || {
                    let run = panic::catch_unwind(AssertUnwindSafe(|| {
                        sampler.run(sink.as_ref(), &stop)
                    }));
                    let fault = match run {
                        Ok(Ok(())) => return,
                        Ok(Err(e)) => anyhow!(e).context("throughput sampler"),
                        Err(payload) => {
                            anyhow!("throughput sampler panicked: {}", panic_message(&*payload))
                        }
                    };
                    // The fleet owns the caller's thread, so a failed restart
                    // cannot be handed back from here.
                    if let Err(restart_err) = gate.trip(fault) {
                        tracing::error!("restart from sampler failed: {:#}", restart_err);
                        std::process::exit(1);
                    }
                })?
        };

        let fleet = panic::catch_unwind(AssertUnwindSafe(|| {
            downloader::run_fleet(&self.target, self.workers, self.curl, self.sink.as_ref(), &stop)
        }));
        let summary = match fleet {
            Ok(Ok(summary)) => Some(summary),
            Ok(Err(e)) => {
                gate.trip(anyhow!(e).context("download fleet"))?;
                None
            }
            Err(payload) => {
                gate.trip(anyhow!("download fleet panicked: {}", panic_message(&*payload)))?;
                None
            }
        };

        stop.stop();
        if let Err(payload) = sampler_thread.join() {
            gate.trip(anyhow!("throughput sampler panicked: {}", panic_message(&*payload)))?;
        }

        match summary {
            Some(summary) if !gate.is_tripped() => Ok(RunOutcome::Stopped(summary)),
            _ => Ok(RunOutcome::Restarted),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_message_variants() {
        let a: Box<dyn Any + Send> = Box::new("boom");
        let b: Box<dyn Any + Send> = Box::new(String::from("bang"));
        let c: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(&*a), "boom");
        assert_eq!(panic_message(&*b), "bang");
        assert_eq!(panic_message(&*c), "unknown panic");
    }
}
