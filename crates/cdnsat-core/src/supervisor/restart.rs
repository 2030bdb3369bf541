//! Full-process restart and the once-only fatal gate in front of it.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::control::StopToken;
use crate::report::ReportSink;

/// Replaces the running process with a fresh instance of itself.
pub trait Restarter: Send + Sync {
    /// Only returns on failure, or for test doubles that record the call.
    fn restart(&self) -> Result<()>;
}

/// Re-executes the current binary with the original arguments via `exec`.
#[derive(Debug, Clone)]
pub struct ExecRestarter {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ExecRestarter {
    /// Captures `current_exe()` and the arguments this process was started with.
    pub fn current() -> Result<Self> {
        let program = std::env::current_exe().context("resolve current executable")?;
        Ok(Self {
            program,
            args: std::env::args_os().skip(1).collect(),
        })
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }
}

impl Restarter for ExecRestarter {
    #[cfg(unix)]
    fn restart(&self) -> Result<()> {
        use std::os::unix::process::CommandExt;

        tracing::info!(program = %self.program.display(), "re-executing");
        let err = std::process::Command::new(&self.program)
            .args(&self.args)
            .exec();
        Err(err).with_context(|| format!("exec {}", self.program.display()))
    }

    #[cfg(not(unix))]
    fn restart(&self) -> Result<()> {
        tracing::info!(program = %self.program.display(), "respawning");
        std::process::Command::new(&self.program)
            .args(&self.args)
            .spawn()
            .with_context(|| format!("spawn {}", self.program.display()))?;
        std::process::exit(0);
    }
}

/// Funnels every fatal error of a process generation into at most one restart.
///
/// The first `trip` writes the fatal line, sets the stop token so the other
/// component unwinds, and calls the restarter. Later trips only log.
pub struct FatalGate {
    tripped: AtomicBool,
    sink: Arc<dyn ReportSink>,
    restarter: Arc<dyn Restarter>,
    stop: StopToken,
}

impl FatalGate {
    pub fn new(sink: Arc<dyn ReportSink>, restarter: Arc<dyn Restarter>, stop: StopToken) -> Self {
        Self {
            tripped: AtomicBool::new(false),
            sink,
            restarter,
            stop,
        }
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::Acquire)
    }

    pub fn trip(&self, error: anyhow::Error) -> Result<()> {
        if self.tripped.swap(true, Ordering::AcqRel) {
            tracing::debug!("fatal error after restart already requested: {:#}", error);
            return Ok(());
        }
        self.sink.fatal(&error);
        self.stop.stop();
        self.restarter.restart()
    }
}
