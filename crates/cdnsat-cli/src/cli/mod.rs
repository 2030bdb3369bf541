//! CLI for cdnsat.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cdnsat_core::config;

use commands::{run_config, run_interfaces, run_saturate, RunOverrides};

/// Top-level CLI for the cdnsat throughput tester.
#[derive(Debug, Parser)]
#[command(name = "cdnsat")]
#[command(about = "cdnsat: saturate a link with concurrent downloads and report throughput", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download the target in a loop with N workers and report throughput. Never exits on its own.
    Run {
        /// Override the target URL from config.toml.
        #[arg(long)]
        url: Option<String>,
        /// Override the number of concurrent workers.
        #[arg(long, value_name = "N")]
        workers: Option<usize>,
        /// Override the sampling interval in seconds.
        #[arg(long, value_name = "SECS")]
        interval: Option<f64>,
        /// Override the User-Agent header.
        #[arg(long)]
        user_agent: Option<String>,
    },

    /// Print the current cumulative byte counters of every interface.
    Interfaces,

    /// Show the config file path and the effective configuration.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                url,
                workers,
                interval,
                user_agent,
            } => {
                let overrides = RunOverrides {
                    url,
                    workers,
                    interval,
                    user_agent,
                };
                run_saturate(cfg, overrides)?;
            }
            CliCommand::Interfaces => run_interfaces()?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
