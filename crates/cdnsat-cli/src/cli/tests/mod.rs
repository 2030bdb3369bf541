//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn cli_parse_run_defaults() {
    match parse(&["cdnsat", "run"]) {
        CliCommand::Run {
            url,
            workers,
            interval,
            user_agent,
        } => {
            assert!(url.is_none());
            assert!(workers.is_none());
            assert!(interval.is_none());
            assert!(user_agent.is_none());
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_overrides() {
    match parse(&[
        "cdnsat",
        "run",
        "--url",
        "https://example.test/f.ico",
        "--workers",
        "3",
        "--interval",
        "0.5",
        "--user-agent",
        "probe",
    ]) {
        CliCommand::Run {
            url,
            workers,
            interval,
            user_agent,
        } => {
            assert_eq!(url.as_deref(), Some("https://example.test/f.ico"));
            assert_eq!(workers, Some(3));
            assert_eq!(interval, Some(0.5));
            assert_eq!(user_agent.as_deref(), Some("probe"));
        }
        _ => panic!("expected Run with overrides"),
    }
}

#[test]
fn cli_parse_interfaces_and_config() {
    assert!(matches!(parse(&["cdnsat", "interfaces"]), CliCommand::Interfaces));
    assert!(matches!(parse(&["cdnsat", "config"]), CliCommand::Config));
}

#[test]
fn cli_rejects_bad_worker_count() {
    assert!(Cli::try_parse_from(["cdnsat", "run", "--workers", "many"]).is_err());
    assert!(Cli::try_parse_from(["cdnsat"]).is_err(), "a subcommand is required");
}
