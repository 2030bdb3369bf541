//! CLI command handlers. Each command is in its own file.

mod config;
mod interfaces;
mod run;

pub use config::run_config;
pub use interfaces::run_interfaces;
pub use run::{run_saturate, RunOverrides};
