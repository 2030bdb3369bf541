//! `cdnsat config` – show where the config lives and what is in effect.

use anyhow::Result;
use cdnsat_core::config::{self, SaturateConfig};

pub fn run_config(cfg: &SaturateConfig) -> Result<()> {
    println!("# {}", config::config_path()?.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    if let Err(e) = cfg.validate() {
        println!("# warning: {:#}", e);
    }
    Ok(())
}
