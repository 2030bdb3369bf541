use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::downloader::CurlOptions;
use crate::target::Target;

pub const DEFAULT_URL: &str = "https://oss.darklotus.cn/img/2024/10/11/favicon.ico";
pub const DEFAULT_USER_AGENT: &str = "CDN速度测试";
pub const DEFAULT_WORKERS: usize = 10;
pub const DEFAULT_SAMPLE_INTERVAL_SECS: f64 = 2.0;

/// Transfer timeouts (optional `[curl]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurlConfig {
    /// Seconds allowed for TCP + TLS connection setup.
    pub connect_timeout_secs: u64,
    /// Hard limit in seconds for one complete request (0 = no limit).
    pub timeout_secs: u64,
}

impl Default for CurlConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 300,
        }
    }
}

/// Global configuration loaded from `~/.config/cdnsat/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaturateConfig {
    /// Resource fetched by every worker. Non-ASCII path segments are percent-encoded before use.
    pub url: String,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Number of concurrent download workers.
    pub workers: usize,
    /// Seconds between throughput readings.
    pub sample_interval_secs: f64,
    /// Verify TLS certificates. Off by default: the load matters, not the peer identity.
    #[serde(default)]
    pub verify_tls: bool,
    /// Extra request headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Optional transfer timeouts; built-in defaults are used when missing.
    #[serde(default)]
    pub curl: Option<CurlConfig>,
}

impl Default for SaturateConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            workers: DEFAULT_WORKERS,
            sample_interval_secs: DEFAULT_SAMPLE_INTERVAL_SECS,
            verify_tls: false,
            headers: BTreeMap::new(),
            curl: None,
        }
    }
}

impl SaturateConfig {
    /// Rejects settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            bail!("workers must be at least 1");
        }
        if !self.sample_interval_secs.is_finite() || self.sample_interval_secs <= 0.0 {
            bail!(
                "sample_interval_secs must be a positive number, got {}",
                self.sample_interval_secs
            );
        }
        self.target().map(|_| ())
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs_f64(self.sample_interval_secs)
    }

    /// Builds the immutable download target (encoded URL + headers).
    pub fn target(&self) -> Result<Target> {
        let mut target = Target::new(&self.url, &self.user_agent)
            .with_context(|| format!("invalid target url {:?}", self.url))?;
        for (name, value) in &self.headers {
            target = target.with_header(name, value);
        }
        Ok(target)
    }

    pub fn curl_options(&self) -> CurlOptions {
        let curl = self.curl.clone().unwrap_or_default();
        CurlOptions {
            connect_timeout: Duration::from_secs(curl.connect_timeout_secs),
            timeout: (curl.timeout_secs > 0).then(|| Duration::from_secs(curl.timeout_secs)),
            verify_tls: self.verify_tls,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("cdnsat")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SaturateConfig> {
    load_or_init_at(&config_path()?)
}

/// Like `load_or_init` but at an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<SaturateConfig> {
    if !path.exists() {
        let default_cfg = SaturateConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(path)
}

/// Read an existing config file.
pub fn load_from(path: &Path) -> Result<SaturateConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: SaturateConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
