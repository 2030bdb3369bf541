//! The fixed resource under test: encoded URL plus request headers.

use anyhow::{bail, Context, Result};

/// Percent-encodes a raw URL for use on the wire.
///
/// Non-ASCII and other characters outside the URL path set are escaped as UTF-8
/// `%XX` sequences; `:`, `/` and existing escapes are kept verbatim. Only
/// `http` and `https` are accepted.
pub fn encode_url(raw: &str) -> Result<String> {
    let parsed = url::Url::parse(raw.trim()).context("unparsable URL")?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => bail!("unsupported scheme {:?} (expected http or https)", other),
    }
    if parsed.host_str().map(str::is_empty).unwrap_or(true) {
        bail!("URL has no host");
    }
    Ok(parsed.into())
}

/// Immutable download target shared by every worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    url: String,
    user_agent: String,
    headers: Vec<(String, String)>,
}

impl Target {
    pub fn new(raw_url: &str, user_agent: &str) -> Result<Self> {
        Ok(Self {
            url: encode_url(raw_url)?,
            user_agent: user_agent.to_string(),
            headers: Vec::new(),
        })
    }

    /// Adds an extra request header (name and value are trimmed).
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .push((name.trim().to_string(), value.trim().to_string()));
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Header lines in `Name: value` form, as handed to curl.
    pub fn header_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.headers.iter().map(|(k, v)| format!("{}: {}", k, v))
    }
}
