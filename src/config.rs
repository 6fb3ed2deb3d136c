use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::commands::Command;
use crate::error::{Result, ScanerrError};
use crate::settings::PersistentSettings;

/// Scanerr CLI: manage monitored sites and run scan-based regression tests
#[derive(Parser, Debug)]
#[command(name = "scanerr", version)]
pub struct CliArgs {
    /// Settings file to read instead of the default location
    #[arg(long = "config", global = true)]
    pub config_path: Option<PathBuf>,

    /// API key to use for this invocation instead of the stored one
    #[arg(long = "api-key", global = true)]
    pub api_key: Option<String>,

    /// API root to use for this invocation instead of the stored one
    #[arg(long = "api-root", global = true)]
    pub api_root: Option<String>,

    /// Print response payloads (shown only on failure otherwise) and debug logs
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

// Remote service constants
pub const DEFAULT_API_ROOT: &str = "https://api.scanerr.io";
pub const API_PREFIX: &str = "/v1/ops";
pub const DEFAULT_APP_URL: &str = "https://app.scanerr.io";
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Completion poller constants
pub const POLL_INTERVAL_SECS: u64 = 10;
pub const POLL_MAX_WAIT_SECS: u64 = 300;

// Availability probe constants
pub const PROBE_INTERVAL_SECS: u64 = 5;
pub const PROBE_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_WAIT_TIME_SECS: u64 = 120;

// Scoring
pub const DEFAULT_MIN_SCORE: f64 = 90.0;

/// Immutable connection settings shared by every remote operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_root: Url,
    pub api_key: String,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_root: &str, api_key: &str) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ScanerrError::Config(
                "api_key is missing; run `scanerr config <api_key>`".to_string(),
            ));
        }

        let api_root = parse_api_root(api_root)?;

        Ok(ClientConfig {
            api_root,
            api_key: api_key.to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        })
    }

    /// Build from stored settings, letting CLI overrides win.
    pub fn resolve(
        settings: &PersistentSettings,
        api_key_override: Option<&str>,
        api_root_override: Option<&str>,
    ) -> Result<Self> {
        let api_key = api_key_override
            .or(settings.api_key.as_deref())
            .unwrap_or_default();
        let api_root = api_root_override
            .or(settings.api_root.as_deref())
            .unwrap_or(DEFAULT_API_ROOT);
        Self::new(api_root, api_key)
    }

    /// A copy of this config authenticated with a different key.
    pub fn with_api_key(&self, api_key: &str) -> Result<Self> {
        Self::new(self.api_root.as_str(), api_key).map(|fresh| ClientConfig {
            request_timeout: self.request_timeout,
            ..fresh
        })
    }

    /// Absolute URL for a resource path such as `scan/delay`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}/{}",
            self.api_root.as_str().trim_end_matches('/'),
            API_PREFIX,
            path.trim_start_matches('/')
        )
    }

    pub fn auth_header(&self) -> String {
        format!("Token {}", self.api_key)
    }
}

fn parse_api_root(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ScanerrError::Config(
            "api_root is missing; run `scanerr config <api_key> --api-root <url>`".to_string(),
        ));
    }

    let url = Url::parse(raw)
        .map_err(|e| ScanerrError::Config(format!("api_root '{}' is not a valid URL: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ScanerrError::Config(format!(
            "api_root must use http or https, got '{}'",
            other
        ))),
    }
}

/// Timing for the completion poller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollSettings {
    pub poll_interval: Duration,
    pub max_wait: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        PollSettings {
            poll_interval: Duration::from_secs(POLL_INTERVAL_SECS),
            max_wait: Duration::from_secs(POLL_MAX_WAIT_SECS),
        }
    }
}

/// Timing for the availability prober.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSettings {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl ProbeSettings {
    pub fn with_max_wait(max_wait: Duration) -> Self {
        ProbeSettings {
            max_wait,
            ..Self::default()
        }
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        ProbeSettings {
            interval: Duration::from_secs(PROBE_INTERVAL_SECS),
            max_wait: Duration::from_secs(DEFAULT_MAX_WAIT_TIME_SECS),
        }
    }
}
