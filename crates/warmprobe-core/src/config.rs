use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::batch::DEFAULT_WARMUP_ROUTES;
use crate::retry::{Profile, RetryPolicy};

/// Retry policy override (optional section in config.toml). All times in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per check (including the first).
    pub max_attempts: u32,
    /// Base delay for linear backoff.
    pub initial_delay_ms: u64,
    /// Ceiling on the total wait between attempts of one check.
    pub max_total_wait_ms: u64,
    /// Timeout for a single probe (0 = no limit).
    pub per_attempt_timeout_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig::from(&RetryPolicy::default())
    }
}

impl From<&RetryPolicy> for RetryConfig {
    fn from(p: &RetryPolicy) -> Self {
        Self {
            max_attempts: p.max_attempts,
            initial_delay_ms: p.initial_delay.as_millis() as u64,
            max_total_wait_ms: p.max_total_wait.as_millis() as u64,
            per_attempt_timeout_ms: p.per_attempt_timeout.as_millis() as u64,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_total_wait: Duration::from_millis(self.max_total_wait_ms),
            per_attempt_timeout: Duration::from_millis(self.per_attempt_timeout_ms),
        }
    }
}

/// Request used to probe a target: HEAD (default, no body) or GET (for servers that block HEAD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMethod {
    #[default]
    Head,
    Get,
}

/// Global configuration loaded from `~/.config/warmprobe/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Fixed environment profile; if missing, the caller's environment detection decides.
    #[serde(default)]
    pub profile: Option<Profile>,
    /// Explicit retry policy; takes precedence over any profile.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// HTTP method used by the probe.
    #[serde(default)]
    pub method: ProbeMethod,
    /// Base URL that relative routes (e.g. "/about") are joined onto.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Routes hit by `warmup` when none are given on the command line.
    #[serde(default = "default_warmup_routes")]
    pub warmup_routes: Vec<String>,
}

fn default_warmup_routes() -> Vec<String> {
    DEFAULT_WARMUP_ROUTES.iter().map(|r| r.to_string()).collect()
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            profile: None,
            retry: None,
            method: ProbeMethod::Head,
            base_url: None,
            warmup_routes: default_warmup_routes(),
        }
    }
}

impl ProbeConfig {
    /// Pick the policy for this run: `[retry]` section, else configured profile, else `detected`.
    pub fn resolve_policy(&self, detected: Profile) -> Result<RetryPolicy> {
        let policy = match (&self.retry, self.profile) {
            (Some(retry), _) => retry.to_policy(),
            (None, Some(profile)) => profile.policy(),
            (None, None) => detected.policy(),
        };
        if !policy.is_valid() {
            anyhow::bail!("invalid retry policy: max_attempts must be at least 1");
        }
        Ok(policy)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("warmprobe")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ProbeConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ProbeConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<ProbeConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: ProbeConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
