//! Environment configuration for netloadd.
//!
//! Reads the recognized environment variables, validates them, and
//! produces the core crate's [`ReporterConfig`]. The daemon has no CLI
//! flags and no config files — the environment is the whole surface.
//!
//! Recognized variables: `REPORT_URL` (required), `API_KEY`,
//! `NODE_NAME`, `INTERVAL`, `WINDOW`, `PROC_NET_DEV`, `IFACE_PREFIX`.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use url::Url;

use netload_core::config::{DEFAULT_INTERVAL, DEFAULT_PROC_NET_DEV, DEFAULT_WINDOW};
use netload_core::{InterfaceFilter, ReporterConfig};

/// The environment variables this crate reads (figment keys are the
/// lowercased variable names).
const RECOGNIZED: &[&str] = &[
    "report_url",
    "api_key",
    "node_name",
    "interval",
    "window",
    "proc_net_dev",
    "iface_prefix",
];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is required")]
    MissingRequired { name: &'static str },

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Raw environment view ────────────────────────────────────────────

/// Unvalidated string-level view of the environment.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct RawConfig {
    report_url: Option<String>,
    api_key: Option<String>,
    node_name: Option<String>,
    interval: Option<String>,
    window: Option<String>,
    proc_net_dev: Option<String>,
    iface_prefix: Option<String>,
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load and validate configuration from the process environment.
pub fn load() -> Result<ReporterConfig, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(RawConfig::default()))
        .merge(Env::raw().only(RECOGNIZED));

    let raw: RawConfig = figment.extract()?;
    resolve(raw)
}

/// Turn the raw environment view into a validated runtime config.
fn resolve(raw: RawConfig) -> Result<ReporterConfig, ConfigError> {
    let url_str = raw
        .report_url
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingRequired { name: "REPORT_URL" })?;

    let report_url: Url = url_str.parse().map_err(|e| ConfigError::Validation {
        field: "REPORT_URL",
        reason: format!("{e}"),
    })?;

    let mut config = ReporterConfig::new(report_url, hostname());
    config.api_key = raw
        .api_key
        .filter(|s| !s.is_empty())
        .map(SecretString::from);
    config.node_name = raw.node_name.filter(|s| !s.is_empty());
    config.interval = duration_or_default(raw.interval.as_deref(), DEFAULT_INTERVAL, "INTERVAL");
    config.window = duration_or_default(raw.window.as_deref(), DEFAULT_WINDOW, "WINDOW");
    if let Some(path) = raw.proc_net_dev.filter(|s| !s.is_empty()) {
        config.source_path = PathBuf::from(path);
    } else {
        config.source_path = PathBuf::from(DEFAULT_PROC_NET_DEV);
    }
    config.filter = match raw.iface_prefix.filter(|s| !s.is_empty()) {
        Some(prefix) => InterfaceFilter::Prefix(prefix),
        None => InterfaceFilter::ExcludeLoopback,
    };

    Ok(config)
}

/// Parse a humantime duration, falling back to the default on anything
/// unparseable or non-positive. Misconfigured intervals degrade to the
/// stock cadence instead of killing the daemon.
fn duration_or_default(value: Option<&str>, default: Duration, name: &str) -> Duration {
    let Some(value) = value.filter(|s| !s.is_empty()) else {
        return default;
    };
    match humantime::parse_duration(value) {
        Ok(d) if !d.is_zero() => d,
        Ok(_) => {
            warn!(%name, value, "non-positive duration; using default");
            default
        }
        Err(e) => {
            warn!(%name, value, error = %e, "unparseable duration; using default");
            default
        }
    }
}

// ── Hostname resolution ─────────────────────────────────────────────

/// Resolve the reporting host label.
///
/// `/etc/hostname` first, then `$HOSTNAME`, then `"unknown"`. The
/// result is basename-sanitized so a stray path never leaks into the
/// payload.
pub fn hostname() -> String {
    let name = std::fs::read_to_string("/etc/hostname")
        .ok()
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("HOSTNAME").ok().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| "unknown".to_owned());
    sanitize_host(&name)
}

fn sanitize_host(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).to_owned()
}
