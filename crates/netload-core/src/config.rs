// ── Runtime reporter configuration ──
//
// These types describe *what* to sample and *where* to report it. They
// carry the resolved values only -- netload-config reads the environment
// and hands a `ReporterConfig` in; core never touches env vars or disk
// outside the counter table itself.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Default path of the Linux interface counter table.
pub const DEFAULT_PROC_NET_DEV: &str = "/proc/net/dev";

/// Default sampling period.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Default trailing-average window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Which interfaces count toward the aggregated totals.
///
/// A pure predicate over the interface name. The choice materially
/// changes what the reported numbers mean (e.g. whether container veths
/// are traffic or noise), so it is configuration, not code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InterfaceFilter {
    /// Count everything except the loopback interface `lo`.
    #[default]
    ExcludeLoopback,
    /// Count only interfaces whose name starts with the given prefix
    /// (e.g. `en` for physical uplinks on predictable-naming hosts).
    Prefix(String),
}

impl InterfaceFilter {
    /// Whether an interface's counters are included in the totals.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::ExcludeLoopback => name != "lo",
            Self::Prefix(prefix) => name.starts_with(prefix.as_str()),
        }
    }
}

/// Configuration for one reporting loop.
///
/// Built by netload-config (or directly in tests), passed to
/// [`Reporter`](crate::Reporter) by value and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Endpoint to POST reports to.
    pub report_url: Url,
    /// Optional bearer token for the endpoint.
    pub api_key: Option<SecretString>,
    /// Reporting host label (sanitized hostname).
    pub host: String,
    /// Optional operator-assigned node label.
    pub node_name: Option<String>,
    /// Sampling period.
    pub interval: Duration,
    /// Trailing-average window.
    pub window: Duration,
    /// Path of the counter table.
    pub source_path: PathBuf,
    /// Interface selection predicate.
    pub filter: InterfaceFilter,
}

impl ReporterConfig {
    /// A config with defaults for everything but the endpoint and host.
    pub fn new(report_url: Url, host: impl Into<String>) -> Self {
        Self {
            report_url,
            api_key: None,
            host: host.into(),
            node_name: None,
            interval: DEFAULT_INTERVAL,
            window: DEFAULT_WINDOW,
            source_path: PathBuf::from(DEFAULT_PROC_NET_DEV),
            filter: InterfaceFilter::default(),
        }
    }
}
