//! Daemon error type with miette diagnostics.
//!
//! Only startup failures surface here — once the loop is running,
//! per-tick failures are logged and absorbed by `netload-core`.

use miette::Diagnostic;
use thiserror::Error;

use netload_config::ConfigError;
use netload_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 2;
    pub const SOURCE: i32 = 3;
}

#[derive(Debug, Error, Diagnostic)]
pub enum DaemonError {
    #[error("Configuration error")]
    #[diagnostic(
        code(netload::config),
        help(
            "netloadd is configured entirely through environment variables.\n\
             Required: REPORT_URL (the collector endpoint).\n\
             Optional: API_KEY, NODE_NAME, INTERVAL (e.g. 30s), WINDOW,\n\
             PROC_NET_DEV, IFACE_PREFIX."
        )
    )]
    Config(#[from] ConfigError),

    #[error("Reporter failed to start")]
    #[diagnostic(
        code(netload::engine),
        help(
            "The baseline counter read failed, so there is nothing to compute\n\
             rates against. Check that the counter table exists and is readable\n\
             (default /proc/net/dev, override with PROC_NET_DEV)."
        )
    )]
    Engine(#[from] CoreError),
}

impl DaemonError {
    /// Map to a process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            DaemonError::Config(_) => exit_code::CONFIG,
            DaemonError::Engine(
                CoreError::SourceUnavailable { .. } | CoreError::MalformedRecord { .. },
            ) => exit_code::SOURCE,
            DaemonError::Engine(_) => exit_code::GENERAL,
        }
    }
}
