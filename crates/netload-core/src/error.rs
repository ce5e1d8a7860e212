// ── Core error types ──
//
// Failures from the sampling engine. A read failure means "no new
// sample", never "zero traffic": the reporter skips the tick instead of
// reporting fabricated rates. Clock anomalies are not errors at all --
// the rate calculator returns `None` and the tick is skipped silently.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Counter source ───────────────────────────────────────────────
    /// The counter table could not be opened or read.
    #[error("Counter table unavailable at {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A matching interface line was structurally invalid. The whole
    /// read is aborted -- no partial snapshot.
    #[error("Malformed counter record for interface {interface}: {reason}")]
    MalformedRecord { interface: String, reason: String },

    // ── Delivery ─────────────────────────────────────────────────────
    /// Report delivery failed. Per-tick only: bookkeeping has already
    /// been updated by the time delivery is attempted.
    #[error("Report delivery failed: {0}")]
    Delivery(#[from] netload_report::Error),
}
