use thiserror::Error;

/// Top-level error type for the `netload-report` crate.
///
/// Covers every failure mode of report delivery: client construction,
/// transport, and endpoint rejection. `netload-core` maps these into its
/// own per-tick error handling.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Endpoint ────────────────────────────────────────────────────
    /// The endpoint answered with a non-success status. Anything >= 300
    /// counts as a failed delivery — redirects are not followed into.
    #[error("Report rejected by {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    // ── Construction ────────────────────────────────────────────────
    /// Building the underlying HTTP client failed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl Error {
    /// Returns `true` if this failure is likely transient (worth noting
    /// but not alarming): timeouts and connection errors.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
