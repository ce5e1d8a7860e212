// Report wire format.
//
// Field names are the wire contract — consumers key on them directly, so
// renames here are breaking changes. The windowed fields carry a static
// `_5m` suffix named after the default window; overriding the window
// duration changes the averaging span, not the schema.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One tick's computed throughput, ready to serialize and send.
///
/// Immutable once built; the reporter constructs a fresh one per tick and
/// discards it after delivery (successful or not).
#[derive(Debug, Clone, Serialize)]
pub struct MetricReport {
    /// Reporting host (sanitized hostname).
    pub host: String,

    /// Optional operator-assigned label for this node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,

    /// Wall-clock capture time, RFC3339 UTC.
    pub timestamp: DateTime<Utc>,

    /// Measured elapsed seconds for this tick (not the configured period).
    pub interval_seconds: f64,

    // ── Instantaneous rates ─────────────────────────────────────────
    pub rx_bytes_per_sec: f64,
    pub tx_bytes_per_sec: f64,
    pub rx_bits_per_sec: f64,
    pub tx_bits_per_sec: f64,
    pub total_bytes_per_sec: f64,
    pub total_bits_per_sec: f64,

    // ── Trailing-window averages ────────────────────────────────────
    #[serde(rename = "rx_bytes_per_sec_5m")]
    pub rx_bytes_per_sec_window: f64,
    #[serde(rename = "tx_bytes_per_sec_5m")]
    pub tx_bytes_per_sec_window: f64,
    #[serde(rename = "rx_bits_per_sec_5m")]
    pub rx_bits_per_sec_window: f64,
    #[serde(rename = "tx_bits_per_sec_5m")]
    pub tx_bits_per_sec_window: f64,
    #[serde(rename = "total_bytes_per_sec_5m")]
    pub total_bytes_per_sec_window: f64,
    #[serde(rename = "total_bits_per_sec_5m")]
    pub total_bits_per_sec_window: f64,
}
