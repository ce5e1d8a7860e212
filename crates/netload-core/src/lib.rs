// netload-core: sampling engine between the OS counter table and the
// delivery client (netload-report).

pub mod config;
pub mod error;
pub mod proc;
pub mod rate;
pub mod reporter;
pub mod window;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{InterfaceFilter, ReporterConfig};
pub use error::CoreError;
pub use proc::{CounterSnapshot, CounterSource};
pub use rate::{RatePair, TickDelta, TimedSample};
pub use reporter::{Reporter, ReporterState};
pub use window::RateWindow;
