// ── Rate calculation ──
//
// Pure math over pairs of timed counter snapshots. Two guards:
//
//   * a counter that went *down* means the interface reset (or the
//     counter wrapped), not negative traffic -- that direction's delta
//     is zero for the tick;
//   * non-positive elapsed time means a duplicate or out-of-order tick
//     and yields no delta at all, so the caller keeps its baseline.

use std::time::{Duration, Instant};

use crate::proc::CounterSnapshot;

/// One counter read with its capture time.
///
/// `captured_at` is monotonic (`Instant`), so elapsed time between two
/// samples can be zero but never negative; wall-clock steps cannot
/// corrupt rate math.
#[derive(Debug, Clone, Copy)]
pub struct TimedSample {
    pub snapshot: CounterSnapshot,
    pub captured_at: Instant,
}

impl TimedSample {
    pub fn new(snapshot: CounterSnapshot, captured_at: Instant) -> Self {
        Self {
            snapshot,
            captured_at,
        }
    }

    /// Capture a sample stamped with the current time.
    pub fn now(snapshot: CounterSnapshot) -> Self {
        Self::new(snapshot, Instant::now())
    }
}

/// The byte deltas and elapsed time between two consecutive samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickDelta {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub elapsed: Duration,
}

impl TickDelta {
    /// Compute the delta between two samples, or `None` if elapsed time
    /// is non-positive (clock anomaly -- skip the tick, keep the baseline).
    pub fn between(previous: &TimedSample, current: &TimedSample) -> Option<Self> {
        let elapsed = current
            .captured_at
            .checked_duration_since(previous.captured_at)?;
        if elapsed.is_zero() {
            return None;
        }

        Some(Self {
            rx_bytes: current
                .snapshot
                .rx_bytes
                .saturating_sub(previous.snapshot.rx_bytes),
            tx_bytes: current
                .snapshot
                .tx_bytes
                .saturating_sub(previous.snapshot.tx_bytes),
            elapsed,
        })
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Per-second rates for this tick.
    pub fn rates(&self) -> RatePair {
        let secs = self.elapsed_secs();
        RatePair {
            rx: self.rx_bytes as f64 / secs,
            tx: self.tx_bytes as f64 / secs,
        }
    }
}

/// A pair of per-direction rates in bytes per second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatePair {
    pub rx: f64,
    pub tx: f64,
}

impl RatePair {
    pub fn rx_bits(&self) -> f64 {
        self.rx * 8.0
    }

    pub fn tx_bits(&self) -> f64 {
        self.tx * 8.0
    }

    pub fn total(&self) -> f64 {
        self.rx + self.tx
    }

    pub fn total_bits(&self) -> f64 {
        self.total() * 8.0
    }
}
