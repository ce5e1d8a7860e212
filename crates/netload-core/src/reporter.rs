// ── Reporting loop ──
//
// One strictly sequential timeline: a periodic timer drives
// sample → compute → deliver ticks, and a tick fully completes before
// the next firing is processed (`MissedTickBehavior::Delay`). All engine
// state -- previous sample, cumulative totals, window history -- lives
// in this loop's scope; nothing is shared across threads.
//
// Failure policy per tick: a read failure or clock anomaly skips the
// tick without advancing state; a delivery failure is logged after
// bookkeeping has already been updated. Only the baseline read is fatal.

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use netload_report::{DeliveryConfig, MetricReport, ReportClient};

use crate::config::ReporterConfig;
use crate::error::CoreError;
use crate::proc::CounterSource;
use crate::rate::{RatePair, TickDelta, TimedSample};
use crate::window::RateWindow;

// ── ReporterState ────────────────────────────────────────────────

/// Loop state observable by consumers (diagnostics, tests).
///
/// `Idle → Sampling → Computing → (Reporting | SkippedTick) → Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReporterState {
    Idle,
    Sampling,
    Computing,
    Reporting,
    SkippedTick,
}

// ── Reporter ─────────────────────────────────────────────────────

/// The periodic sampling-and-reporting engine.
///
/// Construct with a validated [`ReporterConfig`] and a cancellation
/// token, then drive with [`run`](Reporter::run) until cancelled.
pub struct Reporter {
    config: ReporterConfig,
    source: CounterSource,
    client: ReportClient,
    cancel: CancellationToken,
    state: watch::Sender<ReporterState>,
}

impl Reporter {
    /// Build the reporter and its delivery client.
    pub fn new(config: ReporterConfig, cancel: CancellationToken) -> Result<Self, CoreError> {
        let source = CounterSource::new(&config.source_path, config.filter.clone());

        let mut delivery = DeliveryConfig::new(config.report_url.clone());
        delivery.api_key = config.api_key.clone();
        let client = ReportClient::new(delivery)?;

        let (state, _) = watch::channel(ReporterState::Idle);

        Ok(Self {
            config,
            source,
            client,
            cancel,
            state,
        })
    }

    /// Subscribe to loop state transitions.
    pub fn state(&self) -> watch::Receiver<ReporterState> {
        self.state.subscribe()
    }

    /// Run until cancelled.
    ///
    /// The first read establishes the baseline and emits nothing; a
    /// baseline failure is fatal and returned to the caller. Afterwards
    /// the loop only ever returns `Ok` -- per-tick failures are logged
    /// and the next tick tries again.
    pub async fn run(&mut self) -> Result<(), CoreError> {
        let baseline = self.source.read()?;
        let mut previous = TimedSample::now(baseline);
        info!(
            path = %self.source.path().display(),
            rx = baseline.rx_bytes,
            tx = baseline.tx_bytes,
            "baseline captured"
        );

        // Running sums of reset-guarded per-tick deltas; these feed the
        // window so it never sees a raw counter reset.
        let mut cum_rx: u64 = 0;
        let mut cum_tx: u64 = 0;
        let mut window = RateWindow::new(self.config.window);

        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await; // consume the immediate first tick

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => break,
                _ = interval.tick() => {}
            }

            let _ = self.state.send(ReporterState::Sampling);
            let current = match self.source.read() {
                Ok(snapshot) => TimedSample::now(snapshot),
                Err(e) => {
                    warn!(error = %e, "counter read failed; skipping tick");
                    let _ = self.state.send(ReporterState::SkippedTick);
                    let _ = self.state.send(ReporterState::Idle);
                    continue;
                }
            };

            let _ = self.state.send(ReporterState::Computing);
            let Some(delta) = TickDelta::between(&previous, &current) else {
                // Duplicate or out-of-order tick: keep the baseline so
                // the next tick recomputes against it.
                debug!("non-positive elapsed time; skipping tick");
                let _ = self.state.send(ReporterState::SkippedTick);
                let _ = self.state.send(ReporterState::Idle);
                continue;
            };
            previous = current;

            cum_rx += delta.rx_bytes;
            cum_tx += delta.tx_bytes;
            window.record(current.captured_at, cum_rx, cum_tx);

            let rates = delta.rates();
            let averaged = window.average(rates);
            let report = build_report(&self.config, &delta, rates, averaged);

            info!(
                rx_bps = report.rx_bytes_per_sec,
                tx_bps = report.tx_bytes_per_sec,
                url = %self.client.url(),
                "reporting"
            );

            let _ = self.state.send(ReporterState::Reporting);
            tokio::select! {
                () = self.cancel.cancelled() => break,
                result = self.client.send(&report) => {
                    if let Err(e) = result {
                        warn!(error = %e, "report delivery failed");
                    }
                }
            }
            let _ = self.state.send(ReporterState::Idle);
        }

        info!("shutdown requested; reporter stopping");
        Ok(())
    }
}

/// Assemble the wire payload for one tick.
fn build_report(
    config: &ReporterConfig,
    delta: &TickDelta,
    rates: RatePair,
    averaged: RatePair,
) -> MetricReport {
    MetricReport {
        host: config.host.clone(),
        node_name: config.node_name.clone(),
        timestamp: Utc::now(),
        interval_seconds: delta.elapsed_secs(),
        rx_bytes_per_sec: rates.rx,
        tx_bytes_per_sec: rates.tx,
        rx_bits_per_sec: rates.rx_bits(),
        tx_bits_per_sec: rates.tx_bits(),
        total_bytes_per_sec: rates.total(),
        total_bits_per_sec: rates.total_bits(),
        rx_bytes_per_sec_window: averaged.rx,
        tx_bytes_per_sec_window: averaged.tx,
        rx_bits_per_sec_window: averaged.rx_bits(),
        tx_bits_per_sec_window: averaged.tx_bits(),
        total_bytes_per_sec_window: averaged.total(),
        total_bits_per_sec_window: averaged.total_bits(),
    }
}
