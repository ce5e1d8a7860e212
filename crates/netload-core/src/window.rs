// ── Trailing-window average ──
//
// Bounded history of cumulative-delta points. The cumulative totals are
// running sums of per-tick deltas (already reset-guarded by the rate
// calculator), so they are monotonic even when raw counters are not.
//
// Pruning drops from the front while the *second*-oldest point has aged
// out: the oldest retained point may itself be older than the window,
// which keeps a valid denominator for sparse or just-started series.
// One append plus bounded pops per tick -- amortized O(1).

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::rate::RatePair;

#[derive(Debug, Clone, Copy)]
struct WindowPoint {
    at: Instant,
    cum_rx: u64,
    cum_tx: u64,
}

/// Trailing-window average tracker over cumulative byte totals.
#[derive(Debug)]
pub struct RateWindow {
    window: Duration,
    points: VecDeque<WindowPoint>,
}

impl RateWindow {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            points: VecDeque::new(),
        }
    }

    /// The configured window duration.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of retained history points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append this tick's cumulative totals, then prune aged-out points.
    pub fn record(&mut self, at: Instant, cum_rx: u64, cum_tx: u64) {
        self.points.push_back(WindowPoint { at, cum_rx, cum_tx });
        self.prune(at);
    }

    /// Drop from the front while the second-oldest point is already
    /// older than `now - window`. At least one point always remains.
    fn prune(&mut self, now: Instant) {
        let Some(cutoff) = now.checked_sub(self.window) else {
            return;
        };
        while self.points.len() >= 2 {
            let second_oldest = self.points[1].at;
            if second_oldest < cutoff {
                self.points.pop_front();
            } else {
                break;
            }
        }
    }

    /// Average rate between the oldest retained point and the newest.
    ///
    /// With a single point (first tick) there is no span to divide by;
    /// the caller's instantaneous rate is returned instead.
    pub fn average(&self, instantaneous: RatePair) -> RatePair {
        let (Some(oldest), Some(newest)) = (self.points.front(), self.points.back()) else {
            return instantaneous;
        };

        let span = newest.at.saturating_duration_since(oldest.at);
        if span.is_zero() {
            return instantaneous;
        }

        let secs = span.as_secs_f64();
        RatePair {
            rx: newest.cum_rx.saturating_sub(oldest.cum_rx) as f64 / secs,
            tx: newest.cum_tx.saturating_sub(oldest.cum_tx) as f64 / secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(300);

    // Tests place points forward of a fresh origin; pruning math only
    // ever subtracts the window from the newest point's time.
    fn origin() -> Instant {
        Instant::now()
    }

    #[test]
    fn single_point_falls_back_to_instantaneous() {
        let mut win = RateWindow::new(WINDOW);
        win.record(origin(), 1000, 500);

        let instantaneous = RatePair { rx: 123.0, tx: 45.0 };
        assert_eq!(win.average(instantaneous), instantaneous);
    }

    #[test]
    fn average_spans_oldest_to_newest() {
        let t0 = origin();
        let mut win = RateWindow::new(WINDOW);
        win.record(t0, 0, 0);
        win.record(t0 + Duration::from_secs(10), 10_000, 5_000);

        let avg = win.average(RatePair::default());
        assert_eq!(avg.rx, 1000.0);
        assert_eq!(avg.tx, 500.0);
    }

    #[test]
    fn average_is_scale_invariant_to_sampling_interval() {
        // 10 ticks of 1-unit delta over 10 equal intervals...
        let t0 = origin();
        let mut fine = RateWindow::new(WINDOW);
        for i in 0..=10u64 {
            fine.record(t0 + Duration::from_secs(i * 10), i, i * 2);
        }

        // ...versus 2 ticks of 5-unit delta over 5x-longer intervals.
        let mut coarse = RateWindow::new(WINDOW);
        for i in 0..=2u64 {
            coarse.record(t0 + Duration::from_secs(i * 50), i * 5, i * 10);
        }

        let fine_avg = fine.average(RatePair::default());
        let coarse_avg = coarse.average(RatePair::default());
        assert_eq!(fine_avg, coarse_avg);
        assert_eq!(fine_avg.rx, 0.1);
        assert_eq!(fine_avg.tx, 0.2);
    }

    #[test]
    fn aged_out_points_are_pruned() {
        let t0 = origin();
        let mut win = RateWindow::new(WINDOW);
        win.record(t0, 0, 0);
        win.record(t0 + Duration::from_secs(10), 100, 100);

        // Far past the window: both early points are older than the
        // cutoff, but only the first is dropped -- the second stays as
        // the reference point.
        win.record(t0 + Duration::from_secs(1000), 200, 200);
        assert_eq!(win.len(), 2);

        let avg = win.average(RatePair::default());
        let expected = 100.0 / 990.0;
        assert!((avg.rx - expected).abs() < 1e-9);
    }

    #[test]
    fn at_least_one_point_always_remains() {
        let t0 = origin();
        let mut win = RateWindow::new(Duration::from_secs(1));
        for i in 0..50u64 {
            win.record(t0 + Duration::from_secs(i * 100), i, i);
            assert!(!win.is_empty());
        }
        // Every tick aged the previous point out; exactly the newest
        // and its reference predecessor can remain.
        assert!(win.len() <= 2);
    }

    #[test]
    fn points_within_window_are_kept() {
        let t0 = origin();
        let mut win = RateWindow::new(WINDOW);
        for i in 0..=5u64 {
            win.record(t0 + Duration::from_secs(i * 30), i * 100, 0);
        }
        // 150s of history, all inside the 300s window.
        assert_eq!(win.len(), 6);
    }
}
