//! Multi-window indicator snapshots.
//!
//! The screeners evaluate every symbol against a fixed set of lookback
//! windows. A snapshot holds, per window, the most recent SMA, RSI, and
//! Bollinger breach flags. Windows longer than the available history are
//! present but carry no values, and an absent value never triggers a
//! signal.

use std::collections::BTreeMap;

use reversion_core::traits::{Indicator, MultiOutputIndicator};

use crate::momentum::Rsi;
use crate::moving_average::Sma;
use crate::volatility::BollingerBands;

/// The most recent indicator values for one lookback window.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowSnapshot {
    /// Simple moving average of the last `w` closes
    pub ma: Option<f64>,
    /// Wilder RSI over `w` periods, in [0, 100]
    pub rsi: Option<f64>,
    /// Latest close at or above the upper band
    pub bb_hi: Option<bool>,
    /// Latest close at or below the lower band
    pub bb_lo: Option<bool>,
}

/// Latest indicator values for one symbol across all configured windows.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSnapshot {
    windows: BTreeMap<usize, WindowSnapshot>,
}

impl IndicatorSnapshot {
    /// Compute a snapshot from a close-price series.
    ///
    /// # Arguments
    /// * `closes` - Close prices, oldest first
    /// * `windows` - Lookback windows to evaluate
    /// * `std_dev_multiplier` - Bollinger band width in standard deviations
    pub fn compute(closes: &[f64], windows: &[usize], std_dev_multiplier: f64) -> Self {
        let latest = closes.last().copied();
        let mut snapshots = BTreeMap::new();

        for &w in windows {
            let ma = Sma::new(w).calculate(closes).last().copied();
            let rsi = Rsi::new(w).calculate(closes).last().copied();
            let bands = BollingerBands::with_params(w, std_dev_multiplier)
                .calculate(closes)
                .last()
                .copied();

            let (bb_hi, bb_lo) = match (bands, latest) {
                (Some(bands), Some(close)) => (
                    Some(bands.breaches_high(close)),
                    Some(bands.breaches_low(close)),
                ),
                _ => (None, None),
            };

            snapshots.insert(w, WindowSnapshot { ma, rsi, bb_hi, bb_lo });
        }

        Self { windows: snapshots }
    }

    /// Get the snapshot for a specific window.
    pub fn window(&self, w: usize) -> Option<&WindowSnapshot> {
        self.windows.get(&w)
    }

    /// Iterate over (window, snapshot) pairs in ascending window order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &WindowSnapshot)> {
        self.windows.iter().map(|(w, s)| (*w, s))
    }

    /// Any window's close breached the lower band.
    pub fn any_bb_low(&self) -> bool {
        self.windows.values().any(|s| s.bb_lo == Some(true))
    }

    /// Any window's close breached the upper band.
    pub fn any_bb_high(&self) -> bool {
        self.windows.values().any(|s| s.bb_hi == Some(true))
    }

    /// Any window's RSI at or below the threshold.
    pub fn any_rsi_at_most(&self, threshold: f64) -> bool {
        self.windows
            .values()
            .any(|s| s.rsi.map_or(false, |r| r <= threshold))
    }

    /// Any window's RSI at or above the threshold.
    pub fn any_rsi_at_least(&self, threshold: f64) -> bool {
        self.windows
            .values()
            .any(|s| s.rsi.map_or(false, |r| r >= threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOWS: &[usize] = &[14, 30, 50, 200];

    #[test]
    fn test_short_series_yields_missing_windows() {
        // 60 points: enough for 14/30/50, not for 200
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.1).collect();
        let snapshot = IndicatorSnapshot::compute(&closes, WINDOWS, 2.0);

        assert!(snapshot.window(14).unwrap().ma.is_some());
        assert!(snapshot.window(50).unwrap().ma.is_some());

        let w200 = snapshot.window(200).unwrap();
        assert!(w200.ma.is_none());
        assert!(w200.rsi.is_none());
        assert!(w200.bb_hi.is_none());
        assert!(w200.bb_lo.is_none());
    }

    #[test]
    fn test_missing_windows_never_trigger() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 - i as f64 * 5.0).collect();
        let snapshot = IndicatorSnapshot::compute(&closes, &[200], 2.0);

        assert!(!snapshot.any_bb_low());
        assert!(!snapshot.any_bb_high());
        assert!(!snapshot.any_rsi_at_most(30.0));
        assert!(!snapshot.any_rsi_at_least(70.0));
    }

    #[test]
    fn test_steep_decline_breaches_lower_band() {
        // Flat for most of the window, then a sharp drop on the last close
        let mut closes = vec![100.0; 60];
        for (i, c) in closes.iter_mut().enumerate().skip(50) {
            *c = 100.0 - (i - 49) as f64 * 4.0;
        }
        let snapshot = IndicatorSnapshot::compute(&closes, WINDOWS, 2.0);

        assert!(snapshot.any_bb_low());
        assert!(!snapshot.any_bb_high());
        assert!(snapshot.any_rsi_at_most(30.0));
    }

    #[test]
    fn test_steep_climb_breaches_upper_band() {
        let mut closes = vec![100.0; 60];
        for (i, c) in closes.iter_mut().enumerate().skip(50) {
            *c = 100.0 + (i - 49) as f64 * 4.0;
        }
        let snapshot = IndicatorSnapshot::compute(&closes, WINDOWS, 2.0);

        assert!(snapshot.any_bb_high());
        assert!(!snapshot.any_bb_low());
        assert!(snapshot.any_rsi_at_least(70.0));
    }

    #[test]
    fn test_ma_matches_mean_of_tail() {
        let closes: Vec<f64> = (1..=30).map(|i| i as f64).collect();
        let snapshot = IndicatorSnapshot::compute(&closes, &[14], 2.0);

        let expected: f64 = closes[closes.len() - 14..].iter().sum::<f64>() / 14.0;
        let ma = snapshot.window(14).unwrap().ma.unwrap();
        assert!((ma - expected).abs() < 1e-10);
    }
}
