//! Threshold rules applied to indicator snapshots.

use reversion_indicators::IndicatorSnapshot;
use serde::{Deserialize, Serialize};

/// Screening parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerConfig {
    /// How many top losing stocks to consider
    pub stock_count: usize,
    /// How many popular crypto assets to consider
    pub crypto_count: usize,
    /// Calendar days of daily history to fetch per symbol
    pub history_days: u32,
    /// Lookback windows evaluated per symbol
    pub windows: Vec<usize>,
    /// Bollinger band width in standard deviations
    pub std_dev_multiplier: f64,
    /// RSI at or below this level counts as oversold
    pub rsi_buy_max: f64,
    /// RSI at or above this level counts as overbought
    pub rsi_sell_min: f64,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            stock_count: 25,
            crypto_count: 25,
            history_days: 365,
            windows: vec![14, 30, 50, 200],
            std_dev_multiplier: 2.0,
            rsi_buy_max: 30.0,
            rsi_sell_min: 70.0,
        }
    }
}

/// Buy rule: oversold on any window.
///
/// A symbol qualifies when any window's close breached the lower Bollinger
/// band, or any window's RSI is at or below the buy threshold. Pure OR:
/// additional breaches can only add symbols, never remove them. Windows
/// without values do not trigger.
pub fn buy_signal(snapshot: &IndicatorSnapshot, config: &ScreenerConfig) -> bool {
    snapshot.any_bb_low() || snapshot.any_rsi_at_most(config.rsi_buy_max)
}

/// Sell rule: overbought on any window.
pub fn sell_signal(snapshot: &IndicatorSnapshot, config: &ScreenerConfig) -> bool {
    snapshot.any_bb_high() || snapshot.any_rsi_at_least(config.rsi_sell_min)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declining_closes() -> Vec<f64> {
        // Flat then a sharp slide: latest close sits under the lower band
        // with a deeply oversold RSI
        let mut closes = vec![100.0; 60];
        for (i, c) in closes.iter_mut().enumerate().skip(50) {
            *c = 100.0 - (i - 49) as f64 * 4.0;
        }
        closes
    }

    fn climbing_closes() -> Vec<f64> {
        let mut closes = vec![100.0; 60];
        for (i, c) in closes.iter_mut().enumerate().skip(50) {
            *c = 100.0 + (i - 49) as f64 * 4.0;
        }
        closes
    }

    #[test]
    fn test_oversold_symbol_is_a_buy() {
        let config = ScreenerConfig::default();
        let snapshot = IndicatorSnapshot::compute(
            &declining_closes(),
            &config.windows,
            config.std_dev_multiplier,
        );

        let w14 = snapshot.window(14).unwrap();
        assert!(w14.rsi.unwrap() <= 30.0);

        assert!(buy_signal(&snapshot, &config));
        assert!(!sell_signal(&snapshot, &config));
    }

    #[test]
    fn test_lower_band_breach_on_the_shortest_window_is_a_buy() {
        let config = ScreenerConfig::default();
        // A single sharp drop after a flat stretch lands the latest close
        // under the 14-period lower band
        let mut closes = vec![100.0; 60];
        closes[59] = 80.0;
        let snapshot =
            IndicatorSnapshot::compute(&closes, &config.windows, config.std_dev_multiplier);

        assert_eq!(snapshot.window(14).unwrap().bb_lo, Some(true));
        assert!(buy_signal(&snapshot, &config));
    }

    #[test]
    fn test_overbought_symbol_is_a_sell() {
        let config = ScreenerConfig::default();
        let snapshot = IndicatorSnapshot::compute(
            &climbing_closes(),
            &config.windows,
            config.std_dev_multiplier,
        );

        assert!(sell_signal(&snapshot, &config));
        assert!(!buy_signal(&snapshot, &config));
    }

    #[test]
    fn test_buy_signal_is_monotonic() {
        // Triggering on a single window already includes the symbol; a
        // snapshot that also triggers on more windows must stay included
        let config = ScreenerConfig::default();

        let single = IndicatorSnapshot::compute(
            &declining_closes(),
            &[30],
            config.std_dev_multiplier,
        );
        let several = IndicatorSnapshot::compute(
            &declining_closes(),
            &[14, 30, 50],
            config.std_dev_multiplier,
        );

        assert!(buy_signal(&single, &config));
        assert!(buy_signal(&several, &config));
    }

    #[test]
    fn test_quiet_symbol_triggers_nothing() {
        let config = ScreenerConfig::default();
        // Gentle oscillation around a flat mean
        let closes: Vec<f64> = (0..260)
            .map(|i| 100.0 + (i as f64 * 0.7).sin())
            .collect();
        let snapshot =
            IndicatorSnapshot::compute(&closes, &config.windows, config.std_dev_multiplier);

        assert!(!buy_signal(&snapshot, &config));
        assert!(!sell_signal(&snapshot, &config));
    }

    #[test]
    fn test_short_history_triggers_nothing() {
        let config = ScreenerConfig::default();
        let closes = vec![100.0, 90.0, 80.0];
        let snapshot =
            IndicatorSnapshot::compute(&closes, &config.windows, config.std_dev_multiplier);

        assert!(!buy_signal(&snapshot, &config));
        assert!(!sell_signal(&snapshot, &config));
    }
}
