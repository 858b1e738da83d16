//! Screens held positions for overbought sell candidates.

use reversion_core::traits::MarketData;
use reversion_core::types::{Position, SkipReason, Skipped};
use reversion_indicators::IndicatorSnapshot;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::history::latest_snapshot;
use crate::rules::{sell_signal, ScreenerConfig};

/// A held position that met the sell rule.
///
/// The candidate owns the position record it was screened from, so the
/// quantity submitted later is always the quantity that matched the rule.
#[derive(Debug, Clone)]
pub struct SellCandidate {
    pub position: Position,
    pub snapshot: IndicatorSnapshot,
}

/// Result of a position screen.
#[derive(Debug, Default)]
pub struct PositionScreen {
    pub candidates: Vec<SellCandidate>,
    pub skipped: Vec<Skipped>,
}

/// Screens currently held assets for sell signals.
pub struct PositionScreener<'a> {
    data: &'a dyn MarketData,
    config: &'a ScreenerConfig,
}

impl<'a> PositionScreener<'a> {
    pub fn new(data: &'a dyn MarketData, config: &'a ScreenerConfig) -> Self {
        Self { data, config }
    }

    /// Evaluate each held position against the sell rule.
    ///
    /// Cash never appears here: the brokerage reports it as an account
    /// balance, not a position. Per-symbol history failures only exclude
    /// that symbol.
    pub async fn screen(&self, positions: &[Position]) -> PositionScreen {
        let mut result = PositionScreen::default();

        for position in positions {
            if position.quantity == Decimal::ZERO {
                continue;
            }

            match latest_snapshot(self.data, &position.symbol, self.config).await {
                Ok(Some(snapshot)) => {
                    if sell_signal(&snapshot, self.config) {
                        result.candidates.push(SellCandidate {
                            position: position.clone(),
                            snapshot,
                        });
                    }
                }
                Ok(None) => {
                    result
                        .skipped
                        .push(Skipped::new(&position.symbol, SkipReason::EmptyHistory));
                }
                Err(e) => {
                    warn!(symbol = %position.symbol, error = %e, "excluding position: history fetch failed");
                    result.skipped.push(Skipped::new(
                        &position.symbol,
                        SkipReason::HistoryUnavailable(e.to_string()),
                    ));
                }
            }
        }

        info!(
            sells = result.candidates.len(),
            skipped = result.skipped.len(),
            "position screen complete"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reversion_core::error::DataError;
    use reversion_core::types::{AssetClass, Bar};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    struct FixtureData {
        histories: HashMap<String, Vec<Bar>>,
    }

    #[async_trait]
    impl MarketData for FixtureData {
        async fn day_losers(&self, _count: usize) -> Result<Vec<String>, DataError> {
            Ok(vec![])
        }

        async fn top_crypto(&self, _count: usize) -> Result<Vec<String>, DataError> {
            Ok(vec![])
        }

        async fn daily_history(&self, symbol: &str, _days: u32) -> Result<Vec<Bar>, DataError> {
            self.histories
                .get(symbol)
                .cloned()
                .ok_or(DataError::NoDataAvailable)
        }

        fn name(&self) -> &str {
            "fixture"
        }
    }

    fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64 * 86_400_000, c, c, c, c, 1000.0))
            .collect()
    }

    fn overbought_closes() -> Vec<f64> {
        let mut closes = vec![100.0; 60];
        for (i, c) in closes.iter_mut().enumerate().skip(50) {
            *c = 100.0 + (i - 49) as f64 * 4.0;
        }
        closes
    }

    fn quiet_closes() -> Vec<f64> {
        (0..260).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect()
    }

    fn position(symbol: &str, asset_class: AssetClass, quantity: Decimal) -> Position {
        Position {
            symbol: symbol.to_string(),
            asset_class,
            quantity,
            current_price: dec!(100),
            market_value: quantity * dec!(100),
            unrealized_pnl: dec!(0),
            unrealized_pnl_percent: dec!(0),
        }
    }

    #[tokio::test]
    async fn test_screen_flags_overbought_holdings() {
        let mut histories = HashMap::new();
        histories.insert("RIP".to_string(), bars_from_closes(&overbought_closes()));
        histories.insert("FLAT".to_string(), bars_from_closes(&quiet_closes()));

        let data = FixtureData { histories };
        let config = ScreenerConfig::default();

        let positions = vec![
            position("RIP", AssetClass::Equity, dec!(10)),
            position("FLAT", AssetClass::Equity, dec!(5)),
            position("GONE", AssetClass::Equity, dec!(3)),
        ];

        let screen = PositionScreener::new(&data, &config)
            .screen(&positions)
            .await;

        assert_eq!(screen.candidates.len(), 1);
        let candidate = &screen.candidates[0];
        assert_eq!(candidate.position.symbol, "RIP");
        // The sell quantity travels with the candidate
        assert_eq!(candidate.position.quantity, dec!(10));

        assert_eq!(screen.skipped.len(), 1);
        assert_eq!(screen.skipped[0].symbol, "GONE");
    }

    #[tokio::test]
    async fn test_zero_quantity_positions_are_ignored() {
        let data = FixtureData {
            histories: HashMap::new(),
        };
        let config = ScreenerConfig::default();

        let positions = vec![position("AAPL", AssetClass::Equity, dec!(0))];
        let screen = PositionScreener::new(&data, &config)
            .screen(&positions)
            .await;

        assert!(screen.candidates.is_empty());
        assert!(screen.skipped.is_empty());
    }
}
