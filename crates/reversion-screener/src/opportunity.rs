//! Screens the market for oversold buy candidates.

use std::collections::HashSet;

use reversion_core::error::DataError;
use reversion_core::traits::MarketData;
use reversion_core::types::{AssetClass, SkipReason, Skipped};
use reversion_indicators::IndicatorSnapshot;
use tracing::{info, warn};

use crate::history::latest_snapshot;
use crate::rules::{buy_signal, ScreenerConfig};

/// A symbol that met the buy rule.
#[derive(Debug, Clone)]
pub struct BuyCandidate {
    pub symbol: String,
    pub asset_class: AssetClass,
    pub snapshot: IndicatorSnapshot,
}

/// Result of an opportunity screen: qualifying symbols plus everything
/// that was excluded along the way.
#[derive(Debug, Default)]
pub struct OpportunityScreen {
    pub candidates: Vec<BuyCandidate>,
    pub skipped: Vec<Skipped>,
}

/// Screens the day's losing stocks and popular crypto for buy signals.
pub struct OpportunityScreener<'a> {
    data: &'a dyn MarketData,
    config: &'a ScreenerConfig,
}

impl<'a> OpportunityScreener<'a> {
    pub fn new(data: &'a dyn MarketData, config: &'a ScreenerConfig) -> Self {
        Self { data, config }
    }

    /// Build the candidate universe and filter it down to buy candidates.
    ///
    /// Universe fetch failures abort the screen; per-symbol history
    /// failures only exclude that symbol.
    pub async fn screen(&self) -> Result<OpportunityScreen, DataError> {
        let stocks = self.data.day_losers(self.config.stock_count).await?;
        let crypto = self.data.top_crypto(self.config.crypto_count).await?;

        info!(
            stocks = stocks.len(),
            crypto = crypto.len(),
            "screening trading opportunities"
        );

        let mut seen = HashSet::new();
        let universe: Vec<(String, AssetClass)> = stocks
            .into_iter()
            .map(|s| (s, AssetClass::Equity))
            .chain(crypto.into_iter().map(|s| (s, AssetClass::Crypto)))
            .filter(|(s, _)| seen.insert(s.clone()))
            .collect();

        let mut result = OpportunityScreen::default();

        for (symbol, asset_class) in universe {
            match latest_snapshot(self.data, &symbol, self.config).await {
                Ok(Some(snapshot)) => {
                    if buy_signal(&snapshot, self.config) {
                        result.candidates.push(BuyCandidate {
                            symbol,
                            asset_class,
                            snapshot,
                        });
                    }
                }
                Ok(None) => {
                    result
                        .skipped
                        .push(Skipped::new(symbol, SkipReason::EmptyHistory));
                }
                Err(e) => {
                    warn!(symbol, error = %e, "excluding symbol: history fetch failed");
                    result.skipped.push(Skipped::new(
                        symbol,
                        SkipReason::HistoryUnavailable(e.to_string()),
                    ));
                }
            }
        }

        info!(
            buys = result.candidates.len(),
            skipped = result.skipped.len(),
            "opportunity screen complete"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reversion_core::types::Bar;
    use std::collections::HashMap;

    struct FixtureData {
        losers: Vec<String>,
        crypto: Vec<String>,
        histories: HashMap<String, Vec<Bar>>,
    }

    #[async_trait]
    impl MarketData for FixtureData {
        async fn day_losers(&self, count: usize) -> Result<Vec<String>, DataError> {
            Ok(self.losers.iter().take(count).cloned().collect())
        }

        async fn top_crypto(&self, count: usize) -> Result<Vec<String>, DataError> {
            Ok(self.crypto.iter().take(count).cloned().collect())
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

    fn oversold_closes() -> Vec<f64> {
        let mut closes = vec![100.0; 60];
        for (i, c) in closes.iter_mut().enumerate().skip(50) {
            *c = 100.0 - (i - 49) as f64 * 4.0;
        }
        closes
    }

    fn quiet_closes() -> Vec<f64> {
        (0..260).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect()
    }

    #[tokio::test]
    async fn test_screen_keeps_oversold_and_drops_failures() {
        let mut histories = HashMap::new();
        histories.insert("DIP".to_string(), bars_from_closes(&oversold_closes()));
        histories.insert("FLAT".to_string(), bars_from_closes(&quiet_closes()));
        histories.insert("EMPTY".to_string(), vec![]);

        let data = FixtureData {
            losers: vec![
                "DIP".to_string(),
                "FLAT".to_string(),
                "EMPTY".to_string(),
                "GONE".to_string(),
            ],
            crypto: vec![],
            histories,
        };

        let config = ScreenerConfig::default();
        let screen = OpportunityScreener::new(&data, &config)
            .screen()
            .await
            .unwrap();

        let symbols: Vec<&str> = screen.candidates.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["DIP"]);
        assert_eq!(screen.candidates[0].asset_class, AssetClass::Equity);

        // The empty and missing histories are observable, not silent
        assert_eq!(screen.skipped.len(), 2);
        assert!(screen
            .skipped
            .iter()
            .any(|s| s.symbol == "EMPTY" && s.reason == SkipReason::EmptyHistory));
        assert!(screen
            .skipped
            .iter()
            .any(|s| s.symbol == "GONE"
                && matches!(s.reason, SkipReason::HistoryUnavailable(_))));
    }

    #[tokio::test]
    async fn test_crypto_candidates_carry_their_class() {
        let mut histories = HashMap::new();
        histories.insert("ETH-USD".to_string(), bars_from_closes(&oversold_closes()));

        let data = FixtureData {
            losers: vec![],
            crypto: vec!["ETH-USD".to_string()],
            histories,
        };

        let config = ScreenerConfig::default();
        let screen = OpportunityScreener::new(&data, &config)
            .screen()
            .await
            .unwrap();

        assert_eq!(screen.candidates.len(), 1);
        assert_eq!(screen.candidates[0].asset_class, AssetClass::Crypto);
    }

    #[tokio::test]
    async fn test_candidate_counts_are_truncated() {
        let mut histories = HashMap::new();
        for s in ["A", "B", "C"] {
            histories.insert(s.to_string(), bars_from_closes(&oversold_closes()));
        }

        let data = FixtureData {
            losers: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            crypto: vec![],
            histories,
        };

        let config = ScreenerConfig {
            stock_count: 2,
            ..ScreenerConfig::default()
        };
        let screen = OpportunityScreener::new(&data, &config)
            .screen()
            .await
            .unwrap();

        assert_eq!(screen.candidates.len(), 2);
    }
}
