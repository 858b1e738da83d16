//! Shared history-to-snapshot pipeline.

use reversion_core::error::DataError;
use reversion_core::traits::MarketData;
use reversion_core::types::BarSeries;
use reversion_indicators::IndicatorSnapshot;
use tracing::debug;

use crate::rules::ScreenerConfig;

/// Fetch a symbol's daily history and compute its latest indicator
/// snapshot.
///
/// Returns `Ok(None)` when the source responds with an empty history.
pub async fn latest_snapshot(
    data: &dyn MarketData,
    symbol: &str,
    config: &ScreenerConfig,
) -> Result<Option<IndicatorSnapshot>, DataError> {
    let bars = data.daily_history(symbol, config.history_days).await?;
    if bars.is_empty() {
        return Ok(None);
    }

    let series = BarSeries::from_bars(symbol, bars);
    let closes = series.closes();
    debug!(symbol, bars = closes.len(), "computing indicator snapshot");

    Ok(Some(IndicatorSnapshot::compute(
        &closes,
        &config.windows,
        config.std_dev_multiplier,
    )))
}
