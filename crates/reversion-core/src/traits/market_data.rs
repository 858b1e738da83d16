//! Market data source trait definition.

use crate::error::DataError;
use crate::types::Bar;
use async_trait::async_trait;

/// Trait for market data sources.
///
/// Provides the screening universes and per-symbol daily history the bot
/// runs its indicators over. Implementations own all fetch mechanics.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch the day's top losing stock symbols, in the source's own
    /// ranking order, truncated to `count`.
    async fn day_losers(&self, count: usize) -> Result<Vec<String>, DataError>;

    /// Fetch the most popular crypto symbols, truncated to `count`.
    async fn top_crypto(&self, count: usize) -> Result<Vec<String>, DataError>;

    /// Fetch daily history for a symbol covering roughly the last `days`
    /// calendar days.
    ///
    /// # Returns
    /// Bars ordered from oldest to newest
    async fn daily_history(&self, symbol: &str, days: u32) -> Result<Vec<Bar>, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}
