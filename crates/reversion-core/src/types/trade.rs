//! Trade decisions, executions, and per-symbol skip outcomes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AssetClass, OrderAmount, Side};

/// Why an order was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// Indicator thresholds triggered
    TechnicalSignal,
    /// Raising cash back to the reserve target
    CashRebalance,
}

impl std::fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionReason::TechnicalSignal => write!(f, "technical signal"),
            DecisionReason::CashRebalance => write!(f, "cash rebalance"),
        }
    }
}

/// A sized order the orchestrator intends to submit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeDecision {
    pub symbol: String,
    pub asset_class: AssetClass,
    pub side: Side,
    pub amount: OrderAmount,
    pub reason: DecisionReason,
}

/// An order actually submitted during this run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutedTrade {
    pub symbol: String,
    pub side: Side,
    pub amount: OrderAmount,
    pub submitted_at: DateTime<Utc>,
}

/// A fill from the brokerage activity log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillActivity {
    pub symbol: String,
    pub side: Side,
    pub quantity: Decimal,
    pub price: Decimal,
    pub transaction_time: DateTime<Utc>,
}

impl FillActivity {
    /// Dollar amount of the fill, rounded to cents.
    pub fn amount(&self) -> Decimal {
        (self.quantity * self.price).round_dp(2)
    }
}

/// Why a symbol was excluded from further processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// History fetch failed
    HistoryUnavailable(String),
    /// History fetch returned no bars
    EmptyHistory,
    /// Equity order suppressed while the market is closed
    MarketClosed,
    /// Computed order size rounded to nothing
    ZeroNotional,
    /// Brokerage rejected the order
    OrderRejected(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::HistoryUnavailable(e) => write!(f, "history unavailable: {}", e),
            SkipReason::EmptyHistory => write!(f, "no history returned"),
            SkipReason::MarketClosed => write!(f, "market closed"),
            SkipReason::ZeroNotional => write!(f, "zero notional"),
            SkipReason::OrderRejected(e) => write!(f, "order rejected: {}", e),
        }
    }
}

/// A symbol excluded from the run, with the reason it was excluded.
///
/// Skips are collected into the run report so dropped symbols stay
/// observable instead of vanishing silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skipped {
    pub symbol: String,
    pub reason: SkipReason,
}

impl Skipped {
    pub fn new(symbol: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            symbol: symbol.into(),
            reason,
        }
    }
}
