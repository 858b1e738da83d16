//! Cash-rebalance planning and order sizing.
//!
//! Pure functions over account state so sizing stays unit-testable
//! without a brokerage.

use reversion_core::types::Position;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Cash-rebalance parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceConfig {
    /// Target cash share of total holdings
    pub cash_reserve_pct: Decimal,
    /// Positions ranked by profit are split into this many tiers; the top
    /// tier funds the rebalance
    pub top_divisor: usize,
}

impl Default for RebalanceConfig {
    fn default() -> Self {
        use rust_decimal_macros::dec;
        Self {
            cash_reserve_pct: dec!(0.10),
            top_divisor: 4,
        }
    }
}

/// A planned notional sale against one position.
#[derive(Debug, Clone)]
pub struct RebalanceSale {
    pub position: Position,
    pub notional: Decimal,
}

/// Total holdings: cash plus the market value of all positions.
pub fn total_holdings(cash: Decimal, positions: &[Position]) -> Decimal {
    cash + positions.iter().map(|p| p.market_value).sum::<Decimal>()
}

/// Cash as a fraction of total holdings. An account with no holdings at
/// all counts as fully in cash.
pub fn cash_share(cash: Decimal, positions: &[Position]) -> Decimal {
    let total = total_holdings(cash, positions);
    if total == Decimal::ZERO {
        return Decimal::ONE;
    }
    cash / total
}

/// Plan the sales that raise cash back to the reserve target.
///
/// When the cash share sits below the target, the most profitable tier of
/// positions (by unrealized P/L percent, top `1/top_divisor` by count) is
/// sold down proportionally to each position's share of the tier's market
/// value, sized so the aggregate closes the gap to the target. Notionals
/// are truncated to cents; zero-notional entries are left in the plan so
/// callers can report them as skipped.
pub fn plan_rebalance(
    cash: Decimal,
    positions: &[Position],
    config: &RebalanceConfig,
) -> Vec<RebalanceSale> {
    let total = total_holdings(cash, positions);
    if total == Decimal::ZERO || cash / total >= config.cash_reserve_pct {
        return vec![];
    }
    if config.top_divisor == 0 {
        return vec![];
    }

    let mut ranked: Vec<&Position> = positions.iter().collect();
    ranked.sort_by(|a, b| b.unrealized_pnl_percent.cmp(&a.unrealized_pnl_percent));

    let tier = &ranked[..ranked.len() / config.top_divisor];
    let tier_value: Decimal = tier.iter().map(|p| p.market_value).sum();
    if tier_value == Decimal::ZERO {
        return vec![];
    }

    let cash_needed = total * config.cash_reserve_pct - cash;

    tier.iter()
        .map(|p| RebalanceSale {
            position: (*p).clone(),
            notional: (p.market_value / tier_value * cash_needed)
                .round_dp_with_strategy(2, RoundingStrategy::ToZero),
        })
        .collect()
}

/// Split available cash evenly across `count` buy orders, to the cent.
pub fn split_cash(cash: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    (cash / Decimal::from(count)).round_dp_with_strategy(2, RoundingStrategy::ToZero)
}
