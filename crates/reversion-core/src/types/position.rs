//! Position and account types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AssetClass;

/// A position in a single security, as reported by the brokerage.
///
/// Read-only within a run; nothing mutates account state locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Symbol
    pub symbol: String,
    /// Asset class as reported by the broker
    pub asset_class: AssetClass,
    /// Number of shares or units held
    pub quantity: Decimal,
    /// Current market price
    pub current_price: Decimal,
    /// Market value (quantity * current_price)
    pub market_value: Decimal,
    /// Unrealized profit/loss
    pub unrealized_pnl: Decimal,
    /// Unrealized P&L as a fraction of cost basis
    pub unrealized_pnl_percent: Decimal,
}

impl Position {
    /// This position's share of the given total portfolio value.
    pub fn share_of(&self, total: Decimal) -> Decimal {
        if total == Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.market_value / total
    }
}

/// Account balances, as reported by the brokerage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Available cash
    pub cash: Decimal,
    /// Total equity (cash + market value of positions)
    pub equity: Decimal,
    /// Buying power (may differ from cash due to margin)
    pub buying_power: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position(symbol: &str, market_value: Decimal) -> Position {
        Position {
            symbol: symbol.to_string(),
            asset_class: AssetClass::Equity,
            quantity: dec!(10),
            current_price: market_value / dec!(10),
            market_value,
            unrealized_pnl: Decimal::ZERO,
            unrealized_pnl_percent: Decimal::ZERO,
        }
    }

    #[test]
    fn test_share_of_total() {
        let p = position("AAPL", dec!(250));
        assert_eq!(p.share_of(dec!(1000)), dec!(0.25));
    }

    #[test]
    fn test_share_of_zero_total() {
        let p = position("AAPL", dec!(250));
        assert_eq!(p.share_of(Decimal::ZERO), Decimal::ZERO);
    }
}
