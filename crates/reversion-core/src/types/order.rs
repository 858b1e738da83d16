//! Order types and structures.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AssetClass;

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type. Every order this bot submits executes at market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    #[default]
    Market,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
        }
    }
}

/// Time in force for orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Valid for the trading day only
    #[default]
    Day,
    /// Good til canceled
    #[serde(rename = "gtc")]
    Gtc,
}

impl std::fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeInForce::Day => write!(f, "day"),
            TimeInForce::Gtc => write!(f, "gtc"),
        }
    }
}

/// Order sizing: a number of shares/units or a dollar-denominated amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderAmount {
    /// Number of shares or units
    Quantity(Decimal),
    /// Dollar amount
    Notional(Decimal),
}

impl OrderAmount {
    /// Get the quantity, if this is a quantity-sized order.
    pub fn quantity(&self) -> Option<Decimal> {
        match self {
            OrderAmount::Quantity(q) => Some(*q),
            OrderAmount::Notional(_) => None,
        }
    }

    /// Get the notional amount, if this is a notional-sized order.
    pub fn notional(&self) -> Option<Decimal> {
        match self {
            OrderAmount::Notional(n) => Some(*n),
            OrderAmount::Quantity(_) => None,
        }
    }
}

impl std::fmt::Display for OrderAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderAmount::Quantity(q) => write!(f, "{} units", q),
            OrderAmount::Notional(n) => write!(f, "${}", n),
        }
    }
}

/// Order request for submitting new orders.
///
/// Carries the asset class explicitly so brokers can route crypto and
/// equity order parameters without re-deriving the class from the ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Symbol to trade
    pub symbol: String,
    /// Asset class of the symbol
    pub asset_class: AssetClass,
    /// Buy or sell
    pub side: Side,
    /// Type of order
    pub order_type: OrderType,
    /// Sizing (quantity or notional)
    pub amount: OrderAmount,
    /// Time in force
    pub time_in_force: TimeInForce,
    /// Client-provided order ID
    pub client_order_id: Option<String>,
}

impl OrderRequest {
    /// Create a market order request with day time in force.
    pub fn market(
        symbol: impl Into<String>,
        asset_class: AssetClass,
        side: Side,
        amount: OrderAmount,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            asset_class,
            side,
            order_type: OrderType::Market,
            amount,
            time_in_force: TimeInForce::Day,
            client_order_id: None,
        }
    }

    /// Set the time in force.
    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }

    /// Set a client order ID.
    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }
}

/// Order status as reported by the brokerage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order accepted but not yet filled
    Accepted,
    /// Order partially filled
    PartiallyFilled,
    /// Order completely filled
    Filled,
    /// Order canceled
    Canceled,
    /// Order rejected
    Rejected,
}

/// An order acknowledged by the brokerage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Broker-assigned order ID
    pub id: String,
    /// Client-provided order ID
    pub client_order_id: String,
    /// Symbol traded
    pub symbol: String,
    /// Buy or sell
    pub side: Side,
    /// Requested sizing
    pub amount: OrderAmount,
    /// Time in force
    pub time_in_force: TimeInForce,
    /// Current status
    pub status: OrderStatus,
    /// Quantity filled so far
    pub filled_quantity: Decimal,
    /// Average fill price
    pub filled_avg_price: Option<Decimal>,
    /// When the order was created at the broker
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_market_request_defaults() {
        let request = OrderRequest::market(
            "AAPL",
            AssetClass::Equity,
            Side::Buy,
            OrderAmount::Quantity(dec!(100)),
        );
        assert_eq!(request.symbol, "AAPL");
        assert_eq!(request.order_type, OrderType::Market);
        assert_eq!(request.time_in_force, TimeInForce::Day);
        assert!(request.client_order_id.is_none());
    }

    #[test]
    fn test_request_builders() {
        let request = OrderRequest::market(
            "BTC-USD",
            AssetClass::Crypto,
            Side::Sell,
            OrderAmount::Notional(dec!(250)),
        )
        .with_time_in_force(TimeInForce::Gtc)
        .with_client_order_id("run-1");
        assert_eq!(request.time_in_force, TimeInForce::Gtc);
        assert_eq!(request.client_order_id.as_deref(), Some("run-1"));
    }

    #[test]
    fn test_amount_accessors() {
        let qty = OrderAmount::Quantity(dec!(12));
        assert_eq!(qty.quantity(), Some(dec!(12)));
        assert_eq!(qty.notional(), None);

        let notional = OrderAmount::Notional(dec!(250.00));
        assert_eq!(notional.notional(), Some(dec!(250.00)));
        assert_eq!(notional.quantity(), None);
    }
}
