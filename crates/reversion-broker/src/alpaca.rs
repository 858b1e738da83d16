//! Alpaca broker integration for paper and live trading.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use reversion_core::error::BrokerError;
use reversion_core::traits::Broker;
use reversion_core::types::{
    Account, AssetClass, FillActivity, Order, OrderAmount, OrderRequest, OrderStatus, Position,
    Side, TimeInForce,
};
use tracing::{debug, info};
use uuid::Uuid;

/// Alpaca API configuration.
#[derive(Debug, Clone)]
pub struct AlpacaConfig {
    pub api_key: String,
    pub api_secret: String,
    pub paper: bool,
}

impl AlpacaConfig {
    /// Create config directly with key and secret.
    pub fn new(api_key: String, api_secret: String, paper: bool) -> Self {
        Self {
            api_key,
            api_secret,
            paper,
        }
    }

    /// Read credentials from the named environment variables.
    ///
    /// The variables are read once here; nothing ever writes to the
    /// process environment.
    pub fn from_env_names(
        key_var: &str,
        secret_var: &str,
        paper: bool,
    ) -> Result<Self, BrokerError> {
        let api_key = std::env::var(key_var)
            .map_err(|_| BrokerError::Configuration(format!("{} not set", key_var)))?;
        let api_secret = std::env::var(secret_var)
            .map_err(|_| BrokerError::Configuration(format!("{} not set", secret_var)))?;

        Ok(Self {
            api_key,
            api_secret,
            paper,
        })
    }

    pub fn base_url(&self) -> &str {
        if self.paper {
            "https://paper-api.alpaca.markets"
        } else {
            "https://api.alpaca.markets"
        }
    }
}

/// Alpaca API response types
#[derive(Debug, Deserialize)]
struct AlpacaAccount {
    cash: String,
    equity: String,
    buying_power: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaPosition {
    symbol: String,
    asset_class: String,
    qty: String,
    current_price: String,
    market_value: String,
    unrealized_pl: String,
    unrealized_plpc: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaOrder {
    id: String,
    client_order_id: String,
    status: String,
    symbol: String,
    side: String,
    qty: Option<String>,
    notional: Option<String>,
    filled_qty: String,
    filled_avg_price: Option<String>,
    time_in_force: String,
    created_at: String,
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest {
    symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    qty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notional: Option<String>,
    side: String,
    #[serde(rename = "type")]
    order_type: String,
    time_in_force: String,
    client_order_id: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaClock {
    is_open: bool,
}

#[derive(Debug, Deserialize)]
struct AlpacaActivity {
    symbol: String,
    side: String,
    qty: String,
    price: String,
    transaction_time: String,
}

/// Convert a canonical symbol (the market-data naming, e.g. `BTC-USD`)
/// into Alpaca's form for order endpoints.
fn to_alpaca_symbol(symbol: &str, asset_class: AssetClass) -> String {
    match asset_class {
        AssetClass::Crypto => symbol.replace('-', "/"),
        AssetClass::Equity => symbol.to_string(),
    }
}

/// Convert an Alpaca position symbol into the canonical form used for
/// market-data lookups.
fn to_canonical_symbol(symbol: &str, asset_class: AssetClass) -> String {
    match asset_class {
        AssetClass::Crypto => {
            if symbol.contains('/') {
                symbol.replace('/', "-")
            } else if let Some(base) = symbol.strip_suffix("USD") {
                if base.is_empty() {
                    symbol.to_string()
                } else {
                    format!("{}-USD", base)
                }
            } else {
                symbol.to_string()
            }
        }
        AssetClass::Equity => symbol.to_string(),
    }
}

fn parse_side(side: &str) -> Side {
    match side {
        "buy" => Side::Buy,
        _ => Side::Sell,
    }
}

fn parse_status(status: &str) -> OrderStatus {
    match status {
        "filled" => OrderStatus::Filled,
        "partially_filled" => OrderStatus::PartiallyFilled,
        "canceled" | "expired" => OrderStatus::Canceled,
        "rejected" => OrderStatus::Rejected,
        _ => OrderStatus::Accepted,
    }
}

fn parse_position(p: AlpacaPosition) -> Position {
    let asset_class = AssetClass::from_alpaca(&p.asset_class).unwrap_or(AssetClass::Equity);

    Position {
        symbol: to_canonical_symbol(&p.symbol, asset_class),
        asset_class,
        quantity: p.qty.parse().unwrap_or(dec!(0)),
        current_price: p.current_price.parse().unwrap_or(dec!(0)),
        market_value: p.market_value.parse().unwrap_or(dec!(0)),
        unrealized_pnl: p.unrealized_pl.parse().unwrap_or(dec!(0)),
        unrealized_pnl_percent: p.unrealized_plpc.parse().unwrap_or(dec!(0)),
    }
}

fn parse_order(order: AlpacaOrder) -> Order {
    let amount = match (&order.notional, &order.qty) {
        (Some(n), _) => OrderAmount::Notional(n.parse().unwrap_or(dec!(0))),
        (None, Some(q)) => OrderAmount::Quantity(q.parse().unwrap_or(dec!(0))),
        (None, None) => OrderAmount::Quantity(dec!(0)),
    };

    let time_in_force = match order.time_in_force.as_str() {
        "gtc" => TimeInForce::Gtc,
        _ => TimeInForce::Day,
    };

    let created_at = DateTime::parse_from_rfc3339(&order.created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    Order {
        id: order.id,
        client_order_id: order.client_order_id,
        symbol: order.symbol,
        side: parse_side(&order.side),
        amount,
        time_in_force,
        status: parse_status(&order.status),
        filled_quantity: order.filled_qty.parse().unwrap_or(dec!(0)),
        filled_avg_price: order.filled_avg_price.as_ref().and_then(|p| p.parse().ok()),
        created_at,
    }
}

/// Alpaca broker client.
pub struct AlpacaBroker {
    config: AlpacaConfig,
    client: Client,
}

impl AlpacaBroker {
    /// Create a new Alpaca broker client.
    pub fn new(config: AlpacaConfig) -> Result<Self, BrokerError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(&config.api_key)
                .map_err(|e| BrokerError::Configuration(e.to_string()))?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(&config.api_secret)
                .map_err(|e| BrokerError::Configuration(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, BrokerError> {
        let resp = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(BrokerError::ApiError(format!("{}: {}", status, text)));
        }

        resp.json()
            .await
            .map_err(|e| BrokerError::ApiError(e.to_string()))
    }
}

#[async_trait]
impl Broker for AlpacaBroker {
    async fn get_account(&self) -> Result<Account, BrokerError> {
        let url = format!("{}/v2/account", self.config.base_url());
        let account: AlpacaAccount = self.get_json(&url, &[]).await?;

        Ok(Account {
            cash: account.cash.parse().unwrap_or(dec!(0)),
            equity: account.equity.parse().unwrap_or(dec!(0)),
            buying_power: account.buying_power.parse().unwrap_or(dec!(0)),
        })
    }

    async fn get_positions(&self) -> Result<Vec<Position>, BrokerError> {
        let url = format!("{}/v2/positions", self.config.base_url());
        let positions: Vec<AlpacaPosition> = self.get_json(&url, &[]).await?;
        Ok(positions.into_iter().map(parse_position).collect())
    }

    async fn submit_order(&self, request: OrderRequest) -> Result<Order, BrokerError> {
        let url = format!("{}/v2/orders", self.config.base_url());

        let side = match request.side {
            Side::Buy => "buy",
            Side::Sell => "sell",
        };
        let (qty, notional) = match request.amount {
            OrderAmount::Quantity(q) => (Some(q.to_string()), None),
            OrderAmount::Notional(n) => (None, Some(n.to_string())),
        };
        let client_order_id = request
            .client_order_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let create_req = CreateOrderRequest {
            symbol: to_alpaca_symbol(&request.symbol, request.asset_class),
            qty,
            notional,
            side: side.to_string(),
            order_type: "market".to_string(),
            time_in_force: request.time_in_force.to_string(),
            client_order_id,
        };

        debug!("Submitting order: {:?}", create_req);

        let resp = self
            .client
            .post(&url)
            .json(&create_req)
            .send()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(BrokerError::OrderRejected(format!("{}: {}", status, text)));
        }

        let order: AlpacaOrder = resp
            .json()
            .await
            .map_err(|e| BrokerError::ApiError(e.to_string()))?;

        info!(
            "Order submitted: {} {} {}",
            order.side, request.amount, order.symbol
        );
        Ok(parse_order(order))
    }

    async fn is_market_open(&self) -> Result<bool, BrokerError> {
        let url = format!("{}/v2/clock", self.config.base_url());
        let clock: AlpacaClock = self.get_json(&url, &[]).await?;
        Ok(clock.is_open)
    }

    async fn get_fill_activities(
        &self,
        after: DateTime<Utc>,
    ) -> Result<Vec<FillActivity>, BrokerError> {
        let url = format!("{}/v2/account/activities", self.config.base_url());
        let params = [
            ("activity_types", "FILL".to_string()),
            ("direction", "desc".to_string()),
            ("after", after.to_rfc3339()),
        ];

        let activities: Vec<AlpacaActivity> = self.get_json(&url, &params).await?;

        Ok(activities
            .into_iter()
            .map(|a| FillActivity {
                symbol: a.symbol,
                side: parse_side(&a.side),
                quantity: a.qty.parse().unwrap_or(dec!(0)),
                price: a.price.parse().unwrap_or(dec!(0)),
                transaction_time: DateTime::parse_from_rfc3339(&a.transaction_time)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
            .collect())
    }

    fn name(&self) -> &str {
        if self.config.paper {
            "Alpaca Paper"
        } else {
            "Alpaca Live"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_to_alpaca() {
        assert_eq!(to_alpaca_symbol("AAPL", AssetClass::Equity), "AAPL");
        assert_eq!(to_alpaca_symbol("BTC-USD", AssetClass::Crypto), "BTC/USD");
    }

    #[test]
    fn test_symbol_to_canonical() {
        assert_eq!(to_canonical_symbol("AAPL", AssetClass::Equity), "AAPL");
        assert_eq!(to_canonical_symbol("BTC/USD", AssetClass::Crypto), "BTC-USD");
        assert_eq!(to_canonical_symbol("BTCUSD", AssetClass::Crypto), "BTC-USD");
        assert_eq!(to_canonical_symbol("USD", AssetClass::Crypto), "USD");
    }

    #[test]
    fn test_parse_position_payload() {
        let payload = r#"{
            "symbol": "ETHUSD",
            "asset_class": "crypto",
            "qty": "1.5",
            "current_price": "2000",
            "market_value": "3000",
            "unrealized_pl": "150",
            "unrealized_plpc": "0.0526"
        }"#;

        let raw: AlpacaPosition = serde_json::from_str(payload).unwrap();
        let position = parse_position(raw);

        assert_eq!(position.symbol, "ETH-USD");
        assert_eq!(position.asset_class, AssetClass::Crypto);
        assert_eq!(position.quantity, dec!(1.5));
        assert_eq!(position.market_value, dec!(3000));
    }

    #[test]
    fn test_parse_order_payload() {
        let payload = r#"{
            "id": "61e69015-8549-4bfd-b9c3-01e75843f47d",
            "client_order_id": "run-1",
            "status": "accepted",
            "symbol": "AAPL",
            "side": "buy",
            "qty": null,
            "notional": "250",
            "filled_qty": "0",
            "filled_avg_price": null,
            "time_in_force": "day",
            "created_at": "2024-03-01T14:30:00Z"
        }"#;

        let raw: AlpacaOrder = serde_json::from_str(payload).unwrap();
        let order = parse_order(raw);

        assert_eq!(order.status, OrderStatus::Accepted);
        assert_eq!(order.amount, OrderAmount::Notional(dec!(250)));
        assert_eq!(order.side, Side::Buy);
        assert_eq!(order.time_in_force, TimeInForce::Day);
    }
}
