//! Broker trait definition.

use crate::error::BrokerError;
use crate::types::{Account, FillActivity, Order, OrderRequest, Position};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait for brokerage integrations.
///
/// Brokers expose account state, submit orders, and report whether the
/// primary equities market is currently open.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Get account balances.
    async fn get_account(&self) -> Result<Account, BrokerError>;

    /// Get all open positions.
    async fn get_positions(&self) -> Result<Vec<Position>, BrokerError>;

    /// Submit a new order.
    ///
    /// # Arguments
    /// * `request` - The order request to submit
    ///
    /// # Returns
    /// The acknowledged order with a broker-assigned ID and initial status
    async fn submit_order(&self, request: OrderRequest) -> Result<Order, BrokerError>;

    /// Check if the equities market is currently open (trading-calendar aware).
    async fn is_market_open(&self) -> Result<bool, BrokerError>;

    /// Get fill activities after the given time, newest first.
    async fn get_fill_activities(
        &self,
        after: DateTime<Utc>,
    ) -> Result<Vec<FillActivity>, BrokerError>;

    /// Get the broker name.
    fn name(&self) -> &str;
}
