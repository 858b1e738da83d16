//! Core data types for the trading bot.

mod asset;
mod bar;
mod order;
mod position;
mod trade;

pub use asset::AssetClass;
pub use bar::{Bar, BarSeries};
pub use order::{Order, OrderAmount, OrderRequest, OrderStatus, OrderType, Side, TimeInForce};
pub use position::{Account, Position};
pub use trade::{
    DecisionReason, ExecutedTrade, FillActivity, SkipReason, Skipped, TradeDecision,
};
