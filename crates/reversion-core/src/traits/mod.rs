//! Core traits for the trading bot.

mod broker;
mod indicator;
mod market_data;
mod notifier;

pub use broker::Broker;
pub use indicator::{Indicator, MultiOutputIndicator};
pub use market_data::MarketData;
pub use notifier::Notifier;
