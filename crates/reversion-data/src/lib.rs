//! Market data sources for the trading bot.

mod yahoo;

pub use yahoo::YahooClient;
