//! Core types and traits for the reversion trading bot.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries)
//! - Order, position, and trade types
//! - Asset classification and per-symbol skip outcomes
//! - Core traits for brokers, market data sources, notifiers, and indicators

pub mod error;
pub mod traits;
pub mod types;

pub use error::{EngineError, EngineResult};
pub use traits::*;
pub use types::*;
