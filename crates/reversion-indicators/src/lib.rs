//! Technical indicators for the screening rules.
//!
//! This crate provides the indicator kernels the screeners run over daily
//! close prices:
//! - Simple moving average
//! - RSI (Wilder smoothing)
//! - Bollinger Bands with breach flags
//! - Multi-window snapshots combining all of the above

pub mod momentum;
pub mod moving_average;
pub mod snapshot;
pub mod volatility;

pub use momentum::Rsi;
pub use moving_average::Sma;
pub use snapshot::{IndicatorSnapshot, WindowSnapshot};
pub use volatility::{BollingerBands, BollingerOutput};
