//! Candidate screening for the daily trading run.
//!
//! Two screeners share the same indicator pipeline: the opportunity
//! screener walks the day's losing stocks and popular crypto looking for
//! oversold symbols to buy, and the position screener walks currently held
//! assets looking for overbought symbols to sell. Both are fail-open per
//! symbol: a symbol whose history cannot be fetched is excluded and the
//! exclusion is recorded, never fatal.

mod history;
mod opportunity;
mod positions;
mod rules;

pub use history::latest_snapshot;
pub use opportunity::{BuyCandidate, OpportunityScreen, OpportunityScreener};
pub use positions::{PositionScreen, PositionScreener, SellCandidate};
pub use rules::{buy_signal, sell_signal, ScreenerConfig};
