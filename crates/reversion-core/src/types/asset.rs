//! Asset classification.

use serde::{Deserialize, Serialize};

/// Asset class of a tradeable symbol.
///
/// Carried alongside the symbol from the point of candidate generation so
/// downstream order routing never has to guess from the ticker string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Equity,
    Crypto,
}

impl AssetClass {
    /// Crypto trades around the clock; equities only while the market is open.
    pub fn trades_when_market_closed(&self) -> bool {
        matches!(self, AssetClass::Crypto)
    }

    /// Parse the Alpaca `asset_class` field.
    pub fn from_alpaca(s: &str) -> Option<Self> {
        match s {
            "us_equity" => Some(AssetClass::Equity),
            "crypto" => Some(AssetClass::Crypto),
            _ => None,
        }
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetClass::Equity => write!(f, "equity"),
            AssetClass::Crypto => write!(f, "crypto"),
        }
    }
}
