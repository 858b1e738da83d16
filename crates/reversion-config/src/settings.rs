//! Configuration structures.

use reversion_screener::ScreenerConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub alpaca: AlpacaSettings,
    #[serde(default)]
    pub slack: SlackSettings,
    #[serde(default)]
    pub screener: ScreenerConfig,
    #[serde(default)]
    pub rebalance: RebalanceSettings,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "reversion".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Alpaca API settings.
///
/// Credentials are referenced by environment variable name and read at
/// broker construction; the process environment is never written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlpacaSettings {
    pub api_key_env: String,
    pub api_secret_env: String,
    pub paper: bool,
}

impl Default for AlpacaSettings {
    fn default() -> Self {
        Self {
            api_key_env: "ALPACA_API_KEY".to_string(),
            api_secret_env: "ALPACA_API_SECRET".to_string(),
            paper: true,
        }
    }
}

/// Slack notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackSettings {
    pub enabled: bool,
    pub token_env: String,
    pub channel: String,
    /// Local hour (inclusive) from which the summary may be sent
    pub notify_start_hour: u32,
    /// Local hour (exclusive) until which the summary may be sent
    pub notify_end_hour: u32,
    /// How many days of fills the summary covers
    pub days_history: u32,
}

impl Default for SlackSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            token_env: "SLACK_BOT_TOKEN".to_string(),
            channel: String::new(),
            notify_start_hour: 6,
            notify_end_hour: 9,
            days_history: 1,
        }
    }
}

/// Cash-rebalance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceSettings {
    /// Target cash share of total holdings
    pub cash_reserve_pct: Decimal,
    /// Positions ranked by profit are split into this many tiers; the top
    /// tier funds the rebalance
    pub top_divisor: usize,
}

impl Default for RebalanceSettings {
    fn default() -> Self {
        use rust_decimal_macros::dec;
        Self {
            cash_reserve_pct: dec!(0.10),
            top_divisor: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_carry_screening_constants() {
        let config = AppConfig::default();

        assert_eq!(config.screener.stock_count, 25);
        assert_eq!(config.screener.crypto_count, 25);
        assert_eq!(config.screener.windows, vec![14, 30, 50, 200]);
        assert!((config.screener.rsi_buy_max - 30.0).abs() < f64::EPSILON);
        assert!((config.screener.rsi_sell_min - 70.0).abs() < f64::EPSILON);
        assert!((config.screener.std_dev_multiplier - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.rebalance.cash_reserve_pct, dec!(0.10));
        assert_eq!(config.rebalance.top_divisor, 4);
    }

    #[test]
    fn test_defaults_use_paper_trading() {
        let config = AppConfig::default();
        assert!(config.alpaca.paper);
        assert!(!config.slack.enabled);
    }
}
