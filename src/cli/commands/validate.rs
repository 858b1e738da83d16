//! Validate configuration command.

use anyhow::Result;
use reversion_config::load_config;
use rust_decimal::Decimal;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Alpaca paper mode: {}", config.alpaca.paper);
            println!(
                "Candidates: {} stocks, {} crypto",
                config.screener.stock_count, config.screener.crypto_count
            );
            println!("Windows: {:?}", config.screener.windows);
            println!(
                "RSI thresholds: buy <= {}, sell >= {}",
                config.screener.rsi_buy_max, config.screener.rsi_sell_min
            );
            println!(
                "Cash reserve target: {}%",
                config.rebalance.cash_reserve_pct * Decimal::ONE_HUNDRED
            );
            println!(
                "Slack notifications: {}",
                if config.slack.enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
