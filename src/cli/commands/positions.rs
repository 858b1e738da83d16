//! Position listing command.

use anyhow::{Context, Result};
use reversion_broker::{AlpacaBroker, AlpacaConfig};
use reversion_core::traits::Broker;
use reversion_data::YahooClient;
use reversion_notify::format_usd;
use reversion_screener::PositionScreener;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    let config =
        reversion_config::load_config(config_path).context("Failed to load configuration")?;

    let broker_config = AlpacaConfig::from_env_names(
        &config.alpaca.api_key_env,
        &config.alpaca.api_secret_env,
        config.alpaca.paper,
    )?;
    let broker = AlpacaBroker::new(broker_config)?;

    let positions = broker.get_positions().await?;
    if positions.is_empty() {
        println!("No open positions.");
        return Ok(());
    }

    let data = YahooClient::new()?;
    let screen = PositionScreener::new(&data, &config.screener)
        .screen(&positions)
        .await;
    let flagged: HashSet<&str> = screen
        .candidates
        .iter()
        .map(|c| c.position.symbol.as_str())
        .collect();

    println!(
        "{:<12} {:<8} {:>14} {:>16} {:>10}  {}",
        "Symbol", "Class", "Qty", "Value", "P/L %", "Signal"
    );
    for position in &positions {
        let signal = if flagged.contains(position.symbol.as_str()) {
            "SELL"
        } else {
            ""
        };
        println!(
            "{:<12} {:<8} {:>14} {:>16} {:>9.2}%  {}",
            position.symbol,
            position.asset_class.to_string(),
            position.quantity,
            format_usd(position.market_value),
            position.unrealized_pnl_percent * Decimal::ONE_HUNDRED,
            signal
        );
    }

    if !screen.skipped.is_empty() {
        println!();
        println!("Skipped symbols:");
        for skip in &screen.skipped {
            println!("  {} ({})", skip.symbol, skip.reason);
        }
    }

    Ok(())
}
