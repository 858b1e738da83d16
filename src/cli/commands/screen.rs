//! Market screening command.

use anyhow::{Context, Result};
use reversion_data::YahooClient;
use reversion_screener::OpportunityScreener;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    let config =
        reversion_config::load_config(config_path).context("Failed to load configuration")?;
    let data = YahooClient::new()?;

    let screen = OpportunityScreener::new(&data, &config.screener)
        .screen()
        .await?;

    if screen.candidates.is_empty() {
        println!("No buy candidates right now.");
    } else {
        println!("Buy candidates");
        println!("═══════════════════════════════════════════════════════════");
        for candidate in &screen.candidates {
            println!();
            println!("  {} ({})", candidate.symbol, candidate.asset_class);
            for (window, values) in candidate.snapshot.iter() {
                let rsi = values
                    .rsi
                    .map_or_else(|| "-".to_string(), |r| format!("{:.1}", r));
                let breach = if values.bb_lo == Some(true) {
                    "  below lower band"
                } else {
                    ""
                };
                println!("    w={:<3}  rsi={}{}", window, rsi, breach);
            }
        }
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
