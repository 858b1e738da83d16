//! Daily trading run command.

use anyhow::{Context, Result};
use chrono::{Duration, Local, Timelike, Utc};
use reversion_broker::{AlpacaBroker, AlpacaConfig};
use reversion_config::AppConfig;
use reversion_core::traits::{Broker, Notifier};
use reversion_data::YahooClient;
use reversion_engine::{RebalanceConfig, TradingEngine};
use reversion_notify::{build_notification, fills_digest, SlackNotifier};
use std::path::Path;
use tracing::info;

use crate::cli::RunArgs;

pub async fn run(args: RunArgs, config_path: &Path) -> Result<()> {
    let config =
        reversion_config::load_config(config_path).context("Failed to load configuration")?;

    let broker_config = AlpacaConfig::from_env_names(
        &config.alpaca.api_key_env,
        &config.alpaca.api_secret_env,
        config.alpaca.paper,
    )?;
    let broker = AlpacaBroker::new(broker_config)?;
    let data = YahooClient::new()?;

    let rebalance = RebalanceConfig {
        cash_reserve_pct: config.rebalance.cash_reserve_pct,
        top_divisor: config.rebalance.top_divisor,
    };
    let engine = TradingEngine::new(&broker, &data, config.screener.clone(), rebalance)
        .with_dry_run(args.dry_run);

    let report = engine.run().await?;

    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            println!("{}", report.summary());
            if !report.skipped.is_empty() {
                println!();
                println!("Skipped symbols:");
                for skip in &report.skipped {
                    println!("  {} ({})", skip.symbol, skip.reason);
                }
            }
        }
    }

    if args.dry_run {
        info!("dry run, skipping notification");
        return Ok(());
    }
    maybe_notify(&config, &broker, args.notify, args.no_notify).await
}

/// Send the fills summary when Slack is configured and the local hour
/// falls inside the notify window (or `--notify` forces it).
async fn maybe_notify(
    config: &AppConfig,
    broker: &AlpacaBroker,
    force: bool,
    suppress: bool,
) -> Result<()> {
    if suppress || !config.slack.enabled {
        return Ok(());
    }

    let hour = Local::now().hour();
    let in_window = config.slack.notify_start_hour <= hour && hour < config.slack.notify_end_hour;
    if !force && !in_window {
        info!(hour, "outside the notification window, not sending summary");
        return Ok(());
    }

    let after = Utc::now() - Duration::days(config.slack.days_history as i64);
    let fills = broker.get_fill_activities(after).await?;
    let message = build_notification(hour, &fills_digest(&fills));

    let notifier =
        SlackNotifier::from_env_name(&config.slack.token_env, config.slack.channel.clone())?;
    notifier.send(&message).await?;
    Ok(())
}
