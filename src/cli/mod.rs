//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reversion")]
#[command(author, version, about = "Daily mean-reversion trading bot for stocks and crypto")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute the full daily trading cycle
    Run(RunArgs),
    /// Screen the market for buy candidates without trading
    Screen,
    /// List current positions with sell flags
    Positions,
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Screen and plan without submitting orders
    #[arg(long)]
    pub dry_run: bool,

    /// Send the Slack summary even outside the notify window
    #[arg(long)]
    pub notify: bool,

    /// Never send the Slack summary
    #[arg(long, conflicts_with = "notify")]
    pub no_notify: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: String,
}
