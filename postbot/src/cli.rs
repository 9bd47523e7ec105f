//! Command-line interface for the bot binary.

use crate::config::BotConfig;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "postbot", about = "Telegram channel post bot", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot
    Run {
        /// Bot token; overrides BOT_TOKEN from the environment
        #[arg(long)]
        token: Option<String>,
    },
}

/// Loads and validates config; fails fast before any network or disk work.
pub fn load_config(token: Option<String>) -> Result<BotConfig> {
    let config = BotConfig::load(token)?;
    config.validate()?;
    Ok(config)
}
