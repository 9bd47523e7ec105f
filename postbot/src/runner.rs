//! Top-level runner: tracing, components, dispatcher.

use crate::components::build_bot_components;
use crate::config::BotConfig;
use crate::telegram::run_dispatcher;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Initializes logging, builds all components from config, and runs the
/// dispatcher until shutdown.
pub async fn run_bot(config: BotConfig) -> Result<()> {
    postbot_core::init_tracing(&config.log_file)?;

    let components = Arc::new(build_bot_components(&config).await?);
    info!("Bot started");

    run_dispatcher(components).await
}
