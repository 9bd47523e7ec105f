//! Component factory: builds BotComponents from config. Isolates assembly
//! logic from the runner; everything downstream receives its collaborators
//! from here instead of reaching for globals.

use crate::config::BotConfig;
use crate::pipeline::PostingPipeline;
use crate::reactions::ReactionService;
use crate::telegram::TelegramGateway;
use anyhow::{Context, Result};
use postbot_core::ReactionLedger;
use std::sync::Arc;
use storage::{InMemoryReactionLedger, ProfileRepository, SqlitePoolManager, SqliteReactionLedger};
use teloxide::prelude::*;
use tracing::{info, instrument};

/// Core dependencies for the dispatcher and handlers.
pub struct BotComponents {
    pub bot: Bot,
    pub profiles: Arc<ProfileRepository>,
    pub ledger: Arc<dyn ReactionLedger>,
    pub gateway: Arc<TelegramGateway>,
    pub pipeline: Arc<PostingPipeline>,
    pub reactions: Arc<ReactionService>,
}

/// Creates the bot, repositories, ledger, gateway, pipeline, and reaction
/// service from config.
#[instrument(skip(config))]
pub async fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let mut bot = Bot::new(config.bot_token.clone());
    if let Some(url) = &config.telegram_api_url {
        bot = bot.set_api_url(url.parse().context("Invalid Telegram API URL")?);
    }

    let me = bot
        .get_me()
        .await
        .context("get_me failed; check BOT_TOKEN")?;
    info!(bot_id = me.id.0, username = %me.username(), "Bot identity resolved");

    let pool = SqlitePoolManager::new(&config.database_url)
        .await
        .context("Failed to open database")?;
    let profiles = Arc::new(ProfileRepository::with_manager(pool.clone()).await?);

    let ledger: Arc<dyn ReactionLedger> = match config.reaction_store.as_str() {
        "memory" => {
            info!("Using in-memory reaction ledger");
            Arc::new(InMemoryReactionLedger::new())
        }
        _ => {
            info!(database_url = %config.database_url, "Using SQLite reaction ledger");
            Arc::new(SqliteReactionLedger::with_manager(pool.clone()).await?)
        }
    };

    let gateway = Arc::new(TelegramGateway::new(bot.clone(), me.id));

    let pipeline = Arc::new(PostingPipeline::new(
        profiles.clone(),
        ledger.clone(),
        gateway.clone(),
        gateway.clone(),
        config.composer_settings(),
    ));
    let reactions = Arc::new(ReactionService::new(ledger.clone(), gateway.clone()));

    Ok(BotComponents {
        bot,
        profiles,
        ledger,
        gateway,
        pipeline,
        reactions,
    })
}
