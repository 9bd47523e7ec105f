//! Dispatcher wiring: message branches (commands, forwarded posts, media
//! uploads, all private-chat only) plus callback queries. Each update is
//! handled as its own task by the dispatcher; handler errors are logged and
//! never stop the loop.

use crate::components::BotComponents;
use crate::handlers::{
    handle_callback, handle_command, handle_forwarded, handle_media, Command,
};
use anyhow::Result;
use std::sync::Arc;
use teloxide::{prelude::*, types::MessageOrigin};
use tracing::error;

async fn command_endpoint(
    bot: Bot,
    msg: Message,
    cmd: Command,
    app: Arc<BotComponents>,
) -> Result<()> {
    if let Err(e) = handle_command(bot, msg, cmd, app).await {
        error!(error = %e, "Command handler failed");
    }
    Ok(())
}

async fn forwarded_endpoint(bot: Bot, msg: Message, app: Arc<BotComponents>) -> Result<()> {
    if let Err(e) = handle_forwarded(bot, msg, app).await {
        error!(error = %e, "Forwarded-post handler failed");
    }
    Ok(())
}

async fn media_endpoint(bot: Bot, msg: Message, app: Arc<BotComponents>) -> Result<()> {
    if let Err(e) = handle_media(bot, msg, app).await {
        error!(error = %e, "Media handler failed");
    }
    Ok(())
}

async fn callback_endpoint(bot: Bot, q: CallbackQuery, app: Arc<BotComponents>) -> Result<()> {
    if let Err(e) = handle_callback(bot, q, app).await {
        error!(error = %e, "Callback handler failed");
    }
    Ok(())
}

/// Builds the dptree handler and runs the dispatcher until shutdown.
pub async fn run_dispatcher(components: Arc<BotComponents>) -> Result<()> {
    let bot = components.bot.clone();

    let handler = dptree::entry()
        .branch(
            Update::filter_message().branch(
                dptree::filter(|msg: Message| msg.chat.is_private())
                    .branch(
                        dptree::entry()
                            .filter_command::<Command>()
                            .endpoint(command_endpoint),
                    )
                    .branch(
                        dptree::filter(|msg: Message| {
                            matches!(msg.forward_origin(), Some(MessageOrigin::Channel { .. }))
                        })
                        .endpoint(forwarded_endpoint),
                    )
                    .branch(
                        dptree::filter(|msg: Message| {
                            msg.photo().is_some() || msg.video().is_some()
                        })
                        .endpoint(media_endpoint),
                    ),
            ),
        )
        .branch(Update::filter_callback_query().endpoint(callback_endpoint));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![components])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
