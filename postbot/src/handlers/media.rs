//! Media staging and forwarded-channel registration in private chats.

use crate::components::BotComponents;
use anyhow::Result;
use postbot_core::{AdminRightsOracle, CallbackAction};
use std::sync::Arc;
use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageOrigin},
};
use tracing::{info, instrument};

/// Stages an uploaded photo or video and offers the saved channels as
/// distribution targets. A new upload overwrites the previous staging slot.
#[instrument(skip(bot, msg, app))]
pub async fn handle_media(bot: Bot, msg: Message, app: Arc<BotComponents>) -> Result<()> {
    let user_id = match msg.from.as_ref() {
        Some(user) => user.id.0 as i64,
        None => return Ok(()),
    };

    let profile = app.profiles.load_profile(user_id).await?;
    if profile.channels.is_empty() {
        bot.send_message(
            msg.chat.id,
            "⚠️ You have no channels set. Use /addchannel first.",
        )
        .await?;
        return Ok(());
    }

    app.profiles
        .stage_media(user_id, msg.id.0, msg.caption())
        .await?;
    info!(user_id, message_id = msg.id.0, "step: upload staged");

    let rows: Vec<Vec<InlineKeyboardButton>> = profile
        .channels
        .iter()
        .map(|ch| {
            vec![InlineKeyboardButton::callback(
                ch.title.clone(),
                CallbackAction::SendTo {
                    message_id: msg.id.0,
                    channel_id: ch.id,
                }
                .encode(),
            )]
        })
        .collect();

    bot.send_message(msg.chat.id, "📤 Select a channel to post:")
        .reply_markup(InlineKeyboardMarkup::new(rows))
        .await?;
    Ok(())
}

/// Registers the origin channel of a forwarded post, gated by the admin
/// rights oracle like /addchannel.
#[instrument(skip(bot, msg, app))]
pub async fn handle_forwarded(bot: Bot, msg: Message, app: Arc<BotComponents>) -> Result<()> {
    let user_id = match msg.from.as_ref() {
        Some(user) => user.id.0 as i64,
        None => return Ok(()),
    };
    let (channel_id, title) = match msg.forward_origin() {
        Some(MessageOrigin::Channel { chat, .. }) => (
            chat.id.0,
            chat.title().unwrap_or("channel").to_string(),
        ),
        _ => return Ok(()),
    };

    if !app.gateway.can_post(channel_id).await? {
        bot.send_message(
            msg.chat.id,
            "⚠️ Add me to that channel as an admin first, then forward a post again.",
        )
        .await?;
        return Ok(());
    }

    if app.profiles.add_channel(user_id, channel_id, &title).await? {
        bot.send_message(msg.chat.id, format!("✅ Channel {} saved!", title))
            .await?;
    } else {
        bot.send_message(msg.chat.id, "📌 That channel is already saved.")
            .await?;
    }
    Ok(())
}
