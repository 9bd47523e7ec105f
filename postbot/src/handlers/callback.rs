//! Callback-query dispatch: parses the action token once, then routes to
//! profile edits, the posting pipeline, or the reaction service.

use crate::components::BotComponents;
use anyhow::Result;
use postbot_core::{CallbackAction, PostKey};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{error, info, instrument};

#[instrument(skip(bot, q, app))]
pub async fn handle_callback(bot: Bot, q: CallbackQuery, app: Arc<BotComponents>) -> Result<()> {
    let data = match q.data.as_deref() {
        Some(data) => data,
        None => return Ok(()),
    };
    let voter_id = q.from.id.0 as i64;

    let action = match CallbackAction::parse(data) {
        Ok(action) => action,
        Err(e) => {
            info!(voter_id, data, "Rejected malformed action token");
            bot.answer_callback_query(q.id.clone())
                .text(e.user_message())
                .show_alert(true)
                .await?;
            return Ok(());
        }
    };
    info!(voter_id, ?action, "step: callback received");

    match action {
        CallbackAction::DeleteChannel { channel_id } => {
            let removed = app.profiles.remove_channel(voter_id, channel_id).await?;
            let text = if removed {
                "🗑 Channel deleted!"
            } else {
                "⚠️ Channel not found."
            };
            bot.answer_callback_query(q.id.clone())
                .text(text)
                .show_alert(true)
                .await?;
        }

        CallbackAction::DeleteButton { position } => {
            let removed = app.profiles.remove_button(voter_id, position).await?;
            let text = match removed {
                Some(button) => format!("🗑 Button '{}' deleted!", button.text),
                None => "⚠️ Button not found.".to_string(),
            };
            bot.answer_callback_query(q.id.clone())
                .text(text)
                .show_alert(true)
                .await?;
        }

        CallbackAction::SendTo { channel_id, .. } => {
            match app.pipeline.distribute(voter_id, channel_id).await {
                Ok(key) => {
                    info!(
                        user_id = voter_id,
                        channel_id = key.channel_id,
                        post_id = key.post_id,
                        "Distribution succeeded"
                    );
                    bot.answer_callback_query(q.id.clone())
                        .text("✅ Posted successfully!")
                        .show_alert(true)
                        .await?;
                }
                Err(e) => {
                    error!(error = %e, user_id = voter_id, channel_id, "Distribution failed");
                    bot.answer_callback_query(q.id.clone())
                        .text(e.user_message())
                        .show_alert(true)
                        .await?;
                }
            }
        }

        CallbackAction::React { post_id, kind } => {
            let message = match q.message.as_ref() {
                Some(message) => message,
                None => {
                    bot.answer_callback_query(q.id.clone()).await?;
                    return Ok(());
                }
            };
            // Initial layouts carry a zero placeholder until the band is
            // retagged; the pressed message itself is the post either way.
            let post_id = if post_id == 0 {
                message.id().0
            } else {
                post_id
            };
            let key = PostKey::new(message.chat().id.0, post_id);
            let layout = message.regular_message().and_then(|m| m.reply_markup());

            match app.reactions.react(key, voter_id, kind, layout).await {
                Ok(_) => {
                    bot.answer_callback_query(q.id.clone()).await?;
                }
                Err(e) => {
                    error!(error = %e, voter_id, ?key, "Reaction failed");
                    bot.answer_callback_query(q.id.clone())
                        .text(e.user_message())
                        .await?;
                }
            }
        }
    }

    Ok(())
}
