//! Wraps teloxide::Bot behind the core's transport and oracle ports.
//! Production code talks to Telegram through this; tests substitute doubles.

use async_trait::async_trait;
use postbot_core::{AdminRightsOracle, MessagingTransport, PostError, Result};
use teloxide::{
    prelude::*,
    types::{ChatId, MessageId, UserId},
    ApiError, RequestError,
};
use tracing::{info, warn};

/// Thin adapter implementing [`MessagingTransport`] and [`AdminRightsOracle`]
/// over the Telegram Bot API.
pub struct TelegramGateway {
    bot: teloxide::Bot,
    /// The bot's own user id, for membership lookups in target channels.
    bot_id: UserId,
}

impl TelegramGateway {
    /// Creates a gateway from an existing teloxide Bot and its identity
    /// (fetched once at startup via `get_me`).
    pub fn new(bot: teloxide::Bot, bot_id: UserId) -> Self {
        Self { bot, bot_id }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

#[async_trait]
impl MessagingTransport for TelegramGateway {
    async fn copy_message(
        &self,
        source_chat: i64,
        source_msg_id: i32,
        target_chat: i64,
        caption: Option<&str>,
        layout: teloxide::types::InlineKeyboardMarkup,
    ) -> Result<i32> {
        let mut request = self
            .bot
            .copy_message(
                ChatId(target_chat),
                ChatId(source_chat),
                MessageId(source_msg_id),
            )
            .reply_markup(layout);
        if let Some(caption) = caption {
            request = request.caption(caption.to_string());
        }

        let new_id = request
            .await
            .map_err(|e| PostError::Distribution(e.to_string()))?;
        info!(
            source_chat,
            source_msg_id,
            target_chat,
            new_post_id = new_id.0,
            "Copied staged media into channel"
        );
        Ok(new_id.0)
    }

    async fn push_layout(
        &self,
        chat_id: i64,
        post_id: i32,
        layout: teloxide::types::InlineKeyboardMarkup,
    ) -> Result<()> {
        match self
            .bot
            .edit_message_reply_markup(ChatId(chat_id), MessageId(post_id))
            .reply_markup(layout)
            .await
        {
            Ok(_) => Ok(()),
            // Two concurrent recomposes can push identical layouts; Telegram
            // rejects the second edit, which is not a failure for us.
            Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
            Err(e) => Err(PostError::Distribution(e.to_string())),
        }
    }

    async fn chat_title(&self, chat_id: i64) -> Result<String> {
        let chat = self
            .bot
            .get_chat(ChatId(chat_id))
            .await
            .map_err(|_| PostError::NotFound("channel"))?;
        Ok(chat
            .title()
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| chat_id.to_string()))
    }
}

#[async_trait]
impl AdminRightsOracle for TelegramGateway {
    async fn can_post(&self, channel_id: i64) -> Result<bool> {
        match self
            .bot
            .get_chat_member(ChatId(channel_id), self.bot_id)
            .await
        {
            Ok(member) => Ok(member.is_privileged()),
            // The bot is not a member at all, or the chat id is unknown.
            Err(e) => {
                warn!(channel_id, error = %e, "Admin rights lookup failed");
                Ok(false)
            }
        }
    }
}
