//! Private-chat command handlers: channel registration and the caption and
//! custom-button CRUD surface.

use crate::components::BotComponents;
use anyhow::Result;
use postbot_core::{AdminRightsOracle, CallbackAction, MessagingTransport};
use std::sync::Arc;
use storage::StorageError;
use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup},
    utils::command::BotCommands,
};
use tracing::{info, instrument};

#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    /// Show the command overview.
    Start,
    /// Add a channel by id: /addchannel <id>
    AddChannel(String),
    /// List saved channels.
    MyChannels,
    /// Pick a channel to delete.
    DelChannel,
    /// Set the custom caption: /setcap <caption>
    SetCap(String),
    /// Show the custom caption.
    SeeCap,
    /// Delete the custom caption.
    DelCap,
    /// Add a custom button: /addbutton <text> <url>
    #[command(parse_with = "split")]
    AddButton { text: String, url: String },
    /// List custom buttons.
    MyButtons,
    /// Pick a custom button to delete.
    DelButton,
    /// Remove all custom buttons.
    ClearButtons,
}

const START_TEXT: &str = "👋 Welcome!\n\n\
➕ /addchannel <id> → Add a channel\n\
📌 Or forward a post from your channel\n\
📂 /mychannels → See saved channels\n\
🗑 /delchannel → Delete channel\n\n\
✍️ /setcap <caption> → Set custom caption\n\
👀 /seecap → See caption\n\
❌ /delcap → Delete caption\n\n\
🔘 /addbutton <text> <url> → Add custom button\n\
📂 /mybuttons → See your buttons\n\
🗑 /delbutton → Delete a button\n\
♻️ /clearbuttons → Clear all buttons\n\n\
📤 Send me a photo or video to post it.";

#[instrument(skip(bot, msg, app))]
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    app: Arc<BotComponents>,
) -> Result<()> {
    let user_id = match msg.from.as_ref() {
        Some(user) => user.id.0 as i64,
        None => return Ok(()),
    };
    info!(user_id, command = ?cmd, "step: command received");

    match cmd {
        Command::Start => {
            bot.send_message(msg.chat.id, START_TEXT).await?;
        }

        Command::AddChannel(arg) => {
            let arg = arg.trim();
            let channel_id: i64 = match arg.parse() {
                Ok(id) => id,
                Err(_) => {
                    bot.send_message(
                        msg.chat.id,
                        "⚠️ Usage: /addchannel <id>\n\n💡 Example:\n/addchannel -1001234567890",
                    )
                    .await?;
                    return Ok(());
                }
            };

            if !app.gateway.can_post(channel_id).await? {
                bot.send_message(
                    msg.chat.id,
                    "⚠️ Add me to that channel as an admin first, then try again.",
                )
                .await?;
                return Ok(());
            }

            let title = match app.gateway.chat_title(channel_id).await {
                Ok(title) => title,
                Err(_) => channel_id.to_string(),
            };

            if app.profiles.add_channel(user_id, channel_id, &title).await? {
                bot.send_message(msg.chat.id, format!("✅ Channel {} saved!", title))
                    .await?;
            } else {
                bot.send_message(msg.chat.id, "📌 That channel is already saved.")
                    .await?;
            }
        }

        Command::MyChannels => {
            let profile = app.profiles.load_profile(user_id).await?;
            if profile.channels.is_empty() {
                bot.send_message(
                    msg.chat.id,
                    "📂 You have no saved channels yet.\n\n💡 Use /addchannel <id>",
                )
                .await?;
                return Ok(());
            }
            let lines: Vec<String> = profile
                .channels
                .iter()
                .map(|ch| format!("• {} ({})", ch.title, ch.id))
                .collect();
            bot.send_message(
                msg.chat.id,
                format!("📂 Your channels:\n\n{}", lines.join("\n")),
            )
            .await?;
        }

        Command::DelChannel => {
            let profile = app.profiles.load_profile(user_id).await?;
            if profile.channels.is_empty() {
                bot.send_message(msg.chat.id, "📂 You have no channels to delete.")
                    .await?;
                return Ok(());
            }
            let rows: Vec<Vec<InlineKeyboardButton>> = profile
                .channels
                .iter()
                .map(|ch| {
                    vec![InlineKeyboardButton::callback(
                        format!("🗑 {}", ch.title),
                        CallbackAction::DeleteChannel { channel_id: ch.id }.encode(),
                    )]
                })
                .collect();
            bot.send_message(msg.chat.id, "🗑 Select a channel to delete:")
                .reply_markup(InlineKeyboardMarkup::new(rows))
                .await?;
        }

        Command::SetCap(caption) => {
            let caption = caption.trim();
            if caption.is_empty() {
                bot.send_message(
                    msg.chat.id,
                    "⚠️ Usage: /setcap <your caption>\n\n💡 Example:\n/setcap My Custom Caption",
                )
                .await?;
                return Ok(());
            }
            app.profiles.set_caption(user_id, caption).await?;
            bot.send_message(msg.chat.id, "✅ Custom caption set successfully!")
                .await?;
        }

        Command::SeeCap => {
            let profile = app.profiles.load_profile(user_id).await?;
            match profile.custom_caption {
                Some(caption) => {
                    bot.send_message(msg.chat.id, format!("📝 Your caption:\n\n{}", caption))
                        .await?;
                }
                None => {
                    bot.send_message(
                        msg.chat.id,
                        "⚠️ You don't have any custom caption set.\n\n💡 Use /setcap <caption>",
                    )
                    .await?;
                }
            }
        }

        Command::DelCap => {
            app.profiles.clear_caption(user_id).await?;
            bot.send_message(msg.chat.id, "🗑 Custom caption deleted!")
                .await?;
        }

        Command::AddButton { text, url } => {
            if reqwest::Url::parse(&url).is_err() {
                bot.send_message(
                    msg.chat.id,
                    "⚠️ Usage: /addbutton <text> <url>\n\n💡 Example:\n/addbutton WatchNow https://example.com",
                )
                .await?;
                return Ok(());
            }
            match app.profiles.add_button(user_id, &text, &url).await {
                Ok(()) => {
                    bot.send_message(
                        msg.chat.id,
                        format!(
                            "✅ Button {} added successfully!\n\n💡 Use /mybuttons to see all buttons.",
                            text
                        ),
                    )
                    .await?;
                }
                Err(StorageError::LimitExceeded(_)) => {
                    bot.send_message(
                        msg.chat.id,
                        "⚠️ You already have the maximum of 10 custom buttons.",
                    )
                    .await?;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Command::MyButtons => {
            let profile = app.profiles.load_profile(user_id).await?;
            if profile.custom_buttons.is_empty() {
                bot.send_message(
                    msg.chat.id,
                    "📂 You don't have any custom buttons yet.\n\n💡 Add with /addbutton <text> <url>",
                )
                .await?;
                return Ok(());
            }
            let rows: Vec<Vec<InlineKeyboardButton>> = profile
                .custom_buttons
                .iter()
                .filter_map(|b| {
                    b.url
                        .parse::<reqwest::Url>()
                        .ok()
                        .map(|url| vec![InlineKeyboardButton::url(b.text.clone(), url)])
                })
                .collect();
            bot.send_message(msg.chat.id, "📂 Your custom buttons:")
                .reply_markup(InlineKeyboardMarkup::new(rows))
                .await?;
        }

        Command::DelButton => {
            let profile = app.profiles.load_profile(user_id).await?;
            if profile.custom_buttons.is_empty() {
                bot.send_message(msg.chat.id, "📂 You don't have any custom buttons to delete.")
                    .await?;
                return Ok(());
            }
            let rows: Vec<Vec<InlineKeyboardButton>> = profile
                .custom_buttons
                .iter()
                .enumerate()
                .map(|(position, b)| {
                    vec![InlineKeyboardButton::callback(
                        format!("❌ {}", b.text),
                        CallbackAction::DeleteButton {
                            position: position as i64,
                        }
                        .encode(),
                    )]
                })
                .collect();
            bot.send_message(msg.chat.id, "🗑 Select a button to delete:")
                .reply_markup(InlineKeyboardMarkup::new(rows))
                .await?;
        }

        Command::ClearButtons => {
            app.profiles.clear_buttons(user_id).await?;
            bot.send_message(msg.chat.id, "🗑 All custom buttons cleared!")
                .await?;
        }
    }

    Ok(())
}
