//! Bot config: Telegram connection, logging, database, caption signature and
//! fixed button. Loaded from env.

use crate::pipeline::ComposerSettings;
use anyhow::{Context, Result};
use postbot_core::LinkButton;
use std::env;

/// Runtime configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// Profile + reaction database (SQLite file path)
    pub database_url: String,
    /// Log file path
    pub log_file: String,
    /// SIGNATURE: last caption block on distributed posts; unset or empty omits it
    pub signature: Option<String>,
    /// FIXED_BUTTON_TEXT + FIXED_BUTTON_URL: static last keyboard row
    pub fixed_button: Option<LinkButton>,
    /// REACTION_STORE: "sqlite" (default) or "memory"
    pub reaction_store: String,
}

impl BotConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    /// Call validate() after load to fail fast before init.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(t) => t,
            None => env::var("BOT_TOKEN").context("BOT_TOKEN not set")?,
        };
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "./postbot.db".to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/postbot.log".to_string());
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let signature = env::var("SIGNATURE").ok().filter(|s| !s.trim().is_empty());
        let fixed_button = match (env::var("FIXED_BUTTON_TEXT"), env::var("FIXED_BUTTON_URL")) {
            (Ok(text), Ok(url)) => Some(LinkButton { text, url }),
            _ => None,
        };
        let reaction_store =
            env::var("REACTION_STORE").unwrap_or_else(|_| "sqlite".to_string());

        Ok(Self {
            bot_token,
            telegram_api_url,
            database_url,
            log_file,
            signature,
            fixed_button,
            reaction_store,
        })
    }

    /// Validate config (URLs must parse, store type must be known).
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        if let Some(ref button) = self.fixed_button {
            if reqwest::Url::parse(&button.url).is_err() {
                anyhow::bail!("FIXED_BUTTON_URL is not a valid URL: {}", button.url);
            }
        }
        match self.reaction_store.as_str() {
            "sqlite" | "memory" => {}
            other => anyhow::bail!(
                "REACTION_STORE must be \"sqlite\" or \"memory\", got: {}",
                other
            ),
        }
        Ok(())
    }

    /// Caption/keyboard settings handed to the posting pipeline.
    pub fn composer_settings(&self) -> ComposerSettings {
        ComposerSettings {
            signature: self.signature.clone(),
            fixed_button: self.fixed_button.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> BotConfig {
        BotConfig {
            bot_token: "token".to_string(),
            telegram_api_url: None,
            database_url: "./postbot.db".to_string(),
            log_file: "logs/postbot.log".to_string(),
            signature: None,
            fixed_button: None,
            reaction_store: "sqlite".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_api_url() {
        let mut config = base_config();
        config.telegram_api_url = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_fixed_button_url() {
        let mut config = base_config();
        config.fixed_button = Some(LinkButton {
            text: "Join".to_string(),
            url: "nope".to_string(),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_store() {
        let mut config = base_config();
        config.reaction_store = "redis".to_string();
        assert!(config.validate().is_err());
    }
}
