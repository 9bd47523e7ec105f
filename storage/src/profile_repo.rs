//! Profile repository: per-user channels, caption, custom buttons, and the
//! media staging slot.
//!
//! Uses SqlitePoolManager; callers use the CRUD methods directly, while the
//! posting core sees this repository only through the narrow
//! [`ProfileStore`] port.

use crate::error::StorageError;
use crate::sqlite_pool::SqlitePoolManager;
use async_trait::async_trait;
use chrono::Utc;
use postbot_core::{
    ChannelRef, LinkButton, PostError, ProfileStore, StagedMedia, UserProfile, MAX_CUSTOM_BUTTONS,
};
use tracing::info;

#[derive(Clone)]
pub struct ProfileRepository {
    pool_manager: SqlitePoolManager,
}

impl ProfileRepository {
    /// Opens (or creates) the database at the given URL and initializes tables.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        Self::with_manager(pool_manager).await
    }

    /// Builds the repository on an existing pool (shared with other repos).
    pub async fn with_manager(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating profile tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY,
                custom_caption TEXT,
                pending_media_id INTEGER,
                pending_media_caption TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS channels (
                user_id INTEGER NOT NULL,
                channel_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                position INTEGER NOT NULL,
                PRIMARY KEY (user_id, channel_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS buttons (
                user_id INTEGER NOT NULL,
                position INTEGER NOT NULL,
                text TEXT NOT NULL,
                url TEXT NOT NULL,
                PRIMARY KEY (user_id, position)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_channels_user ON channels(user_id);
            CREATE INDEX IF NOT EXISTS idx_buttons_user ON buttons(user_id);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Creates the user row on first interaction; a no-op afterwards.
    pub async fn ensure_user(&self, user_id: i64) -> Result<(), StorageError> {
        sqlx::query("INSERT OR IGNORE INTO users (user_id, created_at) VALUES (?, ?)")
            .bind(user_id)
            .bind(Utc::now().to_rfc3339())
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }

    /// Loads the full profile, creating an empty record on first access.
    pub async fn load_profile(&self, user_id: i64) -> Result<UserProfile, StorageError> {
        self.ensure_user(user_id).await?;

        let pool = self.pool_manager.pool();

        let (custom_caption, pending_media_id, pending_media_caption): (
            Option<String>,
            Option<i64>,
            Option<String>,
        ) = sqlx::query_as(
            "SELECT custom_caption, pending_media_id, pending_media_caption FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        let channels: Vec<(i64, String)> = sqlx::query_as(
            "SELECT channel_id, title FROM channels WHERE user_id = ? ORDER BY position",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        let buttons: Vec<(String, String)> =
            sqlx::query_as("SELECT text, url FROM buttons WHERE user_id = ? ORDER BY position")
                .bind(user_id)
                .fetch_all(pool)
                .await?;

        Ok(UserProfile {
            user_id,
            channels: channels
                .into_iter()
                .map(|(id, title)| ChannelRef { id, title })
                .collect(),
            custom_caption,
            custom_buttons: buttons
                .into_iter()
                .map(|(text, url)| LinkButton { text, url })
                .collect(),
            pending_media: pending_media_id.map(|id| StagedMedia {
                message_id: id as i32,
                caption: pending_media_caption,
            }),
        })
    }

    /// Registers a channel. Returns false when the channel is already saved.
    pub async fn add_channel(
        &self,
        user_id: i64,
        channel_id: i64,
        title: &str,
    ) -> Result<bool, StorageError> {
        self.ensure_user(user_id).await?;

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO channels (user_id, channel_id, title, position)
            SELECT ?1, ?2, ?3, COALESCE((SELECT MAX(position) FROM channels WHERE user_id = ?1), -1) + 1
            "#,
        )
        .bind(user_id)
        .bind(channel_id)
        .bind(title)
        .execute(self.pool_manager.pool())
        .await?;

        let added = result.rows_affected() > 0;
        info!(user_id, channel_id, added, "step: add_channel");
        Ok(added)
    }

    /// Removes a saved channel; returns true if one was removed.
    pub async fn remove_channel(&self, user_id: i64, channel_id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM channels WHERE user_id = ? AND channel_id = ?")
            .bind(user_id)
            .bind(channel_id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_caption(&self, user_id: i64, caption: &str) -> Result<(), StorageError> {
        self.ensure_user(user_id).await?;
        sqlx::query("UPDATE users SET custom_caption = ? WHERE user_id = ?")
            .bind(caption)
            .bind(user_id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }

    pub async fn clear_caption(&self, user_id: i64) -> Result<(), StorageError> {
        self.ensure_user(user_id).await?;
        sqlx::query("UPDATE users SET custom_caption = NULL WHERE user_id = ?")
            .bind(user_id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }

    /// Appends a custom button. The cap is enforced in the insert itself so
    /// two concurrent adds cannot overshoot it.
    pub async fn add_button(
        &self,
        user_id: i64,
        text: &str,
        url: &str,
    ) -> Result<(), StorageError> {
        self.ensure_user(user_id).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO buttons (user_id, position, text, url)
            SELECT ?1, COALESCE((SELECT MAX(position) FROM buttons WHERE user_id = ?1), -1) + 1, ?2, ?3
            WHERE (SELECT COUNT(*) FROM buttons WHERE user_id = ?1) < ?4
            "#,
        )
        .bind(user_id)
        .bind(text)
        .bind(url)
        .bind(MAX_CUSTOM_BUTTONS as i64)
        .execute(self.pool_manager.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::LimitExceeded(format!(
                "at most {} custom buttons",
                MAX_CUSTOM_BUTTONS
            )));
        }
        Ok(())
    }

    /// Removes the button at the given list position and compacts the
    /// remaining positions. Returns the removed button, or None.
    pub async fn remove_button(
        &self,
        user_id: i64,
        position: i64,
    ) -> Result<Option<LinkButton>, StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;

        let removed: Option<(String, String)> =
            sqlx::query_as("SELECT text, url FROM buttons WHERE user_id = ? AND position = ?")
                .bind(user_id)
                .bind(position)
                .fetch_optional(&mut *tx)
                .await?;

        if removed.is_none() {
            return Ok(None);
        }

        sqlx::query("DELETE FROM buttons WHERE user_id = ? AND position = ?")
            .bind(user_id)
            .bind(position)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE buttons SET position = position - 1 WHERE user_id = ? AND position > ?")
            .bind(user_id)
            .bind(position)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(removed.map(|(text, url)| LinkButton { text, url }))
    }

    pub async fn clear_buttons(&self, user_id: i64) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM buttons WHERE user_id = ?")
            .bind(user_id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }

    /// Writes the staging slot. A single UPDATE, so concurrent uploads race
    /// last-write-wins.
    pub async fn stage_media(
        &self,
        user_id: i64,
        message_id: i32,
        caption: Option<&str>,
    ) -> Result<(), StorageError> {
        self.ensure_user(user_id).await?;
        sqlx::query(
            "UPDATE users SET pending_media_id = ?, pending_media_caption = ? WHERE user_id = ?",
        )
        .bind(message_id as i64)
        .bind(caption)
        .bind(user_id)
        .execute(self.pool_manager.pool())
        .await?;
        info!(user_id, message_id, "step: media staged");
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for ProfileRepository {
    async fn get_profile(&self, user_id: i64) -> postbot_core::Result<UserProfile> {
        Ok(self.load_profile(user_id).await?)
    }

    async fn set_pending_media(
        &self,
        user_id: i64,
        media: StagedMedia,
    ) -> postbot_core::Result<()> {
        self.stage_media(user_id, media.message_id, media.caption.as_deref())
            .await
            .map_err(PostError::from)
    }
}
