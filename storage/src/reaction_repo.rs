//! SQLite-backed reaction ledger.
//!
//! One row per (channel, post, voter); the kind column says which set the
//! voter is in. Mutual exclusion across kinds is the primary key, and the
//! toggle is a single upsert, so concurrent voters never overwrite each
//! other's membership.

use crate::error::StorageError;
use crate::sqlite_pool::SqlitePoolManager;
use async_trait::async_trait;
use chrono::Utc;
use postbot_core::{PostKey, ReactionCounts, ReactionKind, ReactionLedger};
use tracing::info;

#[derive(Clone)]
pub struct SqliteReactionLedger {
    pool_manager: SqlitePoolManager,
}

impl SqliteReactionLedger {
    /// Opens (or creates) the database at the given URL and initializes tables.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        Self::with_manager(pool_manager).await
    }

    /// Builds the ledger on an existing pool (shared with other repos).
    pub async fn with_manager(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let ledger = Self { pool_manager };
        ledger.init().await?;
        Ok(ledger)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating reaction tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS reaction_records (
                channel_id INTEGER NOT NULL,
                post_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (channel_id, post_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS reaction_votes (
                channel_id INTEGER NOT NULL,
                post_id INTEGER NOT NULL,
                voter_id INTEGER NOT NULL,
                kind TEXT NOT NULL,
                voted_at TEXT NOT NULL,
                PRIMARY KEY (channel_id, post_id, voter_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_votes_post ON reaction_votes(channel_id, post_id, kind)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn count_kind(&self, key: PostKey, kind: ReactionKind) -> Result<i64, StorageError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM reaction_votes WHERE channel_id = ? AND post_id = ? AND kind = ?",
        )
        .bind(key.channel_id)
        .bind(key.post_id as i64)
        .bind(kind.as_str())
        .fetch_one(self.pool_manager.pool())
        .await?;
        Ok(count)
    }

    async fn read_counts(&self, key: PostKey) -> Result<ReactionCounts, StorageError> {
        Ok(ReactionCounts {
            like: self.count_kind(key, ReactionKind::Like).await?,
            love: self.count_kind(key, ReactionKind::Love).await?,
        })
    }
}

#[async_trait]
impl ReactionLedger for SqliteReactionLedger {
    async fn ensure_record(&self, key: PostKey) -> postbot_core::Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO reaction_records (channel_id, post_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(key.channel_id)
        .bind(key.post_id as i64)
        .bind(Utc::now().to_rfc3339())
        .execute(self.pool_manager.pool())
        .await
        .map_err(StorageError::from)?;
        Ok(())
    }

    async fn toggle(
        &self,
        key: PostKey,
        voter_id: i64,
        kind: ReactionKind,
    ) -> postbot_core::Result<ReactionCounts> {
        self.ensure_record(key).await?;

        // One upsert: the primary key holds a voter to a single kind, so a
        // kind switch and a same-kind re-vote are the same atomic statement.
        sqlx::query(
            r#"
            INSERT INTO reaction_votes (channel_id, post_id, voter_id, kind, voted_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(channel_id, post_id, voter_id) DO UPDATE SET
                kind = excluded.kind,
                voted_at = excluded.voted_at
            "#,
        )
        .bind(key.channel_id)
        .bind(key.post_id as i64)
        .bind(voter_id)
        .bind(kind.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(self.pool_manager.pool())
        .await
        .map_err(StorageError::from)?;

        let counts = self.read_counts(key).await?;
        info!(
            channel_id = key.channel_id,
            post_id = key.post_id,
            voter_id,
            kind = kind.as_str(),
            like = counts.like,
            love = counts.love,
            "step: reaction toggled"
        );
        Ok(counts)
    }

    async fn counts(&self, key: PostKey) -> postbot_core::Result<ReactionCounts> {
        Ok(self.read_counts(key).await?)
    }
}
