//! Ports of the posting core: the narrow interfaces to the profile store,
//! the reaction ledger, the admin-rights oracle, and the messaging
//! transport. The pipeline takes these as injected dependencies; production
//! code maps them to SQLite and Telegram, tests substitute doubles.

use crate::error::Result;
use crate::types::{PostKey, ReactionCounts, ReactionKind, StagedMedia, UserProfile};
use async_trait::async_trait;
use teloxide::types::InlineKeyboardMarkup;

/// The core's view of per-user profile storage. The full CRUD surface
/// (channels, captions, buttons) lives on the concrete repository; the
/// posting core only ever reads a profile and writes the staging slot.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns the user's profile, creating an empty record on first access.
    async fn get_profile(&self, user_id: i64) -> Result<UserProfile>;
    /// Stages media for the user. Last write wins under concurrent uploads.
    async fn set_pending_media(&self, user_id: i64, media: StagedMedia) -> Result<()>;
}

/// Keyed store of per-post reaction membership. A voter appears in at most
/// one kind's set at any time; implementations must keep `toggle` atomic per
/// set membership (no read-whole-record / write-whole-record cycle).
#[async_trait]
pub trait ReactionLedger: Send + Sync {
    /// Creates an empty two-kind record if absent. Called at distribution
    /// time and lazily on first vote.
    async fn ensure_record(&self, key: PostKey) -> Result<()>;
    /// Moves the voter's membership to `kind` and returns the new counts.
    /// Re-voting the same kind leaves membership unchanged.
    async fn toggle(&self, key: PostKey, voter_id: i64, kind: ReactionKind)
        -> Result<ReactionCounts>;
    /// Current counts for the record (zero if absent).
    async fn counts(&self, key: PostKey) -> Result<ReactionCounts>;
}

/// Answers whether the bot holds posting privileges in a channel.
#[async_trait]
pub trait AdminRightsOracle: Send + Sync {
    async fn can_post(&self, channel_id: i64) -> Result<bool>;
}

/// Outbound messaging operations the core needs: copying staged media into a
/// channel and pushing an updated button layout onto an existing post.
#[async_trait]
pub trait MessagingTransport: Send + Sync {
    /// Copies `source_msg_id` from `source_chat` into `target_chat` with the
    /// given caption and layout; returns the new post's message id. A `None`
    /// caption leaves the media's own caption in place.
    async fn copy_message(
        &self,
        source_chat: i64,
        source_msg_id: i32,
        target_chat: i64,
        caption: Option<&str>,
        layout: InlineKeyboardMarkup,
    ) -> Result<i32>;

    /// Replaces the button layout attached to an existing post.
    async fn push_layout(
        &self,
        chat_id: i64,
        post_id: i32,
        layout: InlineKeyboardMarkup,
    ) -> Result<()>;

    /// Resolves a chat's title (used when registering channels).
    async fn chat_title(&self, chat_id: i64) -> Result<String>;
}
