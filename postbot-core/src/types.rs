//! Core types: user profile, staged media, reaction kinds and counts.

use serde::{Deserialize, Serialize};

/// Hard cap on custom buttons per profile.
pub const MAX_CUSTOM_BUTTONS: usize = 10;

/// A destination channel saved in a user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRef {
    pub id: i64,
    pub title: String,
}

/// A custom link button attached below distributed posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkButton {
    pub text: String,
    pub url: String,
}

/// The user's staged media: the message id of the upload in the user's
/// private chat, plus the caption it carried when staged (the Bot API cannot
/// read a message back later). At most one per user; a new upload overwrites
/// the previous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedMedia {
    pub message_id: i32,
    pub caption: Option<String>,
}

/// Per-user profile record. Created on first interaction, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    /// Registered destination channels, insertion order, ids unique.
    pub channels: Vec<ChannelRef>,
    pub custom_caption: Option<String>,
    /// Ordered custom link buttons, at most [`MAX_CUSTOM_BUTTONS`].
    pub custom_buttons: Vec<LinkButton>,
    pub pending_media: Option<StagedMedia>,
}

impl UserProfile {
    /// An empty profile for a user that has not stored anything yet.
    pub fn empty(user_id: i64) -> Self {
        Self {
            user_id,
            channels: Vec::new(),
            custom_caption: None,
            custom_buttons: Vec::new(),
            pending_media: None,
        }
    }
}

/// Key of a reaction record: a distributed post in a destination channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostKey {
    pub channel_id: i64,
    pub post_id: i32,
}

impl PostKey {
    pub fn new(channel_id: i64, post_id: i32) -> Self {
        Self {
            channel_id,
            post_id,
        }
    }
}

/// The two reaction kinds a viewer can express. A voter holds at most one at
/// a time; switching kinds moves the vote, re-voting the same kind is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactionKind {
    Like,
    Love,
}

impl ReactionKind {
    /// Wire name used in action tokens and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Love => "love",
        }
    }

    /// Button icon shown in the reaction band.
    pub fn icon(&self) -> &'static str {
        match self {
            ReactionKind::Like => "👍",
            ReactionKind::Love => "❤️",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "like" => Some(ReactionKind::Like),
            "love" => Some(ReactionKind::Love),
            _ => None,
        }
    }

    pub fn other(&self) -> Self {
        match self {
            ReactionKind::Like => ReactionKind::Love,
            ReactionKind::Love => ReactionKind::Like,
        }
    }
}

/// Current vote totals for one post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactionCounts {
    pub like: i64,
    pub love: i64,
}

impl ReactionCounts {
    pub fn get(&self, kind: ReactionKind) -> i64 {
        match kind {
            ReactionKind::Like => self.like,
            ReactionKind::Love => self.love,
        }
    }
}
