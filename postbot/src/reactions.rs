//! Reaction service: applies a viewer's vote to the ledger and renders the
//! new counts back into the post's button layout.
//!
//! The layout push is last-write-wins: two voters recomposing concurrently
//! may overwrite each other's push, but both votes are already in the ledger
//! and the next recompose converges to the true counts.

use crate::keyboard;
use postbot_core::{MessagingTransport, PostKey, ReactionCounts, ReactionKind, ReactionLedger, Result};
use std::sync::Arc;
use teloxide::types::InlineKeyboardMarkup;
use tracing::{info, instrument};

pub struct ReactionService {
    ledger: Arc<dyn ReactionLedger>,
    transport: Arc<dyn MessagingTransport>,
}

impl ReactionService {
    pub fn new(ledger: Arc<dyn ReactionLedger>, transport: Arc<dyn MessagingTransport>) -> Self {
        Self { ledger, transport }
    }

    /// Toggles the voter's reaction, recomposes the reaction band from the
    /// post's live layout, and pushes the result back onto the post.
    #[instrument(skip(self, current_layout))]
    pub async fn react(
        &self,
        key: PostKey,
        voter_id: i64,
        kind: ReactionKind,
        current_layout: Option<&InlineKeyboardMarkup>,
    ) -> Result<ReactionCounts> {
        let counts = self.ledger.toggle(key, voter_id, kind).await?;

        let layout = match current_layout {
            Some(existing) => keyboard::recompose_reaction_band(existing, key.post_id, counts),
            None => keyboard::compose(key.post_id, counts, &[], None),
        };
        self.transport
            .push_layout(key.channel_id, key.post_id, layout)
            .await?;

        info!(
            channel_id = key.channel_id,
            post_id = key.post_id,
            voter_id,
            kind = kind.as_str(),
            like = counts.like,
            love = counts.love,
            "step: reaction rendered"
        );
        Ok(counts)
    }
}
