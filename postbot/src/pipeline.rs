//! Posting pipeline: ties staged media, the permission check, caption
//! assembly, keyboard composition, the distribution call, and ledger
//! initialization into a single operation.
//!
//! Each attempt walks Staged → PermissionChecked → Composed → Distributed →
//! LedgerInitialized; any failing step stops the walk with the matching
//! error and no further state is touched. The ledger record is only created
//! after a confirmed distribution, so a failed transport call leaves no
//! orphan record behind.

use crate::keyboard;
use postbot_core::{
    AdminRightsOracle, LinkButton, MessagingTransport, PostError, PostKey, ProfileStore,
    ReactionCounts, ReactionLedger, Result,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Deployment-level caption and keyboard settings.
#[derive(Debug, Clone, Default)]
pub struct ComposerSettings {
    /// Signature appended as the caption's last block; empty/None omits it.
    pub signature: Option<String>,
    /// Static link row appended as the layout's last band.
    pub fixed_button: Option<LinkButton>,
}

/// Orchestrates one distribution attempt. All collaborators are injected;
/// the pipeline holds no process-wide state.
pub struct PostingPipeline {
    profiles: Arc<dyn ProfileStore>,
    ledger: Arc<dyn ReactionLedger>,
    oracle: Arc<dyn AdminRightsOracle>,
    transport: Arc<dyn MessagingTransport>,
    settings: ComposerSettings,
}

impl PostingPipeline {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        ledger: Arc<dyn ReactionLedger>,
        oracle: Arc<dyn AdminRightsOracle>,
        transport: Arc<dyn MessagingTransport>,
        settings: ComposerSettings,
    ) -> Self {
        Self {
            profiles,
            ledger,
            oracle,
            transport,
            settings,
        }
    }

    /// Distributes the user's staged media into the target channel. Returns
    /// the key of the new post on success.
    #[instrument(skip(self))]
    pub async fn distribute(&self, user_id: i64, channel_id: i64) -> Result<PostKey> {
        let profile = self.profiles.get_profile(user_id).await?;
        let media = profile
            .pending_media
            .clone()
            .ok_or(PostError::NotFound("staged media"))?;
        info!(
            user_id,
            channel_id,
            source_message_id = media.message_id,
            "step: pipeline staged"
        );

        if !self.oracle.can_post(channel_id).await? {
            return Err(PostError::Permission { channel_id });
        }
        info!(user_id, channel_id, "step: pipeline permission checked");

        let caption = assemble_caption(
            media.caption.as_deref(),
            profile.custom_caption.as_deref(),
            self.settings.signature.as_deref(),
        );

        // The post id is unknown before the copy; the initial band carries a
        // zero placeholder and is rewritten with the real id right after.
        let layout = keyboard::compose(
            0,
            ReactionCounts::default(),
            &profile.custom_buttons,
            self.settings.fixed_button.as_ref(),
        );
        info!(user_id, channel_id, "step: pipeline composed");

        let post_id = self
            .transport
            .copy_message(
                user_id,
                media.message_id,
                channel_id,
                caption.as_deref(),
                layout,
            )
            .await?;
        let key = PostKey::new(channel_id, post_id);
        info!(
            user_id,
            channel_id, post_id, "step: pipeline distributed"
        );

        let tagged = keyboard::compose(
            post_id,
            ReactionCounts::default(),
            &profile.custom_buttons,
            self.settings.fixed_button.as_ref(),
        );
        if let Err(e) = self.transport.push_layout(channel_id, post_id, tagged).await {
            // The post is live and the band is rewritten on the first
            // recompose; do not fail the distribution for this.
            warn!(error = %e, channel_id, post_id, "Failed to retag reaction band");
        }

        self.ledger.ensure_record(key).await?;
        info!(
            user_id,
            channel_id, post_id, "step: pipeline ledger initialized"
        );

        Ok(key)
    }
}

/// Concatenates the caption blocks in their fixed order, blank-line
/// separated, skipping absent or blank parts. `None` when nothing remains.
fn assemble_caption(
    source: Option<&str>,
    custom: Option<&str>,
    signature: Option<&str>,
) -> Option<String> {
    let parts: Vec<&str> = [source, custom, signature]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}
