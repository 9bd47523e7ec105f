//! In-memory implementation of the ReactionLedger trait.
//!
//! For development and tests. The whole remove-then-add of a toggle runs
//! inside one write guard, so concurrent voters on the same key cannot lose
//! each other's membership.

use async_trait::async_trait;
use postbot_core::{PostKey, ReactionCounts, ReactionKind, ReactionLedger};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct RecordSets {
    like: HashSet<i64>,
    love: HashSet<i64>,
}

impl RecordSets {
    fn set_mut(&mut self, kind: ReactionKind) -> &mut HashSet<i64> {
        match kind {
            ReactionKind::Like => &mut self.like,
            ReactionKind::Love => &mut self.love,
        }
    }

    fn counts(&self) -> ReactionCounts {
        ReactionCounts {
            like: self.like.len() as i64,
            love: self.love.len() as i64,
        }
    }
}

type RecordMap = HashMap<PostKey, RecordSets>;

/// In-memory reaction ledger keyed by (channel, post).
#[derive(Debug, Clone, Default)]
pub struct InMemoryReactionLedger {
    records: Arc<RwLock<RecordMap>>,
}

impl InMemoryReactionLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReactionLedger for InMemoryReactionLedger {
    async fn ensure_record(&self, key: PostKey) -> postbot_core::Result<()> {
        let mut records = self.records.write().await;
        records.entry(key).or_default();
        Ok(())
    }

    async fn toggle(
        &self,
        key: PostKey,
        voter_id: i64,
        kind: ReactionKind,
    ) -> postbot_core::Result<ReactionCounts> {
        let mut records = self.records.write().await;
        let record = records.entry(key).or_default();
        record.set_mut(kind.other()).remove(&voter_id);
        record.set_mut(kind).insert(voter_id);
        Ok(record.counts())
    }

    async fn counts(&self, key: PostKey) -> postbot_core::Result<ReactionCounts> {
        let records = self.records.read().await;
        Ok(records.get(&key).map(RecordSets::counts).unwrap_or_default())
    }
}
