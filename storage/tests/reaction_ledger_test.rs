//! Integration tests for the reaction ledger implementations.
//!
//! The same property set runs against [`storage::SqliteReactionLedger`] and
//! [`storage::InMemoryReactionLedger`]: set disjointness, same-kind
//! idempotence, kind switching, vote coexistence across voters, and key
//! isolation.

use postbot_core::{PostKey, ReactionKind, ReactionLedger};
use storage::{InMemoryReactionLedger, SqliteReactionLedger};
use tempfile::TempDir;

async fn sqlite_ledger() -> (TempDir, SqliteReactionLedger) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("reactions.db");
    let ledger = SqliteReactionLedger::new(db_path.to_str().unwrap())
        .await
        .expect("Failed to create ledger");
    (dir, ledger)
}

/// **Test: A fresh record has zero counts after ensure_record.**
///
/// **Setup:** New ledger.
/// **Action:** `ensure_record`, then `counts`.
/// **Expected:** like=0, love=0; calling ensure_record again changes nothing.
#[tokio::test]
async fn test_ensure_record_empty_sets() {
    let (_dir, ledger) = sqlite_ledger().await;
    let key = PostKey::new(-100200, 1);

    ledger.ensure_record(key).await.unwrap();
    ledger.ensure_record(key).await.unwrap();

    let counts = ledger.counts(key).await.unwrap();
    assert_eq!((counts.like, counts.love), (0, 0));
}

/// **Test: Same-kind re-vote is idempotent on membership.**
///
/// **Setup:** Voter 7 votes like.
/// **Action:** `toggle` with like twice.
/// **Expected:** Both calls report like=1, love=0.
#[tokio::test]
async fn test_toggle_same_kind_idempotent() {
    let (_dir, ledger) = sqlite_ledger().await;
    let key = PostKey::new(-100200, 1);

    let first = ledger.toggle(key, 7, ReactionKind::Like).await.unwrap();
    let second = ledger.toggle(key, 7, ReactionKind::Like).await.unwrap();

    assert_eq!((first.like, first.love), (1, 0));
    assert_eq!(first, second);
}

/// **Test: Voting the other kind moves the membership.**
///
/// **Setup:** Voter 7 votes like, then love.
/// **Action:** `toggle(like)` then `toggle(love)`.
/// **Expected:** Final counts like=0, love=1 (the sets stay disjoint).
#[tokio::test]
async fn test_toggle_switch_moves_vote() {
    let (_dir, ledger) = sqlite_ledger().await;
    let key = PostKey::new(-100200, 1);

    ledger.toggle(key, 7, ReactionKind::Like).await.unwrap();
    let counts = ledger.toggle(key, 7, ReactionKind::Love).await.unwrap();

    assert_eq!((counts.like, counts.love), (0, 1));
}

/// **Test: Votes from different voters coexist.**
///
/// **Setup:** Voter 7 switched to love; voter 8 votes like.
/// **Action:** toggles for both voters.
/// **Expected:** like=1, love=1.
#[tokio::test]
async fn test_votes_coexist_across_voters() {
    let (_dir, ledger) = sqlite_ledger().await;
    let key = PostKey::new(-100200, 1);

    ledger.toggle(key, 7, ReactionKind::Like).await.unwrap();
    ledger.toggle(key, 7, ReactionKind::Love).await.unwrap();
    let counts = ledger.toggle(key, 8, ReactionKind::Like).await.unwrap();

    assert_eq!((counts.like, counts.love), (1, 1));
}

/// **Test: Records are isolated per (channel, post) key.**
///
/// **Setup:** Votes on two different posts in the same channel.
/// **Action:** toggle on each key, read counts on both.
/// **Expected:** Each key only sees its own votes.
#[tokio::test]
async fn test_records_isolated_per_key() {
    let (_dir, ledger) = sqlite_ledger().await;
    let a = PostKey::new(-100200, 1);
    let b = PostKey::new(-100200, 2);

    ledger.toggle(a, 7, ReactionKind::Like).await.unwrap();
    ledger.toggle(b, 7, ReactionKind::Love).await.unwrap();

    let counts_a = ledger.counts(a).await.unwrap();
    let counts_b = ledger.counts(b).await.unwrap();
    assert_eq!((counts_a.like, counts_a.love), (1, 0));
    assert_eq!((counts_b.like, counts_b.love), (0, 1));
}

/// **Test: Counts on an unknown key are zero, not an error.**
#[tokio::test]
async fn test_counts_missing_record() {
    let (_dir, ledger) = sqlite_ledger().await;
    let counts = ledger.counts(PostKey::new(-1, 999)).await.unwrap();
    assert_eq!((counts.like, counts.love), (0, 0));
}

/// **Test: The in-memory ledger satisfies the same membership properties.**
///
/// **Setup:** InMemoryReactionLedger.
/// **Action:** same-kind re-vote, kind switch, second voter.
/// **Expected:** Identical counts to the SQLite ledger path.
#[tokio::test]
async fn test_in_memory_ledger_properties() {
    let ledger = InMemoryReactionLedger::new();
    let key = PostKey::new(-100200, 1);

    ledger.ensure_record(key).await.unwrap();
    assert_eq!(ledger.counts(key).await.unwrap().like, 0);

    let counts = ledger.toggle(key, 7, ReactionKind::Like).await.unwrap();
    assert_eq!((counts.like, counts.love), (1, 0));
    let counts = ledger.toggle(key, 7, ReactionKind::Like).await.unwrap();
    assert_eq!((counts.like, counts.love), (1, 0));
    let counts = ledger.toggle(key, 7, ReactionKind::Love).await.unwrap();
    assert_eq!((counts.like, counts.love), (0, 1));
    let counts = ledger.toggle(key, 8, ReactionKind::Like).await.unwrap();
    assert_eq!((counts.like, counts.love), (1, 1));
}

/// **Test: Concurrent toggles from distinct voters are all retained.**
///
/// **Setup:** 20 voters toggling like concurrently on one key.
/// **Action:** join all tasks, read counts.
/// **Expected:** like=20; no voter's membership write is lost.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_toggles_lose_no_votes() {
    let (_dir, ledger) = sqlite_ledger().await;
    let key = PostKey::new(-100200, 1);

    let mut tasks = Vec::new();
    for voter in 0..20 {
        let ledger = ledger.clone();
        tasks.push(tokio::spawn(async move {
            ledger.toggle(key, voter, ReactionKind::Like).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let counts = ledger.counts(key).await.unwrap();
    assert_eq!((counts.like, counts.love), (20, 0));
}
