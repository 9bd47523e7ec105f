//! Integration tests for [`storage::ProfileRepository`].
//!
//! Covers first-access profile creation, channel registration, the custom
//! button cap, button removal by position, and the single staging slot.

use postbot_core::{ProfileStore, StagedMedia, MAX_CUSTOM_BUTTONS};
use storage::{ProfileRepository, StorageError};
use tempfile::TempDir;

async fn test_repo() -> (TempDir, ProfileRepository) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("profiles.db");
    let repo = ProfileRepository::new(db_path.to_str().unwrap())
        .await
        .expect("Failed to create repository");
    (dir, repo)
}

/// **Test: First profile access creates an empty record.**
///
/// **Setup:** Fresh database.
/// **Action:** `load_profile(1)`.
/// **Expected:** Empty channels/buttons, no caption, no pending media.
#[tokio::test]
async fn test_profile_created_on_first_access() {
    let (_dir, repo) = test_repo().await;

    let profile = repo.load_profile(1).await.expect("Failed to load profile");

    assert_eq!(profile.user_id, 1);
    assert!(profile.channels.is_empty());
    assert!(profile.custom_buttons.is_empty());
    assert!(profile.custom_caption.is_none());
    assert!(profile.pending_media.is_none());
}

/// **Test: Channel add is duplicate-safe and order-preserving.**
///
/// **Setup:** Add two channels, then re-add the first.
/// **Action:** `add_channel` three times, `load_profile`.
/// **Expected:** Second add of the same id returns false; list keeps
/// insertion order with two entries.
#[tokio::test]
async fn test_add_channel_rejects_duplicates() {
    let (_dir, repo) = test_repo().await;

    assert!(repo.add_channel(1, -100200, "News").await.unwrap());
    assert!(repo.add_channel(1, -100300, "Movies").await.unwrap());
    assert!(!repo.add_channel(1, -100200, "News again").await.unwrap());

    let profile = repo.load_profile(1).await.unwrap();
    assert_eq!(profile.channels.len(), 2);
    assert_eq!(profile.channels[0].id, -100200);
    assert_eq!(profile.channels[0].title, "News");
    assert_eq!(profile.channels[1].id, -100300);
}

/// **Test: Removing a channel deletes exactly that channel.**
///
/// **Setup:** Two saved channels.
/// **Action:** `remove_channel` for one of them, then for an unknown id.
/// **Expected:** First returns true and the other channel survives; unknown
/// id returns false.
#[tokio::test]
async fn test_remove_channel() {
    let (_dir, repo) = test_repo().await;

    repo.add_channel(1, -100200, "News").await.unwrap();
    repo.add_channel(1, -100300, "Movies").await.unwrap();

    assert!(repo.remove_channel(1, -100200).await.unwrap());
    assert!(!repo.remove_channel(1, -999).await.unwrap());

    let profile = repo.load_profile(1).await.unwrap();
    assert_eq!(profile.channels.len(), 1);
    assert_eq!(profile.channels[0].id, -100300);
}

/// **Test: Caption set, overwrite, and clear.**
///
/// **Setup:** Fresh profile.
/// **Action:** `set_caption` twice, then `clear_caption`.
/// **Expected:** Profile reflects the latest value, then None.
#[tokio::test]
async fn test_caption_crud() {
    let (_dir, repo) = test_repo().await;

    repo.set_caption(1, "first").await.unwrap();
    repo.set_caption(1, "second").await.unwrap();
    assert_eq!(
        repo.load_profile(1).await.unwrap().custom_caption.as_deref(),
        Some("second")
    );

    repo.clear_caption(1).await.unwrap();
    assert!(repo.load_profile(1).await.unwrap().custom_caption.is_none());
}

/// **Test: Button cap is enforced at the insert.**
///
/// **Setup:** Add the maximum number of buttons.
/// **Action:** Add one more.
/// **Expected:** `LimitExceeded`; the list still holds exactly the cap.
#[tokio::test]
async fn test_button_cap() {
    let (_dir, repo) = test_repo().await;

    for i in 0..MAX_CUSTOM_BUTTONS {
        repo.add_button(1, &format!("b{}", i), "https://example.com")
            .await
            .expect("Failed to add button under cap");
    }

    let over = repo.add_button(1, "overflow", "https://example.com").await;
    assert!(matches!(over, Err(StorageError::LimitExceeded(_))));

    let profile = repo.load_profile(1).await.unwrap();
    assert_eq!(profile.custom_buttons.len(), MAX_CUSTOM_BUTTONS);
}

/// **Test: Removing a button by position compacts the remaining positions.**
///
/// **Setup:** Three buttons a, b, c.
/// **Action:** `remove_button(1, 1)` (the middle one), then remove position 1
/// again.
/// **Expected:** First removal returns b; second returns c (compacted); the
/// final list is [a].
#[tokio::test]
async fn test_remove_button_by_position() {
    let (_dir, repo) = test_repo().await;

    repo.add_button(1, "a", "https://a.example").await.unwrap();
    repo.add_button(1, "b", "https://b.example").await.unwrap();
    repo.add_button(1, "c", "https://c.example").await.unwrap();

    let removed = repo.remove_button(1, 1).await.unwrap().unwrap();
    assert_eq!(removed.text, "b");

    let removed = repo.remove_button(1, 1).await.unwrap().unwrap();
    assert_eq!(removed.text, "c");

    assert!(repo.remove_button(1, 5).await.unwrap().is_none());

    let profile = repo.load_profile(1).await.unwrap();
    assert_eq!(profile.custom_buttons.len(), 1);
    assert_eq!(profile.custom_buttons[0].text, "a");
}

/// **Test: The staging slot holds at most one reference; a new upload
/// overwrites the previous one.**
///
/// **Setup:** Stage message 10, then message 20, through the ProfileStore
/// port.
/// **Action:** `set_pending_media` twice, `get_profile`.
/// **Expected:** Profile holds message 20 only.
#[tokio::test]
async fn test_pending_media_last_write_wins() {
    let (_dir, repo) = test_repo().await;

    repo.set_pending_media(
        1,
        StagedMedia {
            message_id: 10,
            caption: Some("old".to_string()),
        },
    )
    .await
    .unwrap();
    repo.set_pending_media(
        1,
        StagedMedia {
            message_id: 20,
            caption: None,
        },
    )
    .await
    .unwrap();

    let profile = repo.get_profile(1).await.unwrap();
    assert_eq!(
        profile.pending_media,
        Some(StagedMedia {
            message_id: 20,
            caption: None,
        })
    );
}

/// **Test: Profiles are isolated per user.**
///
/// **Setup:** Buttons and channels for user 1.
/// **Action:** `load_profile(2)`.
/// **Expected:** User 2's profile is empty.
#[tokio::test]
async fn test_profiles_isolated_per_user() {
    let (_dir, repo) = test_repo().await;

    repo.add_channel(1, -100200, "News").await.unwrap();
    repo.add_button(1, "a", "https://a.example").await.unwrap();

    let profile = repo.load_profile(2).await.unwrap();
    assert!(profile.channels.is_empty());
    assert!(profile.custom_buttons.is_empty());
}
