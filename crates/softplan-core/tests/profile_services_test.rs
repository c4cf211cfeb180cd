//! Integration tests for moods, friends and presence.
//!
//! Friends and moods run against on-disk storage in a temporary directory;
//! presence uses memory storage and a movable clock.

use std::sync::Arc;

use chrono::Duration;

use softplan_core::friends::{FriendError, FriendFilter, FriendStore};
use softplan_core::mood::{MoodError, MoodLibrary};
use softplan_core::presence::{Presence, PresenceService};
use softplan_db::clock::Clock;
use softplan_db::models::{FriendStatus, FriendTier, MoodTag, PresenceKind, PresetMood};
use softplan_db::storage::{Collection, Storage};
use softplan_test_utils::{fixed_clock, memory_storage, temp_file_storage};

// ---------------------------------------------------------------------------
// Moods
// ---------------------------------------------------------------------------

#[tokio::test]
async fn custom_moods_follow_presets() {
    let (storage, _dir) = temp_file_storage().await;
    let library = MoodLibrary::new(Arc::new(storage));

    assert_eq!(library.list().await.unwrap().len(), PresetMood::ALL.len());

    let tag = library.add_custom("  board games ").await.unwrap();
    assert_eq!(tag, MoodTag::custom("board games"));

    let all = library.list().await.unwrap();
    assert_eq!(all.len(), PresetMood::ALL.len() + 1);
    assert_eq!(all.last(), Some(&MoodTag::custom("board games")));
}

#[tokio::test]
async fn custom_moods_are_deduplicated() {
    let (storage, _dir) = temp_file_storage().await;
    let library = MoodLibrary::new(Arc::new(storage));

    library.add_custom("karaoke").await.unwrap();
    library.add_custom("Karaoke").await.unwrap();
    assert_eq!(
        library.add_custom("chill").await.unwrap(),
        MoodTag::preset(PresetMood::Chill)
    );
    assert_eq!(library.custom().await.unwrap(), ["karaoke"]);
}

#[tokio::test]
async fn custom_mood_edge_cases() {
    let (storage, _dir) = temp_file_storage().await;
    let library = MoodLibrary::new(Arc::new(storage));

    assert!(matches!(
        library.add_custom("   ").await.unwrap_err(),
        MoodError::EmptyLabel
    ));
    assert!(matches!(
        library.remove_custom("nope").await.unwrap_err(),
        MoodError::NotFound(_)
    ));

    library.add_custom("sunrise").await.unwrap();
    library.remove_custom("sunrise").await.unwrap();
    assert!(library.custom().await.unwrap().is_empty());
}

#[tokio::test]
async fn mood_names_ignore_case() {
    let (storage, _dir) = temp_file_storage().await;
    let library = MoodLibrary::new(Arc::new(storage));

    assert_eq!(
        library.add_custom("Chill").await.unwrap(),
        MoodTag::preset(PresetMood::Chill)
    );
    assert!(library.custom().await.unwrap().is_empty());

    library.add_custom("Karaoke").await.unwrap();
    library.remove_custom("karaoke").await.unwrap();
    assert!(library.custom().await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Friends
// ---------------------------------------------------------------------------

#[tokio::test]
async fn added_friend_starts_offline() {
    let (storage, _dir) = temp_file_storage().await;
    let friends = FriendStore::new(Arc::new(storage));

    let friend = friends.add("Sam Park", FriendTier::Acquaintance).await.unwrap();
    assert_eq!(friend.status, FriendStatus::Offline);
    assert!(!friend.is_nearby);
    assert_eq!(friend.last_active, "Just added");

    let all = friends.list().await.unwrap();
    assert_eq!(all.len(), 8);
    assert_eq!(all.last().unwrap().id, friend.id);
}

#[tokio::test]
async fn grouped_keeps_tier_order_and_filters() {
    let (storage, _dir) = temp_file_storage().await;
    let friends = FriendStore::new(Arc::new(storage));

    let groups = friends.grouped(&FriendFilter::default()).await.unwrap();
    let tiers: Vec<_> = groups.iter().map(|(tier, _)| *tier).collect();
    assert_eq!(tiers, FriendTier::ALL);
    assert_eq!(groups[0].1.len(), 3);

    let nearby = friends
        .grouped(&FriendFilter {
            query: String::new(),
            nearby_only: true,
        })
        .await
        .unwrap();
    let count: usize = nearby.iter().map(|(_, members)| members.len()).sum();
    assert_eq!(count, 4);

    let search = friends
        .grouped(&FriendFilter {
            query: "RIV".into(),
            nearby_only: false,
        })
        .await
        .unwrap();
    assert!(search[0].1.is_empty());
    assert_eq!(search[2].1[0].name, "Morgan Rivera");
}

#[tokio::test]
async fn tier_rename_and_remove() {
    let (storage, _dir) = temp_file_storage().await;
    let friends = FriendStore::new(Arc::new(storage));

    let moved = friends.set_tier("4", FriendTier::Close).await.unwrap();
    assert_eq!(moved.tier, FriendTier::Close);

    let renamed = friends.rename("4", "Jordan L.").await.unwrap();
    assert_eq!(renamed.name, "Jordan L.");
    assert_eq!(renamed.tier, FriendTier::Close);

    friends.remove("4").await.unwrap();
    assert!(matches!(
        friends.remove("4").await.unwrap_err(),
        FriendError::NotFound(_)
    ));
    assert!(matches!(
        friends.set_tier("4", FriendTier::Close).await.unwrap_err(),
        FriendError::NotFound(_)
    ));
    assert!(matches!(
        friends.add("  ", FriendTier::Close).await.unwrap_err(),
        FriendError::EmptyName
    ));
}

// ---------------------------------------------------------------------------
// Presence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn presence_defaults_to_available() {
    let presence = PresenceService::new(memory_storage(), fixed_clock());
    assert_eq!(presence.current().await.unwrap(), Presence::default());
    assert!(presence.watch().await.unwrap().is_none());
}

#[tokio::test]
async fn presence_lasts_eight_hours_then_clears() {
    let storage = memory_storage();
    let clock = fixed_clock();
    let presence = PresenceService::new(storage.clone(), clock.clone());

    let set = presence.set(PresenceKind::Quiet).await.unwrap();
    assert_eq!(set.expires_at, Some(clock.now() + Duration::hours(8)));

    clock.advance(Duration::hours(8) - Duration::seconds(1));
    assert_eq!(presence.current().await.unwrap().kind, PresenceKind::Quiet);

    clock.advance(Duration::seconds(1));
    assert_eq!(presence.current().await.unwrap(), Presence::default());
    assert!(storage.load(Collection::UserStatus).await.unwrap().is_none());
    assert!(storage.load(Collection::StatusExpiry).await.unwrap().is_none());
}

#[tokio::test]
async fn presence_reset_and_quiet_mode() {
    let presence = PresenceService::new(memory_storage(), fixed_clock());

    presence.set(PresenceKind::Open).await.unwrap();
    presence.reset().await.unwrap();
    assert_eq!(presence.current().await.unwrap().kind, PresenceKind::Available);

    assert!(!presence.quiet_mode().await.unwrap());
    assert!(presence.toggle_quiet_mode().await.unwrap());
    assert!(presence.quiet_mode().await.unwrap());
    assert!(!presence.toggle_quiet_mode().await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn presence_watch_fires_at_lapse() {
    let presence = PresenceService::new(memory_storage(), fixed_clock());

    presence.set(PresenceKind::Open).await.unwrap();
    let timer = presence.watch().await.unwrap().unwrap();
    assert!(!timer.is_expired());
    assert!(timer.expired().await);
}
