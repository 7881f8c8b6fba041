// ABOUTME: Integration tests for the SQLite store
// ABOUTME: Validates user management, activity upserts, and weight entries

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use anyhow::Result;
use chrono::NaiveDate;
use winter_arc_server::database::{CreateUserOutcome, Database};
use winter_arc_server::models::{ActivityFlags, User};

/// Create a test database instance
///
/// Each connection gets its own isolated in-memory instance.
async fn create_test_db() -> Result<Database> {
    Database::new("sqlite::memory:").await
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn create_and_fetch_user() {
    let db = create_test_db().await.unwrap();
    let user = User::new("Alice".into(), Some("hash".into()), Some(70.5));

    let outcome = db.create_user(&user).await.unwrap();
    assert_eq!(outcome, CreateUserOutcome::Created(user.id));

    let fetched = db.get_user(user.id).await.unwrap().unwrap();
    assert_eq!(fetched.username, "Alice");
    assert_eq!(fetched.password_hash.as_deref(), Some("hash"));
    assert_eq!(fetched.target_weight, Some(70.5));
    assert!(fetched.target_weight_date.is_some());

    assert_eq!(db.user_count().await.unwrap(), 1);
}

#[tokio::test]
async fn usernames_are_unique_case_insensitively() {
    let db = create_test_db().await.unwrap();
    let alice = User::new("Alice".into(), None, None);
    db.create_user(&alice).await.unwrap();

    let shouty = User::new("ALICE".into(), None, None);
    let outcome = db.create_user(&shouty).await.unwrap();
    assert_eq!(outcome, CreateUserOutcome::AlreadyExists);

    // Lookup is also case-insensitive and returns the stored spelling.
    let fetched = db.get_user_by_username("alice").await.unwrap().unwrap();
    assert_eq!(fetched.username, "Alice");
    assert_eq!(db.user_count().await.unwrap(), 1);
}

#[tokio::test]
async fn upsert_replaces_rather_than_duplicates() {
    let db = create_test_db().await.unwrap();
    let user = User::new("alice".into(), None, None);
    db.create_user(&user).await.unwrap();

    let day = date(2024, 6, 1);
    let first = ActivityFlags {
        physical_activity: true,
        diet_nutrition: true,
        ..ActivityFlags::default()
    };
    let record = db.upsert_activity(user.id, day, first).await.unwrap();
    assert_eq!(record.points, 2);

    // Same submission again: still exactly one record, unchanged.
    db.upsert_activity(user.id, day, first).await.unwrap();
    let records = db.list_activities(Some(user.id)).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].points, 2);

    // New flags for the same day replace the old log.
    let replaced = db
        .upsert_activity(user.id, day, ActivityFlags::all_done())
        .await
        .unwrap();
    assert_eq!(replaced.points, 4);

    let records = db.list_activities(Some(user.id)).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].flags, ActivityFlags::all_done());
    assert_eq!(records[0].points, 4);
}

#[tokio::test]
async fn points_are_recomputed_from_flags() {
    let db = create_test_db().await.unwrap();
    let user = User::new("alice".into(), None, None);
    db.create_user(&user).await.unwrap();

    let record = db
        .upsert_activity(
            user.id,
            date(2024, 6, 2),
            ActivityFlags {
                rest_recovery: true,
                ..ActivityFlags::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(record.points, 1);

    let stored = db
        .get_activity(user.id, date(2024, 6, 2))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.points, 1);
    assert!(stored.flags.rest_recovery);
}

#[tokio::test]
async fn recent_history_is_latest_first_and_capped() {
    let db = create_test_db().await.unwrap();
    let user = User::new("alice".into(), None, None);
    db.create_user(&user).await.unwrap();

    for day in 1..=10 {
        db.upsert_activity(user.id, date(2024, 6, day), ActivityFlags::all_done())
            .await
            .unwrap();
    }

    let recent = db.list_recent_activities(user.id, 7).await.unwrap();
    assert_eq!(recent.len(), 7);
    assert_eq!(recent[0].date, date(2024, 6, 10));
    assert_eq!(recent[6].date, date(2024, 6, 4));
}

#[tokio::test]
async fn weights_append_and_order_by_date() {
    let db = create_test_db().await.unwrap();
    let user = User::new("alice".into(), None, None);
    db.create_user(&user).await.unwrap();

    db.append_weight(user.id, date(2024, 6, 10), 79.0)
        .await
        .unwrap();
    db.append_weight(user.id, date(2024, 6, 1), 81.5)
        .await
        .unwrap();

    let series = db.list_weights(user.id).await.unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].date, date(2024, 6, 1));
    assert_eq!(series[1].date, date(2024, 6, 10));
}

#[tokio::test]
async fn non_positive_weights_are_rejected_before_write() {
    let db = create_test_db().await.unwrap();
    let user = User::new("alice".into(), None, None);
    db.create_user(&user).await.unwrap();

    assert!(db.append_weight(user.id, date(2024, 6, 1), 0.0).await.is_err());
    assert!(db
        .append_weight(user.id, date(2024, 6, 1), -4.2)
        .await
        .is_err());
    assert!(db.list_weights(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn target_weight_updates_only_existing_users() {
    let db = create_test_db().await.unwrap();
    let user = User::new("alice".into(), None, None);
    db.create_user(&user).await.unwrap();

    assert!(db.update_target_weight("ALICE", 68.0).await.unwrap());
    let fetched = db.get_user(user.id).await.unwrap().unwrap();
    assert_eq!(fetched.target_weight, Some(68.0));

    assert!(!db.update_target_weight("nobody", 68.0).await.unwrap());
}

#[tokio::test]
async fn empty_store_lists_nothing() {
    let db = create_test_db().await.unwrap();
    assert!(db.list_users().await.unwrap().is_empty());
    assert!(db.list_activities(None).await.unwrap().is_empty());
    assert!(db.list_all_weights().await.unwrap().is_empty());
}
