// ABOUTME: Integration tests for the flat-file CSV store
// ABOUTME: Validates lazy initialization, persistence round-trips, and upsert semantics

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::NaiveDate;
use winter_arc_server::database_plugins::csv::CsvStore;
use winter_arc_server::database_plugins::{CreateUserOutcome, StoreProvider};
use winter_arc_server::models::{ActivityFlags, User};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn missing_directory_is_an_empty_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist-yet");

    let store = CsvStore::new(missing).await.unwrap();
    assert!(store.list_users().await.unwrap().is_empty());
    assert!(store.list_activities(None).await.unwrap().is_empty());
    assert!(store.list_all_weights().await.unwrap().is_empty());
}

#[tokio::test]
async fn migrate_writes_header_only_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvStore::new(dir.path()).await.unwrap();
    store.migrate().await.unwrap();

    let users = std::fs::read_to_string(dir.path().join("users.csv")).unwrap();
    assert_eq!(
        users.trim_end(),
        "username,created_at,target_weight,target_weight_date"
    );

    let activities = std::fs::read_to_string(dir.path().join("registros.csv")).unwrap();
    assert!(activities.starts_with("Usuario,Fecha,"));

    let weights = std::fs::read_to_string(dir.path().join("weight_records.csv")).unwrap();
    assert_eq!(weights.trim_end(), "username,date,weight");
}

#[tokio::test]
async fn data_survives_a_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = CsvStore::new(dir.path()).await.unwrap();
        let user = User::new("alice".into(), None, Some(70.0));
        store.create_user(&user).await.unwrap();
        store
            .upsert_activity(
                user.id,
                date(2024, 6, 1),
                ActivityFlags {
                    physical_activity: true,
                    diet_nutrition: true,
                    ..ActivityFlags::default()
                },
            )
            .await
            .unwrap();
        store
            .append_weight(user.id, date(2024, 6, 1), 81.5)
            .await
            .unwrap();
    }

    let reopened = CsvStore::new(dir.path()).await.unwrap();
    let users = reopened.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "alice");
    assert_eq!(users[0].target_weight, Some(70.0));

    let records = reopened.list_activities(None).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].date, date(2024, 6, 1));
    assert_eq!(records[0].points, 2);
    assert!(records[0].flags.physical_activity);
    assert!(!records[0].flags.rest_recovery);

    let weights = reopened.list_all_weights().await.unwrap();
    assert_eq!(weights.len(), 1);
    assert!((weights[0].weight - 81.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn upsert_replaces_the_days_row() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvStore::new(dir.path()).await.unwrap();
    let user = User::new("alice".into(), None, None);
    store.create_user(&user).await.unwrap();

    let day = date(2024, 6, 1);
    store
        .upsert_activity(
            user.id,
            day,
            ActivityFlags {
                physical_activity: true,
                ..ActivityFlags::default()
            },
        )
        .await
        .unwrap();
    store
        .upsert_activity(user.id, day, ActivityFlags::all_done())
        .await
        .unwrap();

    let records = store.list_activities(Some(user.id)).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].points, 4);

    // The file holds exactly one data row.
    let content = std::fs::read_to_string(dir.path().join("registros.csv")).unwrap();
    assert_eq!(content.lines().count(), 2);
}

#[tokio::test]
async fn duplicate_usernames_are_rejected_case_insensitively() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvStore::new(dir.path()).await.unwrap();

    let alice = User::new("Alice".into(), None, None);
    assert_eq!(
        store.create_user(&alice).await.unwrap(),
        CreateUserOutcome::Created(alice.id)
    );

    let shouty = User::new("ALICE".into(), None, None);
    assert_eq!(
        store.create_user(&shouty).await.unwrap(),
        CreateUserOutcome::AlreadyExists
    );
}

#[tokio::test]
async fn usernames_with_commas_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = CsvStore::new(dir.path()).await.unwrap();
        let user = User::new("sasuke, the avenger".into(), None, None);
        store.create_user(&user).await.unwrap();
        store
            .upsert_activity(user.id, date(2024, 6, 3), ActivityFlags::all_done())
            .await
            .unwrap();
    }

    let reopened = CsvStore::new(dir.path()).await.unwrap();
    let users = reopened.list_users().await.unwrap();
    assert_eq!(users[0].username, "sasuke, the avenger");

    let records = reopened.list_activities(None).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_id, users[0].id);
}

#[tokio::test]
async fn activity_rows_for_unlisted_users_get_implicit_accounts() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path()).unwrap();
    std::fs::write(
        dir.path().join("registros.csv"),
        "Usuario,Fecha,Actividad Fisica,Dieta y Nutricion,Descanso o Recuperacion,Desarrollo Personal,Puntos\n\
         naruto,2024-06-01,True,False,True,False,2\n",
    )
    .unwrap();

    let store = CsvStore::new(dir.path()).await.unwrap();
    let users = store.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "naruto");

    let records = store.list_activities(None).await.unwrap();
    assert_eq!(records.len(), 1);
    // Pandas-style True/False spellings parse, and points come from flags.
    assert!(records[0].flags.physical_activity);
    assert!(records[0].flags.rest_recovery);
    assert_eq!(records[0].points, 2);
}

#[tokio::test]
async fn weights_are_appended_not_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvStore::new(dir.path()).await.unwrap();
    let user = User::new("alice".into(), None, None);
    store.create_user(&user).await.unwrap();

    store
        .append_weight(user.id, date(2024, 6, 1), 81.0)
        .await
        .unwrap();
    store
        .append_weight(user.id, date(2024, 6, 1), 80.5)
        .await
        .unwrap();

    let series = store.list_weights(user.id).await.unwrap();
    assert_eq!(series.len(), 2);
}
