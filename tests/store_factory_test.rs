// ABOUTME: Tests for store backend selection and trait delegation
// ABOUTME: Runs the same end-to-end scoring scenario through both backends

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::NaiveDate;
use winter_arc_server::config::environment::StoreUrl;
use winter_arc_server::database_plugins::factory::Store;
use winter_arc_server::database_plugins::StoreProvider;
use winter_arc_server::models::{ActivityFlags, User};
use winter_arc_server::rank::Rank;
use winter_arc_server::reports::{leaderboard, TimeBucket};
use winter_arc_server::scoring::ActivityWeights;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn url_detection_selects_the_backend() {
    let sqlite = Store::new(&StoreUrl::Memory).await.unwrap();
    assert_eq!(sqlite.backend_info(), "SQLite (relational)");

    let dir = tempfile::tempdir().unwrap();
    let flat = Store::new(&StoreUrl::FlatFile {
        dir: dir.path().to_path_buf(),
    })
    .await
    .unwrap();
    assert_eq!(flat.backend_info(), "CSV flat files");
}

#[tokio::test]
async fn postgres_urls_are_rejected_with_guidance() {
    let error = Store::new(&StoreUrl::Postgres {
        connection_string: "postgresql://winter:arc@db/tracker".into(),
    })
    .await
    .unwrap_err();
    assert!(error.to_string().contains("sqlite"));
}

async fn run_june_scenario(store: &Store) {
    let alice = User::new("alice".into(), None, None);
    store.create_user(&alice).await.unwrap();

    let record = store
        .upsert_activity(
            alice.id,
            date(2024, 6, 1),
            ActivityFlags {
                physical_activity: true,
                diet_nutrition: true,
                ..ActivityFlags::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(record.points, 2);

    let record = store
        .upsert_activity(alice.id, date(2024, 6, 2), ActivityFlags::all_done())
        .await
        .unwrap();
    assert_eq!(record.points, 4);

    let records = store.list_activities(None).await.unwrap();
    let users = store.list_users().await.unwrap();
    let entries = leaderboard(
        &records,
        &users,
        TimeBucket::Month {
            year: 2024,
            month: 6,
        },
        ActivityWeights::default(),
    );

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].points, 6);
    assert_eq!(entries[0].rank, Rank::Estudiante);
    assert_eq!(entries[0].rank.label(), "Estudiante de la Academia");
}

#[tokio::test]
async fn june_scenario_on_sqlite() {
    let store = Store::new(&StoreUrl::Memory).await.unwrap();
    run_june_scenario(&store).await;
}

#[tokio::test]
async fn june_scenario_on_flat_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::new(&StoreUrl::FlatFile {
        dir: dir.path().to_path_buf(),
    })
    .await
    .unwrap();
    run_june_scenario(&store).await;
}
