// ABOUTME: Store factory selecting the persistence backend from the configured URL
// ABOUTME: Wraps SQLite and flat-file CSV stores behind one delegating enum

//! Store factory
//!
//! This module provides automatic backend detection and creation based on
//! the configured store URL: `sqlite:` selects the relational backend,
//! `csv:` (or a bare directory path) selects the flat-file backend.
//! PostgreSQL URLs are recognized so they can be rejected with a useful
//! message rather than a parse error.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use super::csv::CsvStore;
use super::sqlite::SqliteStore;
use super::{CreateUserOutcome, StoreProvider};
use crate::config::environment::StoreUrl;
use crate::models::{ActivityFlags, ActivityRecord, User, WeightEntry};

/// Store instance wrapper that delegates to the selected backend
#[derive(Clone, Debug)]
pub enum Store {
    /// Relational SQLite backend
    Sqlite(SqliteStore),
    /// Flat-file CSV directory backend
    FlatFile(CsvStore),
}

impl Store {
    /// Create a store from the configured URL
    ///
    /// # Errors
    ///
    /// Returns an error if the URL names an unsupported backend or the
    /// backend fails to initialize.
    pub async fn new(url: &StoreUrl) -> Result<Self> {
        debug!("Detecting store backend from URL: {}", url.to_connection_string());

        match url {
            StoreUrl::Sqlite { .. } | StoreUrl::Memory => {
                info!("Initializing SQLite store");
                let store = SqliteStore::new(&url.to_connection_string()).await?;
                info!("SQLite store initialized successfully");
                Ok(Self::Sqlite(store))
            }
            StoreUrl::FlatFile { dir } => {
                info!("Initializing flat-file store at {}", dir.display());
                let store = CsvStore::new(dir.clone()).await?;
                info!("Flat-file store initialized successfully");
                Ok(Self::FlatFile(store))
            }
            StoreUrl::Postgres { .. } => Err(anyhow!(
                "PostgreSQL is not supported by this build; use a sqlite: or csv: store URL"
            )),
        }
    }

    /// Get a descriptive string for the current store backend
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "SQLite (relational)",
            Self::FlatFile(_) => "CSV flat files",
        }
    }
}

#[async_trait]
impl StoreProvider for Store {
    async fn migrate(&self) -> Result<()> {
        match self {
            Self::Sqlite(store) => store.migrate().await,
            Self::FlatFile(store) => store.migrate().await,
        }
    }

    async fn create_user(&self, user: &User) -> Result<CreateUserOutcome> {
        match self {
            Self::Sqlite(store) => store.create_user(user).await,
            Self::FlatFile(store) => store.create_user(user).await,
        }
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        match self {
            Self::Sqlite(store) => store.get_user(user_id).await,
            Self::FlatFile(store) => store.get_user(user_id).await,
        }
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        match self {
            Self::Sqlite(store) => store.get_user_by_username(username).await,
            Self::FlatFile(store) => store.get_user_by_username(username).await,
        }
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        match self {
            Self::Sqlite(store) => store.list_users().await,
            Self::FlatFile(store) => store.list_users().await,
        }
    }

    async fn user_count(&self) -> Result<i64> {
        match self {
            Self::Sqlite(store) => store.user_count().await,
            Self::FlatFile(store) => store.user_count().await,
        }
    }

    async fn update_target_weight(&self, username: &str, target_weight: f64) -> Result<bool> {
        match self {
            Self::Sqlite(store) => store.update_target_weight(username, target_weight).await,
            Self::FlatFile(store) => store.update_target_weight(username, target_weight).await,
        }
    }

    async fn upsert_activity(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        flags: ActivityFlags,
    ) -> Result<ActivityRecord> {
        match self {
            Self::Sqlite(store) => store.upsert_activity(user_id, date, flags).await,
            Self::FlatFile(store) => store.upsert_activity(user_id, date, flags).await,
        }
    }

    async fn get_activity(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<ActivityRecord>> {
        match self {
            Self::Sqlite(store) => store.get_activity(user_id, date).await,
            Self::FlatFile(store) => store.get_activity(user_id, date).await,
        }
    }

    async fn list_activities(&self, user_id: Option<Uuid>) -> Result<Vec<ActivityRecord>> {
        match self {
            Self::Sqlite(store) => store.list_activities(user_id).await,
            Self::FlatFile(store) => store.list_activities(user_id).await,
        }
    }

    async fn list_recent_activities(
        &self,
        user_id: Uuid,
        limit: u32,
    ) -> Result<Vec<ActivityRecord>> {
        match self {
            Self::Sqlite(store) => store.list_recent_activities(user_id, limit).await,
            Self::FlatFile(store) => store.list_recent_activities(user_id, limit).await,
        }
    }

    async fn append_weight(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        weight: f64,
    ) -> Result<WeightEntry> {
        match self {
            Self::Sqlite(store) => store.append_weight(user_id, date, weight).await,
            Self::FlatFile(store) => store.append_weight(user_id, date, weight).await,
        }
    }

    async fn list_weights(&self, user_id: Uuid) -> Result<Vec<WeightEntry>> {
        match self {
            Self::Sqlite(store) => store.list_weights(user_id).await,
            Self::FlatFile(store) => store.list_weights(user_id).await,
        }
    }

    async fn list_all_weights(&self) -> Result<Vec<WeightEntry>> {
        match self {
            Self::Sqlite(store) => store.list_all_weights().await,
            Self::FlatFile(store) => store.list_all_weights().await,
        }
    }
}
