// ABOUTME: SQLite store plugin wrapping the sqlx-backed Database
// ABOUTME: Implements the StoreProvider trait by delegation

//! SQLite store implementation
//!
//! Wraps [`crate::database::Database`] to implement the `StoreProvider`
//! trait.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::{CreateUserOutcome, StoreProvider};
use crate::database::Database;
use crate::models::{ActivityFlags, ActivityRecord, User, WeightEntry};

/// SQLite store implementation
#[derive(Clone, Debug)]
pub struct SqliteStore {
    inner: Database,
}

impl SqliteStore {
    /// Open (and create if missing) the database behind `database_url`
    pub async fn new(database_url: &str) -> Result<Self> {
        let inner = Database::new(database_url).await?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl StoreProvider for SqliteStore {
    async fn migrate(&self) -> Result<()> {
        self.inner.migrate().await
    }

    async fn create_user(&self, user: &User) -> Result<CreateUserOutcome> {
        self.inner.create_user(user).await
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        self.inner.get_user(user_id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.inner.get_user_by_username(username).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.inner.list_users().await
    }

    async fn user_count(&self) -> Result<i64> {
        self.inner.user_count().await
    }

    async fn update_target_weight(&self, username: &str, target_weight: f64) -> Result<bool> {
        self.inner.update_target_weight(username, target_weight).await
    }

    async fn upsert_activity(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        flags: ActivityFlags,
    ) -> Result<ActivityRecord> {
        self.inner.upsert_activity(user_id, date, flags).await
    }

    async fn get_activity(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<ActivityRecord>> {
        self.inner.get_activity(user_id, date).await
    }

    async fn list_activities(&self, user_id: Option<Uuid>) -> Result<Vec<ActivityRecord>> {
        self.inner.list_activities(user_id).await
    }

    async fn list_recent_activities(
        &self,
        user_id: Uuid,
        limit: u32,
    ) -> Result<Vec<ActivityRecord>> {
        self.inner.list_recent_activities(user_id, limit).await
    }

    async fn append_weight(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        weight: f64,
    ) -> Result<WeightEntry> {
        self.inner.append_weight(user_id, date, weight).await
    }

    async fn list_weights(&self, user_id: Uuid) -> Result<Vec<WeightEntry>> {
        self.inner.list_weights(user_id).await
    }

    async fn list_all_weights(&self) -> Result<Vec<WeightEntry>> {
        self.inner.list_all_weights().await
    }
}
