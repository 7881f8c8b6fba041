// ABOUTME: Store abstraction layer for the Winter Arc tracker
// ABOUTME: Plugin architecture with relational SQLite and flat-file CSV backends

//! Store abstraction.
//!
//! Both persistence variants of the tracker — the relational SQLite schema
//! and the original flat-file CSV directory — implement [`StoreProvider`],
//! so everything above the store boundary is backend-agnostic. The
//! [`factory::Store`] wrapper picks the backend from the configured URL.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

pub use crate::database::CreateUserOutcome;
use crate::models::{ActivityFlags, ActivityRecord, User, WeightEntry};

pub mod csv;
pub mod factory;
pub mod sqlite;

/// Core store abstraction trait
///
/// All store implementations provide the same consistent interface to the
/// application layer: user management, daily activity upserts with derived
/// points, and the weight time series.
#[async_trait]
pub trait StoreProvider: Send + Sync + Clone {
    /// Initialize the backing schema (tables or CSV files with headers)
    async fn migrate(&self) -> Result<()>;

    // ================================
    // Users
    // ================================

    /// Create a new user; duplicate names (case-insensitive) are reported,
    /// not errors
    async fn create_user(&self, user: &User) -> Result<CreateUserOutcome>;

    /// Get user by ID
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>>;

    /// Get user by username, comparing case-insensitively
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// List all users
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Total number of users
    async fn user_count(&self) -> Result<i64>;

    /// Set a user's goal weight; false when no such user exists
    async fn update_target_weight(&self, username: &str, target_weight: f64) -> Result<bool>;

    // ================================
    // Daily activities
    // ================================

    /// Insert or replace one day's log, recomputing points from the flags
    async fn upsert_activity(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        flags: ActivityFlags,
    ) -> Result<ActivityRecord>;

    /// Get one day's log for a user
    async fn get_activity(&self, user_id: Uuid, date: NaiveDate)
        -> Result<Option<ActivityRecord>>;

    /// List activity records, optionally for one user, ordered by date
    async fn list_activities(&self, user_id: Option<Uuid>) -> Result<Vec<ActivityRecord>>;

    /// Latest-first history for one user, capped at `limit` records
    async fn list_recent_activities(
        &self,
        user_id: Uuid,
        limit: u32,
    ) -> Result<Vec<ActivityRecord>>;

    // ================================
    // Weight entries
    // ================================

    /// Append one weight measurement (must be positive)
    async fn append_weight(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        weight: f64,
    ) -> Result<WeightEntry>;

    /// One user's weight series ordered by date
    async fn list_weights(&self, user_id: Uuid) -> Result<Vec<WeightEntry>>;

    /// The whole group's weight series ordered by date
    async fn list_all_weights(&self) -> Result<Vec<WeightEntry>>;
}
