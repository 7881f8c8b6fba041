// ABOUTME: SQLite store for users, daily activities, and weight entries
// ABOUTME: sqlx-backed CRUD with upsert-on-conflict activity logs and derived points
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Relational store
//!
//! The SQLite variant of the record store. Schema mirrors the tracker's
//! three tables: `users`, `daily_activities` (one row per user per date,
//! enforced by a unique index), and `weight_entries` (append-only time
//! series). Points are derived from the activity flags on every write and
//! never trusted from the caller. Concurrent-access safety is whatever the
//! SQL engine already guarantees; the last upsert for a `(user, date)` wins.

use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::constants::dates::DATE_FORMAT;
use crate::models::{ActivityFlags, ActivityRecord, User, WeightEntry};
use crate::scoring::{score, ActivityWeights};

/// Outcome of a user creation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateUserOutcome {
    /// The user was created with this id
    Created(Uuid),
    /// A user with that name (case-insensitively) already exists
    AlreadyExists,
}

/// SQLite-backed store
#[derive(Clone, Debug)]
pub struct Database {
    pool: Pool<Sqlite>,
    weights: ActivityWeights,
}

impl Database {
    /// Open (and create if missing) a SQLite database and run migrations
    pub async fn new(database_url: &str) -> Result<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options).await?;
        let db = Self {
            pool,
            weights: ActivityWeights::default(),
        };
        db.migrate().await?;
        Ok(db)
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL,
                password_hash TEXT,
                created_at TEXT NOT NULL,
                target_weight REAL,
                target_weight_date TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Username uniqueness is case-insensitive: lower both sides.
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username ON users(lower(username))",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS daily_activities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                physical_activity BOOLEAN NOT NULL DEFAULT 0,
                diet_nutrition BOOLEAN NOT NULL DEFAULT 0,
                rest_recovery BOOLEAN NOT NULL DEFAULT 0,
                personal_development BOOLEAN NOT NULL DEFAULT 0,
                points INTEGER NOT NULL DEFAULT 0,

                UNIQUE(user_id, date)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_daily_activities_user_id ON daily_activities(user_id)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_daily_activities_date ON daily_activities(date)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS weight_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                weight REAL NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_weight_entries_user_id ON weight_entries(user_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ================================
    // Users
    // ================================

    /// Create a new user unless the name is already taken (case-insensitive)
    pub async fn create_user(&self, user: &User) -> Result<CreateUserOutcome> {
        if self.get_user_by_username(&user.username).await?.is_some() {
            return Ok(CreateUserOutcome::AlreadyExists);
        }

        sqlx::query(
            r"
            INSERT INTO users (id, username, password_hash, created_at, target_weight, target_weight_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at.to_rfc3339())
        .bind(user.target_weight)
        .bind(user.target_weight_date.map(|d| d.to_rfc3339()))
        .execute(&self.pool)
        .await?;

        Ok(CreateUserOutcome::Created(user.id))
    }

    /// Get user by ID
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| row_to_user(&row)).transpose()
    }

    /// Get user by username, comparing case-insensitively
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE lower(username) = lower(?1)")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| row_to_user(&row)).transpose()
    }

    /// List all users ordered by creation time
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_user).collect()
    }

    /// Total number of users
    pub async fn user_count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }

    /// Set a user's goal weight, stamping the change time
    ///
    /// Returns false when no such user exists.
    pub async fn update_target_weight(&self, username: &str, target_weight: f64) -> Result<bool> {
        let result = sqlx::query(
            r"
            UPDATE users SET target_weight = ?1, target_weight_date = ?2
            WHERE lower(username) = lower(?3)
            ",
        )
        .bind(target_weight)
        .bind(Utc::now().to_rfc3339())
        .bind(username)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // ================================
    // Daily activities
    // ================================

    /// Insert or replace one day's log, recomputing points from the flags
    pub async fn upsert_activity(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        flags: ActivityFlags,
    ) -> Result<ActivityRecord> {
        let points = score(flags, self.weights);

        sqlx::query(
            r"
            INSERT INTO daily_activities
                (user_id, date, physical_activity, diet_nutrition, rest_recovery, personal_development, points)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(user_id, date) DO UPDATE SET
                physical_activity = excluded.physical_activity,
                diet_nutrition = excluded.diet_nutrition,
                rest_recovery = excluded.rest_recovery,
                personal_development = excluded.personal_development,
                points = excluded.points
            ",
        )
        .bind(user_id.to_string())
        .bind(date.format(DATE_FORMAT).to_string())
        .bind(flags.physical_activity)
        .bind(flags.diet_nutrition)
        .bind(flags.rest_recovery)
        .bind(flags.personal_development)
        .bind(i64::from(points))
        .execute(&self.pool)
        .await?;

        Ok(ActivityRecord {
            user_id,
            date,
            flags,
            points,
        })
    }

    /// Get one day's log for a user
    pub async fn get_activity(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<ActivityRecord>> {
        let row = sqlx::query("SELECT * FROM daily_activities WHERE user_id = ?1 AND date = ?2")
            .bind(user_id.to_string())
            .bind(date.format(DATE_FORMAT).to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| row_to_activity(&row)).transpose()
    }

    /// List activity records, optionally for a single user, ordered by date
    pub async fn list_activities(&self, user_id: Option<Uuid>) -> Result<Vec<ActivityRecord>> {
        let rows = match user_id {
            Some(user_id) => {
                sqlx::query("SELECT * FROM daily_activities WHERE user_id = ?1 ORDER BY date")
                    .bind(user_id.to_string())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("SELECT * FROM daily_activities ORDER BY date")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter().map(row_to_activity).collect()
    }

    /// Latest-first history for one user, capped at `limit` records
    pub async fn list_recent_activities(
        &self,
        user_id: Uuid,
        limit: u32,
    ) -> Result<Vec<ActivityRecord>> {
        let rows = sqlx::query(
            "SELECT * FROM daily_activities WHERE user_id = ?1 ORDER BY date DESC LIMIT ?2",
        )
        .bind(user_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_activity).collect()
    }

    // ================================
    // Weight entries
    // ================================

    /// Append one weight measurement
    pub async fn append_weight(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        weight: f64,
    ) -> Result<WeightEntry> {
        if weight <= 0.0 {
            bail!("weight must be positive, got {weight}");
        }

        sqlx::query("INSERT INTO weight_entries (user_id, date, weight) VALUES (?1, ?2, ?3)")
            .bind(user_id.to_string())
            .bind(date.format(DATE_FORMAT).to_string())
            .bind(weight)
            .execute(&self.pool)
            .await?;

        Ok(WeightEntry {
            user_id,
            date,
            weight,
        })
    }

    /// One user's weight series ordered by date
    pub async fn list_weights(&self, user_id: Uuid) -> Result<Vec<WeightEntry>> {
        let rows = sqlx::query("SELECT * FROM weight_entries WHERE user_id = ?1 ORDER BY date, id")
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_weight).collect()
    }

    /// The whole group's weight series ordered by date
    pub async fn list_all_weights(&self) -> Result<Vec<WeightEntry>> {
        let rows = sqlx::query("SELECT * FROM weight_entries ORDER BY date, id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_weight).collect()
    }
}

fn parse_uuid(raw: &str) -> Result<Uuid> {
    Ok(Uuid::parse_str(raw)?)
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(raw, DATE_FORMAT)?)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

fn row_to_user(row: &SqliteRow) -> Result<User> {
    let id: String = row.try_get("id")?;
    let created_at: String = row.try_get("created_at")?;
    let target_weight_date: Option<String> = row.try_get("target_weight_date")?;

    Ok(User {
        id: parse_uuid(&id)?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        created_at: parse_timestamp(&created_at)?,
        target_weight: row.try_get("target_weight")?,
        target_weight_date: target_weight_date.as_deref().map(parse_timestamp).transpose()?,
    })
}

fn row_to_activity(row: &SqliteRow) -> Result<ActivityRecord> {
    let user_id: String = row.try_get("user_id")?;
    let date: String = row.try_get("date")?;
    let points: i64 = row.try_get("points")?;

    Ok(ActivityRecord {
        user_id: parse_uuid(&user_id)?,
        date: parse_date(&date)?,
        flags: ActivityFlags {
            physical_activity: row.try_get("physical_activity")?,
            diet_nutrition: row.try_get("diet_nutrition")?,
            rest_recovery: row.try_get("rest_recovery")?,
            personal_development: row.try_get("personal_development")?,
        },
        points: u32::try_from(points)?,
    })
}

fn row_to_weight(row: &SqliteRow) -> Result<WeightEntry> {
    let user_id: String = row.try_get("user_id")?;
    let date: String = row.try_get("date")?;

    Ok(WeightEntry {
        user_id: parse_uuid(&user_id)?,
        date: parse_date(&date)?,
        weight: row.try_get("weight")?,
    })
}
