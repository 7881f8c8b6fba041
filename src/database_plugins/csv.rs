// ABOUTME: Flat-file CSV store matching the tracker's original data directory layout
// ABOUTME: Three delimited tables with header rows, loaded whole and rewritten on save

//! Flat-file store implementation
//!
//! The original deployment persisted everything as three delimited text
//! files in a data directory: `registros.csv` (daily activity logs keyed by
//! username and date), `users.csv`, and `weight_records.csv`. This backend
//! keeps that layout byte-compatible: a fixed header row per table, whole
//! files rewritten on every save, and a missing directory or file treated
//! as an empty dataset that is lazily initialized on first write.
//!
//! The in-memory table set lives behind one async `RwLock`; the store is
//! strictly read-modify-write per request, so the lock is only ever held
//! for the duration of one operation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CreateUserOutcome, StoreProvider};
use crate::constants::dates::DATE_FORMAT;
use crate::constants::flat_file;
use crate::models::{ActivityFlags, ActivityRecord, User, WeightEntry};
use crate::scoring::{score, ActivityWeights};

/// In-memory copy of the three tables
#[derive(Default, Debug)]
struct Tables {
    users: Vec<User>,
    activities: Vec<ActivityRecord>,
    weights: Vec<WeightEntry>,
}

impl Tables {
    fn username_of(&self, user_id: Uuid) -> Option<&str> {
        self.users
            .iter()
            .find(|user| user.id == user_id)
            .map(|user| user.username.as_str())
    }

    fn user_by_name(&self, username: &str) -> Option<&User> {
        let wanted = username.to_lowercase();
        self.users
            .iter()
            .find(|user| user.username.to_lowercase() == wanted)
    }
}

/// Flat-file CSV store implementation
#[derive(Clone, Debug)]
pub struct CsvStore {
    dir: PathBuf,
    tables: Arc<RwLock<Tables>>,
    weights_table: ActivityWeights,
}

impl CsvStore {
    /// Open a data directory, loading any existing tables
    ///
    /// A missing directory or missing files are an empty dataset, not an
    /// error; they are created on first write.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let tables = load_tables(&dir).await?;
        Ok(Self {
            dir,
            tables: Arc::new(RwLock::new(tables)),
            weights_table: ActivityWeights::default(),
        })
    }

    async fn save_users(&self, tables: &Tables) -> Result<()> {
        let output = render_users_csv(&tables.users);
        self.write_table(flat_file::USERS_FILE, &output).await
    }

    async fn save_activities(&self, tables: &Tables) -> Result<()> {
        let output = render_activities_csv(&tables.activities, &tables.users);
        self.write_table(flat_file::ACTIVITIES_FILE, &output).await
    }

    async fn save_weights(&self, tables: &Tables) -> Result<()> {
        let output = render_weights_csv(&tables.weights, &tables.users);
        self.write_table(flat_file::WEIGHTS_FILE, &output).await
    }

    async fn write_table(&self, file: &str, content: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating data directory {}", self.dir.display()))?;
        let path = self.dir.join(file);
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("writing {}", path.display()))
    }
}

#[async_trait]
impl StoreProvider for CsvStore {
    async fn migrate(&self) -> Result<()> {
        // Write out the current tables (header-only files when empty).
        let tables = self.tables.read().await;
        self.save_users(&tables).await?;
        self.save_activities(&tables).await?;
        self.save_weights(&tables).await
    }

    async fn create_user(&self, user: &User) -> Result<CreateUserOutcome> {
        let mut tables = self.tables.write().await;
        if tables.user_by_name(&user.username).is_some() {
            return Ok(CreateUserOutcome::AlreadyExists);
        }
        tables.users.push(user.clone());
        self.save_users(&tables).await?;
        Ok(CreateUserOutcome::Created(user.id))
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|user| user.id == user_id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.user_by_name(username).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.clone())
    }

    async fn user_count(&self) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables.users.len() as i64)
    }

    async fn update_target_weight(&self, username: &str, target_weight: f64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let wanted = username.to_lowercase();
        let Some(user) = tables
            .users
            .iter_mut()
            .find(|user| user.username.to_lowercase() == wanted)
        else {
            return Ok(false);
        };
        user.target_weight = Some(target_weight);
        user.target_weight_date = Some(Utc::now());
        self.save_users(&tables).await?;
        Ok(true)
    }

    async fn upsert_activity(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        flags: ActivityFlags,
    ) -> Result<ActivityRecord> {
        let mut tables = self.tables.write().await;
        if tables.username_of(user_id).is_none() {
            bail!("unknown user id {user_id}");
        }

        // Replace any existing row for this (user, date).
        tables
            .activities
            .retain(|record| !(record.user_id == user_id && record.date == date));

        let record = ActivityRecord {
            user_id,
            date,
            flags,
            points: score(flags, self.weights_table),
        };
        tables.activities.push(record.clone());
        tables.activities.sort_by_key(|record| record.date);
        self.save_activities(&tables).await?;
        Ok(record)
    }

    async fn get_activity(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<ActivityRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .activities
            .iter()
            .find(|record| record.user_id == user_id && record.date == date)
            .cloned())
    }

    async fn list_activities(&self, user_id: Option<Uuid>) -> Result<Vec<ActivityRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .activities
            .iter()
            .filter(|record| user_id.map_or(true, |id| record.user_id == id))
            .cloned()
            .collect())
    }

    async fn list_recent_activities(
        &self,
        user_id: Uuid,
        limit: u32,
    ) -> Result<Vec<ActivityRecord>> {
        let tables = self.tables.read().await;
        let mut records: Vec<ActivityRecord> = tables
            .activities
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records.truncate(limit as usize);
        Ok(records)
    }

    async fn append_weight(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        weight: f64,
    ) -> Result<WeightEntry> {
        if weight <= 0.0 {
            bail!("weight must be positive, got {weight}");
        }

        let mut tables = self.tables.write().await;
        if tables.username_of(user_id).is_none() {
            bail!("unknown user id {user_id}");
        }

        let entry = WeightEntry {
            user_id,
            date,
            weight,
        };
        tables.weights.push(entry.clone());
        tables.weights.sort_by_key(|entry| entry.date);
        self.save_weights(&tables).await?;
        Ok(entry)
    }

    async fn list_weights(&self, user_id: Uuid) -> Result<Vec<WeightEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .weights
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_all_weights(&self) -> Result<Vec<WeightEntry>> {
        let tables = self.tables.read().await;
        Ok(tables.weights.clone())
    }
}

/// Render the users table in the on-disk layout
#[must_use]
pub fn render_users_csv(users: &[User]) -> String {
    let mut output = String::from(flat_file::USERS_HEADER);
    output.push('\n');
    for user in users {
        output.push_str(&format!(
            "{},{},{},{}\n",
            escape_csv(&user.username),
            user.created_at.to_rfc3339(),
            user.target_weight.map_or(String::new(), |w| w.to_string()),
            user.target_weight_date
                .map_or(String::new(), |d| d.to_rfc3339()),
        ));
    }
    output
}

/// Render the activity records table in the on-disk layout
///
/// Rows whose user id cannot be resolved to a username are skipped.
#[must_use]
pub fn render_activities_csv(records: &[ActivityRecord], users: &[User]) -> String {
    let names: HashMap<Uuid, &str> = users
        .iter()
        .map(|user| (user.id, user.username.as_str()))
        .collect();

    let mut output = String::from(flat_file::ACTIVITIES_HEADER);
    output.push('\n');
    for record in records {
        let Some(username) = names.get(&record.user_id) else {
            continue;
        };
        output.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            escape_csv(username),
            record.date.format(DATE_FORMAT),
            record.flags.physical_activity,
            record.flags.diet_nutrition,
            record.flags.rest_recovery,
            record.flags.personal_development,
            record.points,
        ));
    }
    output
}

/// Render the weight entries table in the on-disk layout
#[must_use]
pub fn render_weights_csv(entries: &[WeightEntry], users: &[User]) -> String {
    let names: HashMap<Uuid, &str> = users
        .iter()
        .map(|user| (user.id, user.username.as_str()))
        .collect();

    let mut output = String::from(flat_file::WEIGHTS_HEADER);
    output.push('\n');
    for entry in entries {
        let Some(username) = names.get(&entry.user_id) else {
            continue;
        };
        output.push_str(&format!(
            "{},{},{}\n",
            escape_csv(username),
            entry.date.format(DATE_FORMAT),
            entry.weight,
        ));
    }
    output
}

async fn load_tables(dir: &Path) -> Result<Tables> {
    let mut tables = Tables::default();
    if !dir.exists() {
        return Ok(tables);
    }

    if let Some(content) = read_table(dir, flat_file::USERS_FILE).await? {
        for line in data_lines(&content) {
            let fields = split_csv_line(line);
            let username = fields.first().map(String::as_str).unwrap_or_default();
            if username.is_empty() {
                continue;
            }
            tables.users.push(User {
                id: Uuid::new_v4(),
                username: username.to_owned(),
                password_hash: None,
                created_at: parse_timestamp(fields.get(1).map_or("", String::as_str))
                    .unwrap_or_else(Utc::now),
                target_weight: parse_optional_f64(fields.get(2).map_or("", String::as_str)),
                target_weight_date: fields
                    .get(3)
                    .and_then(|raw| parse_timestamp(raw)),
            });
        }
    }

    if let Some(content) = read_table(dir, flat_file::ACTIVITIES_FILE).await? {
        for line in data_lines(&content) {
            let fields = split_csv_line(line);
            if fields.len() < 6 {
                continue;
            }
            let user_id = resolve_user(&mut tables, &fields[0]);
            let date = NaiveDate::parse_from_str(&fields[1], DATE_FORMAT)
                .with_context(|| format!("bad date in activity row: {}", fields[1]))?;
            let flags = ActivityFlags {
                physical_activity: parse_bool(&fields[2]),
                diet_nutrition: parse_bool(&fields[3]),
                rest_recovery: parse_bool(&fields[4]),
                personal_development: parse_bool(&fields[5]),
            };
            // The stored Puntos column is ignored: points are always
            // recomputed from the flags.
            tables.activities.push(ActivityRecord {
                user_id,
                date,
                flags,
                points: score(flags, ActivityWeights::default()),
            });
        }
        tables.activities.sort_by_key(|record| record.date);
    }

    if let Some(content) = read_table(dir, flat_file::WEIGHTS_FILE).await? {
        for line in data_lines(&content) {
            let fields = split_csv_line(line);
            if fields.len() < 3 {
                continue;
            }
            let user_id = resolve_user(&mut tables, &fields[0]);
            let date = NaiveDate::parse_from_str(&fields[1], DATE_FORMAT)
                .with_context(|| format!("bad date in weight row: {}", fields[1]))?;
            let weight: f64 = fields[2]
                .parse()
                .with_context(|| format!("bad weight value: {}", fields[2]))?;
            tables.weights.push(WeightEntry {
                user_id,
                date,
                weight,
            });
        }
        tables.weights.sort_by_key(|entry| entry.date);
    }

    Ok(tables)
}

async fn read_table(dir: &Path, file: &str) -> Result<Option<String>> {
    let path = dir.join(file);
    if !path.exists() {
        return Ok(None);
    }
    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(Some(content))
}

/// Rows referencing a username absent from users.csv still belong to
/// someone; give them an implicit account so their records stay visible.
fn resolve_user(tables: &mut Tables, username: &str) -> Uuid {
    if let Some(user) = tables.user_by_name(username) {
        return user.id;
    }
    let user = User {
        id: Uuid::new_v4(),
        username: username.to_owned(),
        password_hash: None,
        created_at: Utc::now(),
        target_weight: None,
        target_weight_date: None,
    };
    let id = user.id;
    tables.users.push(user);
    id
}

fn data_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .skip(1)
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_owned()
    }
}

fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim(), "true" | "True" | "TRUE" | "1")
}

fn parse_optional_f64(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            // Legacy rows written by the previous tooling use a naive
            // timestamp without offset.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
                .map(|dt| dt.and_utc())
                .ok()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_escaping_round_trips() {
        for raw in ["plain", "with,comma", "with \"quotes\"", "both,\"of\",them"] {
            let line = format!("{},tail", escape_csv(raw));
            let fields = split_csv_line(&line);
            assert_eq!(fields[0], raw);
            assert_eq!(fields[1], "tail");
        }
    }

    #[test]
    fn bools_parse_in_both_spellings() {
        assert!(parse_bool("true"));
        assert!(parse_bool("True"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("False"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn timestamps_accept_rfc3339_and_legacy_naive() {
        assert!(parse_timestamp("2024-06-01T10:00:00+00:00").is_some());
        assert!(parse_timestamp("2024-06-01 10:00:00.123456").is_some());
        assert!(parse_timestamp("").is_none());
    }
}
