// ABOUTME: Aggregation and reporting over activity records and weight entries
// ABOUTME: Time buckets, leaderboards, per-activity rankings, dense heatmap matrix, weekly series

//! Aggregation and reporting.
//!
//! Every page of the tracker renders some grouping of the same record set:
//! per-user totals with ranks, per-activity rankings, a dense date-by-user
//! matrix for the heatmap, one user's week with cumulative points, and the
//! group's weight progress. All of it lives here so the HTTP handlers stay
//! thin renderers.
//!
//! Buckets: the week bucket is the 7-day window starting the most recent
//! Monday on or before the reference day; the month bucket matches the
//! reference day's calendar year-month. An empty bucket produces empty (or
//! zero-filled) result sets, never an error.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Activity, ActivityRecord, User, WeightEntry};
use crate::rank::Rank;
use crate::scoring::ActivityWeights;

/// A time window over which records are aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TimeBucket {
    /// Every record ever logged
    All,
    /// The ISO week starting at `monday`
    Week {
        /// First day of the window
        monday: NaiveDate,
    },
    /// One calendar month
    Month {
        /// Calendar year
        year: i32,
        /// Calendar month, 1-12
        month: u32,
    },
}

impl TimeBucket {
    /// The week containing `today`, starting on the most recent Monday
    #[must_use]
    pub fn week_of(today: NaiveDate) -> Self {
        let back = u64::from(today.weekday().num_days_from_monday());
        let monday = today.checked_sub_days(Days::new(back)).unwrap_or(today);
        Self::Week { monday }
    }

    /// The calendar month containing `today`
    #[must_use]
    pub fn month_of(today: NaiveDate) -> Self {
        Self::Month {
            year: today.year(),
            month: today.month(),
        }
    }

    /// Whether a record dated `date` falls inside this bucket
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Self::All => true,
            Self::Week { monday } => {
                date >= monday && date < monday.checked_add_days(Days::new(7)).unwrap_or(date)
            }
            Self::Month { year, month } => date.year() == year && date.month() == month,
        }
    }

    /// The seven dates of a week bucket, Monday first
    #[must_use]
    pub fn week_dates(monday: NaiveDate) -> [NaiveDate; 7] {
        let mut dates = [monday; 7];
        for (offset, slot) in dates.iter_mut().enumerate() {
            *slot = monday
                .checked_add_days(Days::new(offset as u64))
                .unwrap_or(monday);
        }
        dates
    }
}

/// One row of the general leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// User the row belongs to
    pub username: String,
    /// Total points in the bucket
    pub points: u32,
    /// Points from physical activity alone
    pub physical_activity: u32,
    /// Points from diet alone
    pub diet_nutrition: u32,
    /// Points from rest alone
    pub rest_recovery: u32,
    /// Points from personal development alone
    pub personal_development: u32,
    /// Tier for the bucket total
    pub rank: Rank,
}

/// One row of a single-activity ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTotal {
    /// User the row belongs to
    pub username: String,
    /// Points earned in that activity over the bucket
    pub points: u32,
}

/// Dense date-by-user point matrix for heatmap rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapMatrix {
    /// Column dates, ascending and contiguous
    pub dates: Vec<NaiveDate>,
    /// One row per known user
    pub rows: Vec<HeatmapRow>,
}

/// One user's row of the heatmap matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapRow {
    /// User the row belongs to
    pub username: String,
    /// Points per date, aligned with the matrix dates; 0 where unlogged
    pub points: Vec<u32>,
}

/// One day of a user's weekly series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPoints {
    /// The calendar date
    pub date: NaiveDate,
    /// Points logged that day, 0 where unlogged
    pub points: u32,
    /// Running total from the start of the week
    pub cumulative: u32,
}

/// One user's current week, zero-filled, with summary metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySeries {
    /// Exactly seven days, Monday first
    pub days: Vec<DayPoints>,
    /// Week total
    pub total: u32,
    /// Mean points per day over the seven days
    pub daily_mean: f64,
    /// Highest single-day total
    pub best_day: u32,
}

/// One user's weight trajectory summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightProgress {
    /// User the summary belongs to
    pub username: String,
    /// First recorded weight in kilograms
    pub initial_weight: f64,
    /// Latest recorded weight in kilograms
    pub current_weight: f64,
    /// Latest minus first
    pub weight_change: f64,
    /// Days between first and latest entry
    pub days_tracked: i64,
    /// Date of the first entry
    pub start_date: NaiveDate,
    /// Date of the latest entry
    pub end_date: NaiveDate,
}

fn username_index(users: &[User]) -> HashMap<Uuid, &str> {
    users
        .iter()
        .map(|user| (user.id, user.username.as_str()))
        .collect()
}

/// General leaderboard for a bucket: totals, per-activity splits, and ranks
///
/// Every known user appears, including those with no records in the bucket
/// (they report zero points, not absence). Sorted by points descending,
/// username ascending on ties.
#[must_use]
pub fn leaderboard(
    records: &[ActivityRecord],
    users: &[User],
    bucket: TimeBucket,
    weights: ActivityWeights,
) -> Vec<LeaderboardEntry> {
    let names = username_index(users);
    let mut totals: HashMap<&str, (u32, [u32; 4])> = users
        .iter()
        .map(|user| (user.username.as_str(), (0, [0; 4])))
        .collect();

    for record in records.iter().filter(|r| bucket.contains(r.date)) {
        let Some(&username) = names.get(&record.user_id) else {
            continue;
        };
        let entry = totals.entry(username).or_default();
        entry.0 += record.points;
        for (slot, activity) in entry.1.iter_mut().zip(Activity::ALL) {
            if record.flags.get(activity) {
                *slot += weights.get(activity);
            }
        }
    }

    let mut rows: Vec<LeaderboardEntry> = totals
        .into_iter()
        .map(|(username, (points, by_activity))| LeaderboardEntry {
            username: username.to_owned(),
            points,
            physical_activity: by_activity[0],
            diet_nutrition: by_activity[1],
            rest_recovery: by_activity[2],
            personal_development: by_activity[3],
            rank: Rank::for_points(points),
        })
        .collect();
    rows.sort_by(|a, b| b.points.cmp(&a.points).then(a.username.cmp(&b.username)));
    rows
}

/// Ranking for a single activity over a bucket
///
/// Same completeness rule as the leaderboard: known users with no matching
/// records report zero.
#[must_use]
pub fn activity_ranking(
    records: &[ActivityRecord],
    users: &[User],
    bucket: TimeBucket,
    activity: Activity,
    weights: ActivityWeights,
) -> Vec<ActivityTotal> {
    let names = username_index(users);
    let mut totals: HashMap<&str, u32> = users
        .iter()
        .map(|user| (user.username.as_str(), 0))
        .collect();

    for record in records.iter().filter(|r| bucket.contains(r.date)) {
        if record.flags.get(activity) {
            if let Some(&username) = names.get(&record.user_id) {
                *totals.entry(username).or_default() += weights.get(activity);
            }
        }
    }

    let mut rows: Vec<ActivityTotal> = totals
        .into_iter()
        .map(|(username, points)| ActivityTotal {
            username: username.to_owned(),
            points,
        })
        .collect();
    rows.sort_by(|a, b| b.points.cmp(&a.points).then(a.username.cmp(&b.username)));
    rows
}

/// Dense date-by-user matrix over an inclusive date range
///
/// Missing `(user, date)` cells are filled with zero so the heatmap never
/// has holes. An inverted range is a validation error, caught before any
/// work is done.
pub fn heatmap(
    records: &[ActivityRecord],
    users: &[User],
    from: NaiveDate,
    to: NaiveDate,
) -> Result<HeatmapMatrix, AppError> {
    if from > to {
        return Err(AppError::invalid_input(
            "start date must not be after end date",
        ));
    }

    let mut dates = Vec::new();
    let mut cursor = from;
    while cursor <= to {
        dates.push(cursor);
        let Some(next) = cursor.checked_add_days(Days::new(1)) else {
            break;
        };
        cursor = next;
    }

    let column: HashMap<NaiveDate, usize> = dates
        .iter()
        .enumerate()
        .map(|(index, date)| (*date, index))
        .collect();
    let names = username_index(users);

    let mut points_by_user: HashMap<&str, Vec<u32>> = users
        .iter()
        .map(|user| (user.username.as_str(), vec![0; dates.len()]))
        .collect();

    for record in records {
        let Some(index) = column.get(&record.date) else {
            continue;
        };
        let Some(&username) = names.get(&record.user_id) else {
            continue;
        };
        if let Some(row) = points_by_user.get_mut(username) {
            row[*index] = record.points;
        }
    }

    let mut rows: Vec<HeatmapRow> = points_by_user
        .into_iter()
        .map(|(username, points)| HeatmapRow {
            username: username.to_owned(),
            points,
        })
        .collect();
    rows.sort_by(|a, b| a.username.cmp(&b.username));

    Ok(HeatmapMatrix { dates, rows })
}

/// One user's week starting at `monday`: per-day points, running total,
/// and the summary metrics the weekly stats page shows
#[must_use]
pub fn weekly_series(user_records: &[ActivityRecord], monday: NaiveDate) -> WeeklySeries {
    let by_date: HashMap<NaiveDate, u32> = user_records
        .iter()
        .map(|record| (record.date, record.points))
        .collect();

    let mut days = Vec::with_capacity(7);
    let mut cumulative = 0;
    for date in TimeBucket::week_dates(monday) {
        let points = by_date.get(&date).copied().unwrap_or(0);
        cumulative += points;
        days.push(DayPoints {
            date,
            points,
            cumulative,
        });
    }

    let total = cumulative;
    let best_day = days.iter().map(|day| day.points).max().unwrap_or(0);
    WeeklySeries {
        days,
        total,
        daily_mean: f64::from(total) / 7.0,
        best_day,
    }
}

/// Group weight progress: first/latest weight, delta, and days tracked
///
/// Only users with at least one entry appear; entries are taken in date
/// order with submission order breaking same-date ties.
#[must_use]
pub fn weight_progress(entries: &[WeightEntry], users: &[User]) -> Vec<WeightProgress> {
    let names = username_index(users);
    let mut by_user: HashMap<&str, Vec<&WeightEntry>> = HashMap::new();
    for entry in entries {
        if let Some(&username) = names.get(&entry.user_id) {
            by_user.entry(username).or_default().push(entry);
        }
    }

    let mut rows: Vec<WeightProgress> = by_user
        .into_iter()
        .filter_map(|(username, mut series)| {
            series.sort_by_key(|entry| entry.date);
            let first = series.first()?;
            let last = series.last()?;
            Some(WeightProgress {
                username: username.to_owned(),
                initial_weight: first.weight,
                current_weight: last.weight,
                weight_change: last.weight - first.weight,
                days_tracked: (last.date - first.date).num_days(),
                start_date: first.date,
                end_date: last.date,
            })
        })
        .collect();
    rows.sort_by(|a, b| a.username.cmp(&b.username));
    rows
}

/// Distinct logged dates per user, for gap reporting
#[must_use]
pub fn logged_dates_by_user<'a>(
    records: &[ActivityRecord],
    users: &'a [User],
) -> Vec<(&'a str, BTreeSet<NaiveDate>)> {
    let mut by_user: HashMap<Uuid, BTreeSet<NaiveDate>> = HashMap::new();
    for record in records {
        by_user.entry(record.user_id).or_default().insert(record.date);
    }

    users
        .iter()
        .filter_map(|user| {
            by_user
                .remove(&user.id)
                .map(|dates| (user.username.as_str(), dates))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityFlags;
    use crate::scoring::score;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(user: &User, day: NaiveDate, flags: ActivityFlags) -> ActivityRecord {
        ActivityRecord {
            user_id: user.id,
            date: day,
            flags,
            points: score(flags, ActivityWeights::default()),
        }
    }

    #[test]
    fn week_bucket_starts_on_monday() {
        // 2024-06-05 is a Wednesday; its week starts Monday 2024-06-03.
        let bucket = TimeBucket::week_of(date(2024, 6, 5));
        assert_eq!(
            bucket,
            TimeBucket::Week {
                monday: date(2024, 6, 3)
            }
        );
        assert!(bucket.contains(date(2024, 6, 3)));
        assert!(bucket.contains(date(2024, 6, 9)));
        assert!(!bucket.contains(date(2024, 6, 10)));
        assert!(!bucket.contains(date(2024, 6, 2)));
    }

    #[test]
    fn monday_is_its_own_week_start() {
        let monday = date(2024, 6, 3);
        assert_eq!(TimeBucket::week_of(monday), TimeBucket::Week { monday });
        assert_eq!(monday.weekday(), Weekday::Mon);
    }

    #[test]
    fn month_bucket_matches_year_and_month() {
        let bucket = TimeBucket::month_of(date(2024, 6, 15));
        assert!(bucket.contains(date(2024, 6, 1)));
        assert!(bucket.contains(date(2024, 6, 30)));
        assert!(!bucket.contains(date(2024, 7, 1)));
        assert!(!bucket.contains(date(2023, 6, 15)));
    }

    #[test]
    fn leaderboard_reports_known_users_with_zero() {
        let alice = User::new("alice".into(), None, None);
        let bob = User::new("bob".into(), None, None);
        let records = vec![record(
            &alice,
            date(2024, 6, 1),
            ActivityFlags {
                physical_activity: true,
                diet_nutrition: true,
                ..ActivityFlags::default()
            },
        )];

        let users = vec![alice, bob];
        let rows = leaderboard(
            &records,
            &users,
            TimeBucket::month_of(date(2024, 6, 15)),
            ActivityWeights::default(),
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].username, "alice");
        assert_eq!(rows[0].points, 2);
        assert_eq!(rows[0].physical_activity, 1);
        assert_eq!(rows[0].rest_recovery, 0);
        assert_eq!(rows[1].username, "bob");
        assert_eq!(rows[1].points, 0);
        assert_eq!(rows[1].rank, Rank::Estudiante);
    }

    #[test]
    fn june_scenario_totals_and_ranks() {
        let alice = User::new("alice".into(), None, None);
        let records = vec![
            record(
                &alice,
                date(2024, 6, 1),
                ActivityFlags {
                    physical_activity: true,
                    diet_nutrition: true,
                    ..ActivityFlags::default()
                },
            ),
            record(&alice, date(2024, 6, 2), ActivityFlags::all_done()),
        ];
        let users = vec![alice];

        let rows = leaderboard(
            &records,
            &users,
            TimeBucket::month_of(date(2024, 6, 15)),
            ActivityWeights::default(),
        );
        assert_eq!(rows[0].points, 6);
        assert_eq!(rows[0].rank, Rank::Estudiante);
    }

    #[test]
    fn activity_ranking_counts_only_that_flag() {
        let alice = User::new("alice".into(), None, None);
        let records = vec![
            record(
                &alice,
                date(2024, 6, 1),
                ActivityFlags {
                    physical_activity: true,
                    ..ActivityFlags::default()
                },
            ),
            record(
                &alice,
                date(2024, 6, 2),
                ActivityFlags {
                    diet_nutrition: true,
                    ..ActivityFlags::default()
                },
            ),
        ];
        let users = vec![alice];

        let rows = activity_ranking(
            &records,
            &users,
            TimeBucket::All,
            Activity::PhysicalActivity,
            ActivityWeights::default(),
        );
        assert_eq!(rows[0].points, 1);
    }

    #[test]
    fn heatmap_zero_fills_and_rejects_inverted_ranges() {
        let alice = User::new("alice".into(), None, None);
        let records = vec![record(&alice, date(2024, 6, 2), ActivityFlags::all_done())];
        let users = vec![alice];

        let matrix = heatmap(&records, &users, date(2024, 6, 1), date(2024, 6, 3)).unwrap();
        assert_eq!(matrix.dates.len(), 3);
        assert_eq!(matrix.rows.len(), 1);
        assert_eq!(matrix.rows[0].points, vec![0, 4, 0]);

        assert!(heatmap(&records, &users, date(2024, 6, 3), date(2024, 6, 1)).is_err());
    }

    #[test]
    fn weekly_series_is_dense_and_cumulative() {
        let alice = User::new("alice".into(), None, None);
        let monday = date(2024, 6, 3);
        let records = vec![
            record(
                &alice,
                monday,
                ActivityFlags {
                    physical_activity: true,
                    ..ActivityFlags::default()
                },
            ),
            record(&alice, date(2024, 6, 5), ActivityFlags::all_done()),
        ];

        let series = weekly_series(&records, monday);
        assert_eq!(series.days.len(), 7);
        assert_eq!(series.days[0].points, 1);
        assert_eq!(series.days[1].points, 0);
        assert_eq!(series.days[2].cumulative, 5);
        assert_eq!(series.days[6].cumulative, 5);
        assert_eq!(series.total, 5);
        assert_eq!(series.best_day, 4);
        assert!((series.daily_mean - 5.0 / 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_bucket_yields_zeroed_results() {
        let alice = User::new("alice".into(), None, None);
        let users = vec![alice];

        let rows = leaderboard(
            &[],
            &users,
            TimeBucket::month_of(date(2024, 6, 15)),
            ActivityWeights::default(),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].points, 0);

        let series = weekly_series(&[], date(2024, 6, 3));
        assert_eq!(series.total, 0);
        assert_eq!(series.days.len(), 7);
    }

    #[test]
    fn weight_progress_uses_first_and_latest() {
        let alice = User::new("alice".into(), None, None);
        let entries = vec![
            WeightEntry {
                user_id: alice.id,
                date: date(2024, 6, 10),
                weight: 79.0,
            },
            WeightEntry {
                user_id: alice.id,
                date: date(2024, 6, 1),
                weight: 81.5,
            },
        ];
        let users = vec![alice];

        let rows = weight_progress(&entries, &users);
        assert_eq!(rows.len(), 1);
        assert!((rows[0].initial_weight - 81.5).abs() < f64::EPSILON);
        assert!((rows[0].current_weight - 79.0).abs() < f64::EPSILON);
        assert!((rows[0].weight_change + 2.5).abs() < f64::EPSILON);
        assert_eq!(rows[0].days_tracked, 9);
    }
}
