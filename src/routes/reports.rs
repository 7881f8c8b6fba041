// ABOUTME: Reporting route handlers: leaderboards, heatmap, gaps, weight progress, export
// ABOUTME: Thin renderers over the aggregation core, public like the rankings page

//! Reporting routes
//!
//! Read-only views over the whole record set. These are the endpoints the
//! rankings and stats pages render from; none of them mutate anything, so
//! they skip authentication the way the original rankings page did.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Datelike, Days, NaiveDate, Utc};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::database_plugins::csv::{
    render_activities_csv, render_users_csv, render_weights_csv,
};
use crate::database_plugins::StoreProvider;
use crate::errors::AppError;
use crate::gaps::GapReport;
use crate::models::Activity;
use crate::reports::{
    activity_ranking, heatmap, leaderboard, logged_dates_by_user, weight_progress,
    ActivityTotal, HeatmapMatrix, LeaderboardEntry, TimeBucket, WeightProgress,
};
use crate::resources::ServerResources;

/// Bucket selector for leaderboard-style endpoints
#[derive(Debug, Deserialize)]
pub struct BucketQuery {
    /// `month` (default), `week`, or `all`
    pub bucket: Option<String>,
}

/// Inclusive date range for the heatmap
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// First column date; defaults to the first day of the current month
    pub from: Option<NaiveDate>,
    /// Last column date; defaults to the last day of the current month
    pub to: Option<NaiveDate>,
}

/// Leaderboard response
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    /// The bucket the totals cover
    pub bucket: TimeBucket,
    /// Rows sorted by points descending
    pub entries: Vec<LeaderboardEntry>,
}

/// Single-activity ranking response
#[derive(Debug, Serialize)]
pub struct ActivityRankingResponse {
    /// The ranked activity
    pub activity: Activity,
    /// The bucket the totals cover
    pub bucket: TimeBucket,
    /// Rows sorted by points descending
    pub entries: Vec<ActivityTotal>,
}

/// Gap report response
#[derive(Debug, Serialize)]
pub struct GapsResponse {
    /// Users with at least one unlogged day inside their span
    pub users_with_gaps: Vec<GapReport>,
}

/// One point of the group weight series
#[derive(Debug, Serialize)]
pub struct GroupWeightPoint {
    /// User the measurement belongs to
    pub username: String,
    /// Measurement date
    pub date: NaiveDate,
    /// Weight in kilograms
    pub weight: f64,
}

/// Group weight progress response
#[derive(Debug, Serialize)]
pub struct WeightProgressResponse {
    /// Per-user first/latest summaries
    pub summaries: Vec<WeightProgress>,
    /// The merged series ordered by date, for the group chart
    pub series: Vec<GroupWeightPoint>,
}

/// Reporting routes implementation
pub struct ReportRoutes;

impl ReportRoutes {
    /// Create all reporting routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/reports/leaderboard", get(Self::handle_leaderboard))
            .route(
                "/api/reports/activity/:activity",
                get(Self::handle_activity_ranking),
            )
            .route("/api/reports/heatmap", get(Self::handle_heatmap))
            .route("/api/reports/gaps", get(Self::handle_gaps))
            .route(
                "/api/reports/weight-progress",
                get(Self::handle_weight_progress),
            )
            .route("/api/export/:table", get(Self::handle_export))
            .with_state(resources)
    }

    fn parse_bucket(query: &BucketQuery) -> Result<TimeBucket, AppError> {
        let today = Utc::now().date_naive();
        match query.bucket.as_deref() {
            None | Some("month") => Ok(TimeBucket::month_of(today)),
            Some("week") => Ok(TimeBucket::week_of(today)),
            Some("all") => Ok(TimeBucket::All),
            Some(other) => Err(AppError::invalid_input(format!(
                "unknown bucket: {other} (expected month, week, or all)"
            ))),
        }
    }

    /// Handle the general leaderboard
    async fn handle_leaderboard(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<BucketQuery>,
    ) -> Result<Response, AppError> {
        let bucket = Self::parse_bucket(&query)?;
        let records = resources.store.list_activities(None).await?;
        let users = resources.store.list_users().await?;

        let entries = leaderboard(&records, &users, bucket, resources.weights);
        Ok((StatusCode::OK, Json(LeaderboardResponse { bucket, entries })).into_response())
    }

    /// Handle a single-activity ranking
    async fn handle_activity_ranking(
        State(resources): State<Arc<ServerResources>>,
        Path(activity): Path<String>,
        Query(query): Query<BucketQuery>,
    ) -> Result<Response, AppError> {
        let activity = Activity::from_str(&activity)?;
        let bucket = Self::parse_bucket(&query)?;
        let records = resources.store.list_activities(None).await?;
        let users = resources.store.list_users().await?;

        let entries = activity_ranking(&records, &users, bucket, activity, resources.weights);
        let response = ActivityRankingResponse {
            activity,
            bucket,
            entries,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle the dense heatmap matrix
    async fn handle_heatmap(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<RangeQuery>,
    ) -> Result<Response, AppError> {
        let today = Utc::now().date_naive();
        let from = query.from.unwrap_or_else(|| first_day_of_month(today));
        let to = query.to.unwrap_or_else(|| last_day_of_month(today));

        let records = resources.store.list_activities(None).await?;
        let users = resources.store.list_users().await?;

        let matrix: HeatmapMatrix = heatmap(&records, &users, from, to)?;
        Ok((StatusCode::OK, Json(matrix)).into_response())
    }

    /// Handle the per-user gap reports
    async fn handle_gaps(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let records = resources.store.list_activities(None).await?;
        let users = resources.store.list_users().await?;

        let users_with_gaps: Vec<GapReport> = logged_dates_by_user(&records, &users)
            .into_iter()
            .filter_map(|(username, dates)| GapReport::for_user(username, dates))
            .collect();
        Ok((StatusCode::OK, Json(GapsResponse { users_with_gaps })).into_response())
    }

    /// Handle the group weight progress view
    async fn handle_weight_progress(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let entries = resources.store.list_all_weights().await?;
        let users = resources.store.list_users().await?;

        let summaries = weight_progress(&entries, &users);
        let names: std::collections::HashMap<uuid::Uuid, &str> = users
            .iter()
            .map(|user| (user.id, user.username.as_str()))
            .collect();
        let series = entries
            .iter()
            .filter_map(|entry| {
                names.get(&entry.user_id).map(|username| GroupWeightPoint {
                    username: (*username).to_owned(),
                    date: entry.date,
                    weight: entry.weight,
                })
            })
            .collect();

        let response = WeightProgressResponse { summaries, series };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle a table export in the flat-file layout
    async fn handle_export(
        State(resources): State<Arc<ServerResources>>,
        Path(table): Path<String>,
    ) -> Result<Response, AppError> {
        let users = resources.store.list_users().await?;
        let content = match table.as_str() {
            "activities" => {
                let records = resources.store.list_activities(None).await?;
                render_activities_csv(&records, &users)
            }
            "users" => render_users_csv(&users),
            "weights" => {
                let entries = resources.store.list_all_weights().await?;
                render_weights_csv(&entries, &users)
            }
            other => {
                return Err(AppError::not_found(format!("Export table {other}")));
            }
        };

        Ok((
            StatusCode::OK,
            [(http::header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            content,
        )
            .into_response())
    }
}

fn first_day_of_month(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

fn last_day_of_month(today: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.checked_sub_days(Days::new(1)))
        .unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_edges_cover_december() {
        assert_eq!(first_day_of_month(date(2024, 12, 15)), date(2024, 12, 1));
        assert_eq!(last_day_of_month(date(2024, 12, 15)), date(2024, 12, 31));
        assert_eq!(last_day_of_month(date(2024, 2, 10)), date(2024, 2, 29));
    }
}
