// ABOUTME: Daily activity log route handlers for the authenticated user
// ABOUTME: Upsert one day's flags, read back single days, history, and the weekly series

//! Daily activity routes
//!
//! All endpoints operate on the authenticated user's own records. Saving a
//! day that was already logged replaces the earlier log; points come out of
//! the store already derived from the flags.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};

use crate::database_plugins::StoreProvider;
use crate::errors::AppError;
use crate::models::{ActivityFlags, ActivityRecord};
use crate::reports::{weekly_series, TimeBucket, WeeklySeries};
use crate::resources::ServerResources;
use crate::routes::authenticate;

/// Default number of history entries when no limit is given
const DEFAULT_HISTORY_LIMIT: u32 = 7;

/// Upsert request: one day's flags
#[derive(Debug, Deserialize)]
pub struct UpsertActivityRequest {
    /// The day being logged
    pub date: NaiveDate,
    /// Completion flags; missing fields default to false
    #[serde(flatten)]
    pub flags: ActivityFlags,
}

/// Single-day query
#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    /// The day to fetch
    pub date: NaiveDate,
}

/// History query
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of entries, latest first
    pub limit: Option<u32>,
}

/// History response
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Records, latest first
    pub records: Vec<ActivityRecord>,
}

/// Weekly series response
#[derive(Debug, Serialize)]
pub struct WeekResponse {
    /// Monday of the reported week
    pub monday: NaiveDate,
    /// The zero-filled series with summary metrics
    #[serde(flatten)]
    pub series: WeeklySeries,
}

/// Daily activity routes implementation
pub struct ActivityRoutes;

impl ActivityRoutes {
    /// Create all activity routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/activities",
                put(Self::handle_upsert).get(Self::handle_get_day),
            )
            .route("/api/activities/history", get(Self::handle_history))
            .route("/api/activities/week", get(Self::handle_week))
            .with_state(resources)
    }

    /// Handle one day's log submission
    async fn handle_upsert(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<UpsertActivityRequest>,
    ) -> Result<Response, AppError> {
        let session = authenticate(&headers, &resources)?;
        let record = resources
            .store
            .upsert_activity(session.user_id, request.date, request.flags)
            .await?;
        Ok((StatusCode::OK, Json(record)).into_response())
    }

    /// Handle a single-day read
    async fn handle_get_day(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ActivityQuery>,
    ) -> Result<Response, AppError> {
        let session = authenticate(&headers, &resources)?;
        let record = resources
            .store
            .get_activity(session.user_id, query.date)
            .await?
            .ok_or_else(|| AppError::not_found("Activity record"))?;
        Ok((StatusCode::OK, Json(record)).into_response())
    }

    /// Handle the latest-first history read
    async fn handle_history(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<HistoryQuery>,
    ) -> Result<Response, AppError> {
        let session = authenticate(&headers, &resources)?;
        let records = resources
            .store
            .list_recent_activities(
                session.user_id,
                query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
            )
            .await?;
        Ok((StatusCode::OK, Json(HistoryResponse { records })).into_response())
    }

    /// Handle the current-week series
    async fn handle_week(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let session = authenticate(&headers, &resources)?;
        let records = resources
            .store
            .list_activities(Some(session.user_id))
            .await?;

        let today = Utc::now().date_naive();
        let TimeBucket::Week { monday } = TimeBucket::week_of(today) else {
            return Err(AppError::internal("week bucket construction failed"));
        };

        let series = weekly_series(&records, monday);
        Ok((StatusCode::OK, Json(WeekResponse { monday, series })).into_response())
    }
}
