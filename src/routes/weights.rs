// ABOUTME: Weight tracking route handlers for the authenticated user
// ABOUTME: Appends validated measurements and serves the date-filtered series

//! Weight tracking routes
//!
//! Non-positive weights and inverted date ranges are rejected before any
//! write or read happens, mirroring the validation the tracking page always
//! did.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};

use crate::database_plugins::StoreProvider;
use crate::errors::AppError;
use crate::models::WeightEntry;
use crate::resources::ServerResources;
use crate::routes::authenticate;

/// New measurement request
#[derive(Debug, Deserialize)]
pub struct AppendWeightRequest {
    /// Measurement date
    pub date: NaiveDate,
    /// Weight in kilograms, must be positive
    pub weight: f64,
}

/// Series query with an optional inclusive date range
#[derive(Debug, Deserialize)]
pub struct WeightRangeQuery {
    /// Earliest date to include
    pub from: Option<NaiveDate>,
    /// Latest date to include
    pub to: Option<NaiveDate>,
}

/// Weight series response
#[derive(Debug, Serialize)]
pub struct WeightsResponse {
    /// Entries ordered by date
    pub entries: Vec<WeightEntry>,
}

/// Weight tracking routes implementation
pub struct WeightRoutes;

impl WeightRoutes {
    /// Create all weight tracking routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/weights",
                post(Self::handle_append).get(Self::handle_list),
            )
            .with_state(resources)
    }

    /// Handle a new measurement
    async fn handle_append(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<AppendWeightRequest>,
    ) -> Result<Response, AppError> {
        let session = authenticate(&headers, &resources)?;
        if request.weight <= 0.0 {
            return Err(AppError::out_of_range("weight must be positive"));
        }

        let entry = resources
            .store
            .append_weight(session.user_id, request.date, request.weight)
            .await?;
        Ok((StatusCode::CREATED, Json(entry)).into_response())
    }

    /// Handle the series read with optional range filtering
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<WeightRangeQuery>,
    ) -> Result<Response, AppError> {
        let session = authenticate(&headers, &resources)?;

        if let (Some(from), Some(to)) = (query.from, query.to) {
            if from > to {
                return Err(AppError::invalid_input(
                    "start date must not be after end date",
                ));
            }
        }

        let entries = resources
            .store
            .list_weights(session.user_id)
            .await?
            .into_iter()
            .filter(|entry| {
                query.from.map_or(true, |from| entry.date >= from)
                    && query.to.map_or(true, |to| entry.date <= to)
            })
            .collect();
        Ok((StatusCode::OK, Json(WeightsResponse { entries })).into_response())
    }
}
