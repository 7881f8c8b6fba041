// ABOUTME: User roster and goal-weight route handlers
// ABOUTME: Public roster listing plus self-service target weight updates

//! User management routes

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};

use crate::database_plugins::StoreProvider;
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::routes::authenticate;

/// One row of the user roster
#[derive(Debug, Serialize)]
pub struct UserSummary {
    /// Username as stored
    pub username: String,
    /// Account creation time as RFC 3339
    pub created_at: String,
    /// Goal weight in kilograms, if set
    pub target_weight: Option<f64>,
    /// When the goal weight was last set, as RFC 3339
    pub target_weight_date: Option<String>,
}

/// Roster response
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    /// All known users in creation order
    pub users: Vec<UserSummary>,
}

/// Goal weight update request
#[derive(Debug, Deserialize)]
pub struct TargetWeightRequest {
    /// New goal weight in kilograms
    pub target_weight: f64,
}

/// User management routes implementation
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user management routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/users", get(Self::handle_list_users))
            .route(
                "/api/users/:username/target-weight",
                put(Self::handle_update_target_weight),
            )
            .with_state(resources)
    }

    /// Handle roster listing
    async fn handle_list_users(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let users = resources.store.list_users().await?;
        let response = UsersResponse {
            users: users
                .into_iter()
                .map(|user| UserSummary {
                    username: user.username,
                    created_at: user.created_at.to_rfc3339(),
                    target_weight: user.target_weight,
                    target_weight_date: user.target_weight_date.map(|d| d.to_rfc3339()),
                })
                .collect(),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle a goal weight update; users can only change their own
    async fn handle_update_target_weight(
        State(resources): State<Arc<ServerResources>>,
        Path(username): Path<String>,
        headers: HeaderMap,
        Json(request): Json<TargetWeightRequest>,
    ) -> Result<Response, AppError> {
        let session = authenticate(&headers, &resources)?;
        if session.username.to_lowercase() != username.to_lowercase() {
            return Err(AppError::auth_invalid(
                "Target weight can only be changed for your own account",
            ));
        }
        if request.target_weight <= 0.0 {
            return Err(AppError::out_of_range("target weight must be positive"));
        }

        if resources
            .store
            .update_target_weight(&username, request.target_weight)
            .await?
        {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(AppError::not_found("User"))
        }
    }
}
