// ABOUTME: Route module organization for the tracker's HTTP endpoints
// ABOUTME: Assembles per-concern routers behind tracing and CORS layers

//! HTTP route tree
//!
//! Every handler is a thin renderer: it authenticates (where required),
//! validates input, calls the store or the reporting core, and serializes
//! the result. Business rules live in the core modules, not here.

use std::sync::Arc;

use axum::Router;
use http::HeaderMap;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::Session;
use crate::errors::AppError;
use crate::resources::ServerResources;

pub mod activities;
pub mod auth;
pub mod health;
pub mod reports;
pub mod users;
pub mod weights;

/// Assemble the full route tree
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(health::HealthRoutes::routes(resources.clone()))
        .merge(auth::AuthRoutes::routes(resources.clone()))
        .merge(users::UserRoutes::routes(resources.clone()))
        .merge(activities::ActivityRoutes::routes(resources.clone()))
        .merge(weights::WeightRoutes::routes(resources.clone()))
        .merge(reports::ReportRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Resolve the bearer token in the authorization header into a session
pub(crate) fn authenticate(
    headers: &HeaderMap,
    resources: &Arc<ServerResources>,
) -> Result<Session, AppError> {
    let header = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(AppError::auth_required)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::auth_invalid("Expected a bearer token"))?;

    resources.auth.resolve(token)
}
