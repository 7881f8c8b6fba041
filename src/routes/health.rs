// ABOUTME: Health check route handlers for service monitoring
// ABOUTME: Provides liveness and store-backed readiness endpoints

//! Health check routes for service monitoring
//!
//! `/health` is pure liveness; `/ready` additionally proves the store
//! answers queries, so load balancers stop routing to an instance whose
//! backend is gone.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;

use crate::constants::server;
use crate::database_plugins::StoreProvider;
use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::health_handler))
            .route("/ready", get(Self::ready_handler))
            .with_state(resources)
    }

    async fn health_handler() -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "status": "healthy",
            "service": server::SERVICE_NAME,
            "version": server::SERVER_VERSION,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    async fn ready_handler(State(resources): State<Arc<ServerResources>>) -> Response {
        match resources.store.user_count().await {
            Ok(users) => Json(serde_json::json!({
                "status": "ready",
                "store": resources.store.backend_info(),
                "users": users,
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
            .into_response(),
            Err(error) => {
                tracing::error!("readiness probe failed: {error:#}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(serde_json::json!({
                        "status": "unavailable",
                        "timestamp": chrono::Utc::now().to_rfc3339()
                    })),
                )
                    .into_response()
            }
        }
    }
}
