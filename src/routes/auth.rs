// ABOUTME: Authentication route handlers for registration, login, and logout
// ABOUTME: REST endpoints issuing and revoking bearer session tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication routes
//!
//! Registration creates the account (409 on a case-insensitive duplicate
//! name); login verifies credentials and issues a bearer session token.
//! Accounts without a stored credential hash (flat-file variant) log in by
//! username alone.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};

use crate::auth::AuthManager;
use crate::database_plugins::{CreateUserOutcome, StoreProvider};
use crate::errors::AppError;
use crate::logging::AppLogger;
use crate::models::User;
use crate::resources::ServerResources;
use crate::routes::authenticate;

/// User registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Desired username
    pub username: String,
    /// Password; omitted for passwordless (flat-file style) accounts
    pub password: Option<String>,
    /// Optional goal weight in kilograms
    pub target_weight: Option<f64>,
}

/// User registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// The new user's id
    pub user_id: String,
    /// The new user's name as stored
    pub username: String,
}

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account name, matched case-insensitively
    pub username: String,
    /// Password; ignored for passwordless accounts
    pub password: Option<String>,
}

/// User info for login response
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// User id
    pub user_id: String,
    /// Username as stored
    pub username: String,
}

/// User login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    /// Token expiry as RFC 3339
    pub expires_at: String,
    /// The logged-in user
    pub user: UserInfo,
}

/// Authentication routes implementation
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/users", post(Self::handle_register))
            .route("/api/auth/login", post(Self::handle_login))
            .route("/api/auth/logout", post(Self::handle_logout))
            .with_state(resources)
    }

    /// Handle user registration
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        let username = request.username.trim();
        if username.is_empty() {
            return Err(AppError::invalid_input("username must not be empty"));
        }
        if let Some(target) = request.target_weight {
            if target <= 0.0 {
                return Err(AppError::out_of_range("target weight must be positive"));
            }
        }

        let password_hash = request
            .password
            .as_deref()
            .filter(|password| !password.is_empty())
            .map(AuthManager::hash_password)
            .transpose()?;

        let user = User::new(username.to_owned(), password_hash, request.target_weight);
        match resources.store.create_user(&user).await? {
            CreateUserOutcome::Created(user_id) => {
                AppLogger::log_auth_event(username, "register", true);
                let response = RegisterResponse {
                    user_id: user_id.to_string(),
                    username: user.username,
                };
                Ok((StatusCode::CREATED, Json(response)).into_response())
            }
            CreateUserOutcome::AlreadyExists => {
                AppLogger::log_auth_event(username, "register", false);
                Err(AppError::already_exists("Username"))
            }
        }
    }

    /// Handle login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let user = resources
            .store
            .get_user_by_username(&request.username)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Invalid username or password"))?;

        if !AuthManager::verify_password(&user, request.password.as_deref().unwrap_or_default()) {
            AppLogger::log_auth_event(&user.username, "login", false);
            return Err(AppError::auth_invalid("Invalid username or password"));
        }

        let session = resources.auth.create_session(&user);
        AppLogger::log_auth_event(&user.username, "login", true);

        let response = LoginResponse {
            token: session.token,
            expires_at: session.expires_at.to_rfc3339(),
            user: UserInfo {
                user_id: user.id.to_string(),
                username: user.username,
            },
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle logout
    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let session = authenticate(&headers, &resources)?;
        resources.auth.revoke(&session.token);
        AppLogger::log_auth_event(&session.username, "logout", true);
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
