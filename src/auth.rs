// ABOUTME: Credential verification and session management for the tracker
// ABOUTME: Bcrypt password hashing plus opaque bearer tokens in an in-memory session map
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication and session management
//!
//! The current user is never ambient state: login issues an opaque bearer
//! token, and every handler resolves that token through [`AuthManager`]
//! into an explicit [`Session`] that is passed down to the core module.
//!
//! Accounts created by the authenticated (relational) variant carry a
//! bcrypt credential hash. Accounts loaded from the flat-file variant have
//! none — that variant never had passwords — and log in by username alone.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::constants::sessions::SESSION_EXPIRY_HOURS;
use crate::errors::{AppError, AppResult};
use crate::models::User;

/// A resolved login session
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque bearer token
    pub token: String,
    /// The authenticated user's id
    pub user_id: Uuid,
    /// The authenticated user's name
    pub username: String,
    /// When the session stops being valid
    pub expires_at: DateTime<Utc>,
}

/// Issues, resolves, and revokes login sessions
pub struct AuthManager {
    session_expiry_hours: i64,
    sessions: DashMap<String, Session>,
}

impl AuthManager {
    /// Create a manager with the given session lifetime
    #[must_use]
    pub fn new(session_expiry_hours: i64) -> Self {
        Self {
            session_expiry_hours,
            sessions: DashMap::new(),
        }
    }

    /// Hash a password for storage
    pub fn hash_password(password: &str) -> AppResult<String> {
        bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::internal("password hashing failed").with_source(e))
    }

    /// Check a password against a user's stored credential
    ///
    /// Users without a stored hash (flat-file variant accounts) pass with
    /// any password.
    #[must_use]
    pub fn verify_password(user: &User, password: &str) -> bool {
        match &user.password_hash {
            Some(hash) => bcrypt::verify(password, hash).unwrap_or(false),
            None => true,
        }
    }

    /// Issue a session for an authenticated user
    pub fn create_session(&self, user: &User) -> Session {
        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_id: user.id,
            username: user.username.clone(),
            expires_at: Utc::now() + Duration::hours(self.session_expiry_hours),
        };
        self.sessions.insert(session.token.clone(), session.clone());
        session
    }

    /// Resolve a bearer token into a live session
    pub fn resolve(&self, token: &str) -> AppResult<Session> {
        let Some(session) = self.sessions.get(token).map(|entry| entry.value().clone()) else {
            return Err(AppError::auth_invalid("Unknown session token"));
        };
        if session.expires_at <= Utc::now() {
            self.sessions.remove(token);
            return Err(AppError::auth_expired());
        }
        Ok(session)
    }

    /// Revoke a session; true when a session was actually removed
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }
}

impl Default for AuthManager {
    fn default() -> Self {
        Self::new(SESSION_EXPIRY_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_password(password: &str) -> User {
        let hash = AuthManager::hash_password(password).unwrap();
        User::new("alice".into(), Some(hash), None)
    }

    #[test]
    fn password_round_trip() {
        let user = user_with_password("hunter2");
        assert!(AuthManager::verify_password(&user, "hunter2"));
        assert!(!AuthManager::verify_password(&user, "wrong"));
    }

    #[test]
    fn passwordless_accounts_always_verify() {
        let user = User::new("bob".into(), None, None);
        assert!(AuthManager::verify_password(&user, "anything"));
    }

    #[test]
    fn sessions_resolve_until_revoked() {
        let manager = AuthManager::default();
        let user = User::new("alice".into(), None, None);

        let session = manager.create_session(&user);
        let resolved = manager.resolve(&session.token).unwrap();
        assert_eq!(resolved.user_id, user.id);
        assert_eq!(resolved.username, "alice");

        assert!(manager.revoke(&session.token));
        assert!(manager.resolve(&session.token).is_err());
    }

    #[test]
    fn expired_sessions_are_rejected_and_dropped() {
        let manager = AuthManager::new(-1);
        let user = User::new("alice".into(), None, None);

        let session = manager.create_session(&user);
        let error = manager.resolve(&session.token).unwrap_err();
        assert_eq!(error.code, crate::errors::ErrorCode::AuthExpired);

        // A second resolve sees the token as unknown, not expired.
        let error = manager.resolve(&session.token).unwrap_err();
        assert_eq!(error.code, crate::errors::ErrorCode::AuthInvalid);
    }

    #[test]
    fn unknown_tokens_are_invalid() {
        let manager = AuthManager::default();
        assert!(manager.resolve("not-a-token").is_err());
    }
}
