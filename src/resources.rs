// ABOUTME: Centralized resource container for dependency injection
// ABOUTME: Shares the store, session manager, and configuration across handlers

//! # Server Resources Module
//!
//! Centralized resource container for dependency injection. Handlers
//! receive one `Arc<ServerResources>` as axum state instead of recreating
//! stores or threading individual dependencies through every call.

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::environment::ServerConfig;
use crate::database_plugins::factory::Store;
use crate::scoring::ActivityWeights;

/// Shared server resources
pub struct ServerResources {
    /// The selected store backend
    pub store: Store,
    /// Session issuance and resolution
    pub auth: AuthManager,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Point weights used by the reporting layer
    pub weights: ActivityWeights,
}

impl ServerResources {
    /// Bundle the shared resources for handler state
    #[must_use]
    pub fn new(store: Store, auth: AuthManager, config: Arc<ServerConfig>) -> Self {
        Self {
            store,
            auth,
            config,
            weights: ActivityWeights::default(),
        }
    }
}
