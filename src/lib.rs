// ABOUTME: Main library entry point for the Winter Arc tracker server
// ABOUTME: Exposes the scoring core, storage plugins, configuration, and HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Winter Arc Tracker Server
//!
//! A habit-tracking backend: users log daily completion of four fixed
//! activity categories (physical activity, diet and nutrition, rest and
//! recovery, personal development), earn points, and are ranked into six
//! tiers per calendar month. Weight entries form a per-user time series
//! with group progress views.
//!
//! ## Architecture
//!
//! - **Core**: `scoring`, `rank`, `gaps`, and `reports` hold every
//!   business rule; the HTTP layer is a thin renderer over them.
//! - **Storage plugins**: `database_plugins` switches between the
//!   relational SQLite schema and the original flat-file CSV directory
//!   based on the configured store URL.
//! - **HTTP**: axum routes under `/api`, with bearer-token sessions
//!   resolved explicitly per request.
//!
//! ## Example
//!
//! ```rust,no_run
//! use winter_arc_server::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("store: {}", config.store.url.to_connection_string());
//!     Ok(())
//! }
//! ```

/// Credential verification and session management
pub mod auth;

/// Configuration management
pub mod config;

/// Application constants and defaults
pub mod constants;

/// SQLite store implementation
pub mod database;

/// Store abstraction with pluggable backends
pub mod database_plugins;

/// Unified error handling
pub mod errors;

/// Gap detection over logged dates
pub mod gaps;

/// Logging configuration and helpers
pub mod logging;

/// Domain models
pub mod models;

/// Rank classification
pub mod rank;

/// Aggregation and reporting
pub mod reports;

/// Shared server resources for dependency injection
pub mod resources;

/// HTTP route tree
pub mod routes;

/// Daily point scoring
pub mod scoring;
