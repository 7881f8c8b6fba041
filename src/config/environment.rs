// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses env variables into typed server, store, and logging configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment-based configuration management
//!
//! The server is configured entirely through environment variables, with a
//! small set of defaults good enough for local development. Store selection
//! is driven by `DATABASE_URL`: `sqlite:` URLs select the relational
//! backend, a `csv:` URL or bare directory path selects the flat-file
//! backend.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::constants::ports;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Standard operational logging
    #[default]
    Info,
    /// Verbose debugging
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback to `Info`
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Test runs
    Testing,
}

impl Environment {
    /// Parse from string with fallback to `Development`
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe store location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreUrl {
    /// SQLite database file
    Sqlite {
        /// Database file path
        path: PathBuf,
    },
    /// In-memory SQLite (for testing)
    Memory,
    /// Flat-file CSV directory
    FlatFile {
        /// Data directory holding the CSV tables
        dir: PathBuf,
    },
    /// PostgreSQL connection (recognized, not served by this build)
    Postgres {
        /// Full connection string
        connection_string: String,
    },
}

impl StoreUrl {
    /// Parse a store URL
    ///
    /// `sqlite:` prefixes select the relational backend (`sqlite::memory:`
    /// for tests), `csv:` prefixes and bare paths select the flat-file
    /// directory backend, `postgres://` is recognized so it can be
    /// rejected with a useful message instead of a parse error.
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        if let Some(path) = s.strip_prefix("sqlite:") {
            if path == ":memory:" {
                Self::Memory
            } else {
                Self::Sqlite {
                    path: PathBuf::from(path),
                }
            }
        } else if let Some(dir) = s.strip_prefix("csv:") {
            Self::FlatFile {
                dir: PathBuf::from(dir),
            }
        } else if s.starts_with("postgresql://") || s.starts_with("postgres://") {
            Self::Postgres {
                connection_string: s.to_owned(),
            }
        } else {
            // Bare path: the original deployment pointed at a data/ directory.
            Self::FlatFile {
                dir: PathBuf::from(s),
            }
        }
    }

    /// Reassemble the connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::Sqlite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
            Self::FlatFile { dir } => format!("csv:{}", dir.display()),
            Self::Postgres { connection_string } => connection_string.clone(),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Where records are persisted
    pub url: StoreUrl,
}

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Base log level
    pub log_level: LogLevel,
    /// Store settings
    pub store: StoreConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `HTTP_PORT` is set but not a valid port number.
    pub fn from_env() -> Result<Self> {
        let http_port = match env::var("HTTP_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("HTTP_PORT is not a valid port: {value}"))?,
            Err(_) => ports::DEFAULT_HTTP_PORT,
        };

        let environment =
            Environment::from_str_or_default(&env::var("ENVIRONMENT").unwrap_or_default());
        let log_level = LogLevel::from_str_or_default(&env::var("LOG_LEVEL").unwrap_or_default());

        let url = env::var("DATABASE_URL")
            .map_or_else(|_| StoreUrl::parse_url("data"), |s| StoreUrl::parse_url(&s));

        Ok(Self {
            http_port,
            environment,
            log_level,
            store: StoreConfig { url },
        })
    }

    /// One-line configuration summary for startup logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "environment={} http_port={} store={} log_level={}",
            self.environment,
            self.http_port,
            self.store.url.to_connection_string(),
            self.log_level
        )
    }
}
