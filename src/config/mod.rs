// ABOUTME: Configuration module for centralized server settings
// ABOUTME: Environment-variable driven configuration with typed store URLs

//! Configuration management

/// Environment-based server configuration
pub mod environment;
