// ABOUTME: System-wide constants and configuration defaults for the Winter Arc tracker
// ABOUTME: Contains rank thresholds, activity weights, flat-file table layout, and env defaults

//! # Constants Module
//!
//! Application constants and environment-based configuration defaults.

/// Server identification
pub mod server {
    /// Service name used in logs and startup banners
    pub const SERVICE_NAME: &str = "winter-arc-server";

    /// Server version from Cargo.toml
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Network defaults
pub mod ports {
    /// Default HTTP port when `HTTP_PORT` is unset
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
}

/// Point thresholds for the monthly ninja ranks (inclusive lower bounds)
pub mod ranks {
    /// Minimum points for Genin
    pub const GENIN_MIN: u32 = 31;
    /// Minimum points for Chunin
    pub const CHUNIN_MIN: u32 = 61;
    /// Minimum points for Jounin
    pub const JOUNIN_MIN: u32 = 91;
    /// Minimum points for Sannin Legendario
    pub const SANNIN_MIN: u32 = 111;
    /// Minimum points for Hokage
    pub const HOKAGE_MIN: u32 = 120;
}

/// Default per-activity point weights
pub mod weights {
    /// Points awarded per completed activity under the default table
    pub const POINTS_PER_ACTIVITY: u32 = 1;
}

/// Flat-file store layout (table file names and header rows)
pub mod flat_file {
    /// Activity records table
    pub const ACTIVITIES_FILE: &str = "registros.csv";
    /// Header row for the activity records table
    pub const ACTIVITIES_HEADER: &str =
        "Usuario,Fecha,Actividad Fisica,Dieta y Nutricion,Descanso o Recuperacion,Desarrollo Personal,Puntos";

    /// Users table
    pub const USERS_FILE: &str = "users.csv";
    /// Header row for the users table
    pub const USERS_HEADER: &str = "username,created_at,target_weight,target_weight_date";

    /// Weight entries table
    pub const WEIGHTS_FILE: &str = "weight_records.csv";
    /// Header row for the weight entries table
    pub const WEIGHTS_HEADER: &str = "username,date,weight";
}

/// Date formats shared by the stores and reports
pub mod dates {
    /// Calendar-date column format (`2024-06-01`)
    pub const DATE_FORMAT: &str = "%Y-%m-%d";
    /// Month-bucket format (`2024-06`)
    pub const MONTH_FORMAT: &str = "%Y-%m";
}

/// Session management defaults
pub mod sessions {
    /// Hours a login session stays valid
    pub const SESSION_EXPIRY_HOURS: i64 = 24;
}
