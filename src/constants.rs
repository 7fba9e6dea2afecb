// ABOUTME: Central constants for configuration defaults, limits, and environment variable names
// ABOUTME: Keeps magic numbers and env keys in one place shared by config, routes, and the import pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

/// Environment variable names understood by [`crate::config::environment::ServerConfig`]
pub mod env_config {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Database connection string
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Log level (error, warn, info, debug, trace)
    pub const LOG_LEVEL: &str = "RUST_LOG";
    /// Log output format (json, pretty, compact)
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    /// Maximum accepted upload size in bytes
    pub const MAX_UPLOAD_BYTES: &str = "MAX_UPLOAD_BYTES";
}

/// Default values applied when the environment leaves a knob unset
pub mod defaults {
    /// Default HTTP listen port
    pub const HTTP_PORT: u16 = 8081;
    /// Default SQLite database location
    pub const DATABASE_URL: &str = "sqlite:./data/repforge.db";
    /// Default page size for list endpoints
    pub const PAGE_SIZE: u32 = 10;
}

/// Hard limits enforced at the boundary and inside the pipeline
pub mod limits {
    /// Number of staged exercises committed per chunk during import
    pub const IMPORT_BATCH_SIZE: usize = 100;
    /// Maximum accepted upload size: 10 MiB
    pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
    /// Maximum page size for list endpoints
    pub const MAX_PAGE_SIZE: u32 = 50;
}

/// Service identity used in logs
pub mod service_names {
    /// Canonical service name for structured logging
    pub const REPFORGE_SERVER: &str = "repforge-server";
}
