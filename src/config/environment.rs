// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, defaults, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

//! Environment-based configuration management for production deployment

use crate::constants::{defaults, env_config, limits};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
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

/// Database connection configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection string, e.g. `sqlite:./data/repforge.db` or `sqlite::memory:`
    pub url: String,
}

/// Top-level server configuration assembled from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Log level for the tracing subscriber
    pub log_level: LogLevel,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables, applying defaults
    /// for anything unset.
    ///
    /// # Errors
    ///
    /// Returns an error when a set variable fails to parse (e.g. a
    /// non-numeric `HTTP_PORT`).
    pub fn from_env() -> Result<Self> {
        let http_port = match env::var(env_config::HTTP_PORT) {
            Ok(port) => port
                .parse::<u16>()
                .with_context(|| format!("invalid {}: {port}", env_config::HTTP_PORT))?,
            Err(_) => defaults::HTTP_PORT,
        };

        let database_url = env::var(env_config::DATABASE_URL)
            .unwrap_or_else(|_| defaults::DATABASE_URL.to_owned());

        let log_level = env::var(env_config::LOG_LEVEL)
            .map(|s| LogLevel::from_str_or_default(&s))
            .unwrap_or_default();

        let max_upload_bytes = match env::var(env_config::MAX_UPLOAD_BYTES) {
            Ok(bytes) => bytes
                .parse::<usize>()
                .with_context(|| format!("invalid {}: {bytes}", env_config::MAX_UPLOAD_BYTES))?,
            Err(_) => limits::MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            http_port,
            database: DatabaseConfig { url: database_url },
            log_level,
            max_upload_bytes,
        })
    }

    /// One-line configuration summary for startup logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "http_port={} database_url={} log_level={} max_upload_bytes={}",
            self.http_port, self.database.url, self.log_level, self.max_upload_bytes
        )
    }
}
