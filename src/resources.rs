// ABOUTME: Centralized resource container for dependency injection across routes
// ABOUTME: Holds the shared database handle, per-area managers, and the server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

//! Shared server state handed to every route handler.
//!
//! Expensive resources (the connection pool, configuration) are created
//! once at startup and shared through an `Arc` so handlers never rebuild
//! them per request.

use crate::config::environment::ServerConfig;
use crate::database::exercises::ExercisesManager;
use crate::database::muscles::MusclesManager;
use crate::database::routines::RoutinesManager;
use crate::database::Database;
use std::sync::Arc;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Database handle owning the connection pool
    pub database: Arc<Database>,
    /// Muscle and muscle-group reference data
    pub muscles: MusclesManager,
    /// Exercise rows
    pub exercises: ExercisesManager,
    /// Routine trees
    pub routines: RoutinesManager,
    /// Server configuration loaded at startup
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Assemble resources around an initialized database and configuration
    #[must_use]
    pub fn new(database: Database, config: Arc<ServerConfig>) -> Self {
        let pool = database.pool().clone();
        Self {
            database: Arc::new(database),
            muscles: MusclesManager::new(pool.clone()),
            exercises: ExercisesManager::new(pool.clone()),
            routines: RoutinesManager::new(pool),
            config,
        }
    }
}
