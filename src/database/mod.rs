// ABOUTME: Database management for the Repforge server on SQLite via sqlx
// ABOUTME: Owns the connection pool and the embedded schema migration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

//! # Database Management
//!
//! This module provides storage for the Repforge server. The [`Database`]
//! struct owns the `SQLite` connection pool and runs the embedded schema
//! migration; per-area managers ([`exercises::ExercisesManager`],
//! [`muscles::MusclesManager`], [`routines::RoutinesManager`]) carry the
//! actual queries.

pub mod exercises;
pub mod muscles;
pub mod routines;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite, SqlitePool};
use std::str::FromStr;

/// Database manager owning the connection pool
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error when the connection string is invalid, the pool
    /// cannot be opened, or a migration statement fails.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory SQLite database exists per connection; a single
        // connection keeps every caller on one logical database.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error when a DDL statement fails.
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_muscles().await?;
        self.migrate_exercises().await?;
        self.migrate_routines().await?;
        Ok(())
    }

    async fn migrate_muscles(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS muscle_groups (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS ux_muscle_groups_name ON muscle_groups (LOWER(name))",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS muscles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS ux_muscles_name ON muscles (LOWER(name))")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn migrate_exercises(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS exercises (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                muscle_group_id INTEGER NOT NULL REFERENCES muscle_groups(id),
                primary_muscle_id INTEGER NOT NULL REFERENCES muscles(id),
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS ux_exercises_name ON exercises (LOWER(name))",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS exercise_secondary_muscles (
                exercise_id INTEGER NOT NULL REFERENCES exercises(id) ON DELETE CASCADE,
                muscle_id INTEGER NOT NULL REFERENCES muscles(id),
                PRIMARY KEY (exercise_id, muscle_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_routines(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS routines (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                difficulty TEXT NOT NULL DEFAULT '',
                session_duration TEXT NOT NULL DEFAULT '',
                frequency TEXT NOT NULL DEFAULT '',
                image_source TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS ux_routines_name ON routines (name)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS routine_weeks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                routine_id INTEGER NOT NULL REFERENCES routines(id) ON DELETE CASCADE,
                week_number INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS routine_days (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                week_id INTEGER NOT NULL REFERENCES routine_weeks(id) ON DELETE CASCADE,
                day_number INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS routine_exercises (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                day_id INTEGER NOT NULL REFERENCES routine_days(id) ON DELETE CASCADE,
                exercise_id INTEGER NOT NULL REFERENCES exercises(id) ON DELETE RESTRICT,
                position INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS routine_sets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                routine_exercise_id INTEGER NOT NULL REFERENCES routine_exercises(id) ON DELETE CASCADE,
                set_number INTEGER NOT NULL,
                reps INTEGER,
                percent_one_rm INTEGER,
                rest_seconds INTEGER,
                set_type TEXT NOT NULL DEFAULT 'normal'
                    CHECK (set_type IN ('normal', 'drop_set', 'cluster', 'myo_reps', 'negatives', 'max_rm'))
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
