// ABOUTME: Database operations for muscle groups and muscles, the import reference data
// ABOUTME: Provides snapshot loads keyed by lowercase name plus lazy creation used by the resolver
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

use crate::models::{Muscle, MuscleGroup};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;

/// Manager for muscle-group and muscle reference data
#[derive(Clone)]
pub struct MusclesManager {
    pool: SqlitePool,
}

impl MusclesManager {
    /// Create a manager backed by the given pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load every muscle group keyed by lowercase name
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx` error on query failure.
    pub async fn groups_by_name(&self) -> Result<HashMap<String, MuscleGroup>, sqlx::Error> {
        let rows = sqlx::query("SELECT id, name, created_at FROM muscle_groups")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let group = row_to_group(row);
                (group.name.to_lowercase(), group)
            })
            .collect())
    }

    /// Load every muscle keyed by lowercase name
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx` error on query failure.
    pub async fn muscles_by_name(&self) -> Result<HashMap<String, Muscle>, sqlx::Error> {
        let rows = sqlx::query("SELECT id, name, created_at FROM muscles")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let muscle = row_to_muscle(row);
                (muscle.name.to_lowercase(), muscle)
            })
            .collect())
    }

    /// Insert a new muscle group, returning the stored row
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx` error, including the unique-name
    /// constraint violation when the group already exists.
    pub async fn create_group(&self, name: &str) -> Result<MuscleGroup, sqlx::Error> {
        let row = sqlx::query(
            "INSERT INTO muscle_groups (name) VALUES (?) RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row_to_group(&row))
    }

    /// Insert a new muscle, returning the stored row
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx` error, including the unique-name
    /// constraint violation when the muscle already exists.
    pub async fn create_muscle(&self, name: &str) -> Result<Muscle, sqlx::Error> {
        let row =
            sqlx::query("INSERT INTO muscles (name) VALUES (?) RETURNING id, name, created_at")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;

        Ok(row_to_muscle(&row))
    }

    /// Check that a muscle group id exists in storage
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx` error on query failure.
    pub async fn group_exists(&self, id: i64) -> Result<bool, sqlx::Error> {
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM muscle_groups WHERE id = ?)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists == 1)
    }

    /// Check that a muscle id exists in storage
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx` error on query failure.
    pub async fn muscle_exists(&self, id: i64) -> Result<bool, sqlx::Error> {
        let exists: i64 = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM muscles WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists == 1)
    }
}

fn row_to_group(row: &SqliteRow) -> MuscleGroup {
    MuscleGroup {
        id: row.get("id"),
        name: row.get("name"),
        created_at: parse_timestamp(row.get("created_at")),
    }
}

fn row_to_muscle(row: &SqliteRow) -> Muscle {
    Muscle {
        id: row.get("id"),
        name: row.get("name"),
        created_at: parse_timestamp(row.get("created_at")),
    }
}

/// Parse a stored RFC 3339 timestamp, falling back to the epoch for
/// rows written by external tooling with unexpected formats.
pub(crate) fn parse_timestamp(text: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}
