// ABOUTME: Database operations for exercise rows and their secondary-muscle links
// ABOUTME: Provides the import snapshot, transactional inserts, queries, and the non-import update path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

use crate::models::{ExerciseDetail, NewExercise};
use crate::pagination::PaginationParams;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, SqliteConnection, SqlitePool};
use std::collections::HashMap;

/// Manager for exercise rows
#[derive(Clone)]
pub struct ExercisesManager {
    pool: SqlitePool,
}

impl ExercisesManager {
    /// Create a manager backed by the given pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load every exercise id keyed by lowercase name.
    ///
    /// This is the call-scoped snapshot the import pipeline consults for
    /// its existing-in-storage check; it is extended in memory as records
    /// pass validation.
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx` error on query failure.
    pub async fn existing_by_name(&self) -> Result<HashMap<String, i64>, sqlx::Error> {
        let rows = sqlx::query("SELECT id, name FROM exercises")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let name: String = row.get("name");
                (name.to_lowercase(), row.get("id"))
            })
            .collect())
    }

    /// Check directly against storage whether an exercise with this name
    /// exists, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx` error on query failure.
    pub async fn name_exists(&self, name: &str) -> Result<bool, sqlx::Error> {
        let exists: i64 = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM exercises WHERE LOWER(name) = LOWER(?))",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists == 1)
    }

    /// Insert a staged exercise and its secondary-muscle links on the given
    /// connection, returning the new row id.
    ///
    /// The caller supplies the connection so the insert lands inside
    /// whatever transaction the persister is driving.
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx` error, including constraint
    /// violations surfaced at commit time.
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
        exercise: &NewExercise,
    ) -> Result<i64, sqlx::Error> {
        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO exercises (name, description, muscle_group_id, primary_muscle_id)
            VALUES (?, ?, ?, ?)
            RETURNING id
            ",
        )
        .bind(&exercise.name)
        .bind(&exercise.description)
        .bind(exercise.muscle_group_id)
        .bind(exercise.primary_muscle_id)
        .fetch_one(&mut *conn)
        .await?;

        for muscle_id in &exercise.secondary_muscle_ids {
            sqlx::query(
                "INSERT INTO exercise_secondary_muscles (exercise_id, muscle_id) VALUES (?, ?)",
            )
            .bind(id)
            .bind(muscle_id)
            .execute(&mut *conn)
            .await?;
        }

        Ok(id)
    }

    /// Fetch a single exercise with muscle names resolved
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx` error on query failure.
    pub async fn get(&self, id: i64) -> Result<Option<ExerciseDetail>, sqlx::Error> {
        let row = sqlx::query(&format!("{DETAIL_QUERY} WHERE e.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut detail = row_to_detail(&row);
        detail.secondary_muscles = self
            .secondary_names(&[detail.id])
            .await?
            .remove(&detail.id)
            .unwrap_or_default();

        Ok(Some(detail))
    }

    /// Fetch one page of exercises ordered by name, with an optional name
    /// suffix filter, returning the items and the total match count.
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx` error on query failure.
    pub async fn list(
        &self,
        params: &PaginationParams,
    ) -> Result<(Vec<ExerciseDetail>, i64), sqlx::Error> {
        let suffix = params.name_filter().map(|name| format!("%{name}"));

        let total: i64 = match &suffix {
            Some(pattern) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM exercises WHERE name LIKE ?")
                    .bind(pattern)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM exercises")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        let rows = match &suffix {
            Some(pattern) => {
                sqlx::query(&format!(
                    "{DETAIL_QUERY} WHERE e.name LIKE ? ORDER BY e.name LIMIT ? OFFSET ?"
                ))
                .bind(pattern)
                .bind(i64::from(params.page_size()))
                .bind(i64::from(params.offset()))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!("{DETAIL_QUERY} ORDER BY e.name LIMIT ? OFFSET ?"))
                    .bind(i64::from(params.page_size()))
                    .bind(i64::from(params.offset()))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        self.assemble_details(rows).await.map(|items| (items, total))
    }

    /// Fetch every exercise ordered by name
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx` error on query failure.
    pub async fn list_all(&self) -> Result<Vec<ExerciseDetail>, sqlx::Error> {
        let rows = sqlx::query(&format!("{DETAIL_QUERY} ORDER BY e.name"))
            .fetch_all(&self.pool)
            .await?;

        self.assemble_details(rows).await
    }

    /// Replace an exercise's description and its full secondary-muscle set.
    ///
    /// This is not part of the import flow, which skips existing names; it
    /// exists as a separate maintenance operation. Returns `false` when no
    /// exercise with the given id exists.
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx` error, including foreign-key
    /// violations for unknown secondary-muscle ids.
    pub async fn update(
        &self,
        id: i64,
        description: &str,
        secondary_muscle_ids: &[i64],
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE exercises SET description = ? WHERE id = ?")
            .bind(description)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM exercise_secondary_muscles WHERE exercise_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for muscle_id in secondary_muscle_ids {
            sqlx::query(
                "INSERT INTO exercise_secondary_muscles (exercise_id, muscle_id) VALUES (?, ?)",
            )
            .bind(id)
            .bind(muscle_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn assemble_details(
        &self,
        rows: Vec<SqliteRow>,
    ) -> Result<Vec<ExerciseDetail>, sqlx::Error> {
        let mut details: Vec<ExerciseDetail> = rows.iter().map(row_to_detail).collect();

        let ids: Vec<i64> = details.iter().map(|d| d.id).collect();
        let mut secondaries = self.secondary_names(&ids).await?;
        for detail in &mut details {
            detail.secondary_muscles = secondaries.remove(&detail.id).unwrap_or_default();
        }

        Ok(details)
    }

    /// Load secondary muscle names for a set of exercise ids, grouped by
    /// exercise id, in insertion order.
    async fn secondary_names(
        &self,
        exercise_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<String>>, sqlx::Error> {
        if exercise_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut builder = QueryBuilder::new(
            r"
            SELECT esm.exercise_id, m.name
            FROM exercise_secondary_muscles esm
            JOIN muscles m ON m.id = esm.muscle_id
            WHERE esm.exercise_id IN (
            ",
        );
        let mut separated = builder.separated(", ");
        for id in exercise_ids {
            separated.push_bind(id);
        }
        builder.push(") ORDER BY esm.rowid");

        let rows = builder.build().fetch_all(&self.pool).await?;

        let mut grouped: HashMap<i64, Vec<String>> = HashMap::new();
        for row in &rows {
            grouped
                .entry(row.get("exercise_id"))
                .or_default()
                .push(row.get("name"));
        }
        Ok(grouped)
    }
}

const DETAIL_QUERY: &str = r"
    SELECT e.id, e.name, e.description, g.name AS group_name, m.name AS primary_name
    FROM exercises e
    JOIN muscle_groups g ON g.id = e.muscle_group_id
    JOIN muscles m ON m.id = e.primary_muscle_id
";

fn row_to_detail(row: &SqliteRow) -> ExerciseDetail {
    ExerciseDetail {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        muscle_group: row.get("group_name"),
        primary_muscle: row.get("primary_name"),
        secondary_muscles: Vec::new(),
    }
}
