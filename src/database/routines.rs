// ABOUTME: Database operations for routine trees (routine, week, day, exercise, set)
// ABOUTME: Persists whole forests in one transaction and reassembles trees for reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

use crate::database::muscles::parse_timestamp;
use crate::models::{
    NewRoutine, Routine, RoutineDay, RoutineExercise, RoutineSet, RoutineSummary, RoutineWeek,
    SetType,
};
use crate::pagination::PaginationParams;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, SqlitePool};
use std::collections::HashMap;

/// Manager for routine trees
#[derive(Clone)]
pub struct RoutinesManager {
    pool: SqlitePool,
}

impl RoutinesManager {
    /// Create a manager backed by the given pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolve a set of exercise names to ids in one query, matching
    /// case-insensitively. The returned map is keyed by lowercase name and
    /// only covers names that exist in storage.
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx` error on query failure.
    pub async fn exercise_ids_by_names(
        &self,
        names: &[String],
    ) -> Result<HashMap<String, i64>, sqlx::Error> {
        if names.is_empty() {
            return Ok(HashMap::new());
        }

        let mut builder = QueryBuilder::new("SELECT id, name FROM exercises WHERE LOWER(name) IN (");
        let mut separated = builder.separated(", ");
        for name in names {
            separated.push_bind(name.to_lowercase());
        }
        builder.push(")");

        let rows = builder.build().fetch_all(&self.pool).await?;

        Ok(rows
            .iter()
            .map(|row| {
                let name: String = row.get("name");
                (name.to_lowercase(), row.get("id"))
            })
            .collect())
    }

    /// Persist a forest of staged routines in a single transaction,
    /// returning how many routines were created.
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx` error; nothing is persisted when any
    /// row in the forest fails.
    pub async fn insert_routines(&self, routines: &[NewRoutine]) -> Result<usize, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        for routine in routines {
            let routine_id: i64 = sqlx::query_scalar(
                r"
                INSERT INTO routines
                    (name, description, difficulty, session_duration, frequency, image_source)
                VALUES (?, ?, ?, ?, ?, ?)
                RETURNING id
                ",
            )
            .bind(&routine.name)
            .bind(&routine.description)
            .bind(&routine.difficulty)
            .bind(&routine.session_duration)
            .bind(&routine.frequency)
            .bind(&routine.image_source)
            .fetch_one(&mut *tx)
            .await?;

            for week in &routine.weeks {
                let week_id: i64 = sqlx::query_scalar(
                    "INSERT INTO routine_weeks (routine_id, week_number) VALUES (?, ?) RETURNING id",
                )
                .bind(routine_id)
                .bind(week.week_number)
                .fetch_one(&mut *tx)
                .await?;

                for day in &week.days {
                    let day_id: i64 = sqlx::query_scalar(
                        "INSERT INTO routine_days (week_id, day_number) VALUES (?, ?) RETURNING id",
                    )
                    .bind(week_id)
                    .bind(day.day_number)
                    .fetch_one(&mut *tx)
                    .await?;

                    for exercise in &day.exercises {
                        let exercise_row_id: i64 = sqlx::query_scalar(
                            r"
                            INSERT INTO routine_exercises (day_id, exercise_id, position)
                            VALUES (?, ?, ?)
                            RETURNING id
                            ",
                        )
                        .bind(day_id)
                        .bind(exercise.exercise_id)
                        .bind(exercise.position)
                        .fetch_one(&mut *tx)
                        .await?;

                        for set in &exercise.sets {
                            sqlx::query(
                                r"
                                INSERT INTO routine_sets
                                    (routine_exercise_id, set_number, reps, percent_one_rm,
                                     rest_seconds, set_type)
                                VALUES (?, ?, ?, ?, ?, ?)
                                ",
                            )
                            .bind(exercise_row_id)
                            .bind(set.set_number)
                            .bind(set.reps)
                            .bind(set.percent_one_rm)
                            .bind(set.rest_seconds)
                            .bind(set.set_type.as_str())
                            .execute(&mut *tx)
                            .await?;
                        }
                    }
                }
            }
        }

        tx.commit().await?;
        Ok(routines.len())
    }

    /// Fetch one page of routine summaries ordered by name, returning the
    /// items and the total match count.
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx` error on query failure.
    pub async fn list(
        &self,
        params: &PaginationParams,
    ) -> Result<(Vec<RoutineSummary>, i64), sqlx::Error> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM routines")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query(&format!("{SUMMARY_QUERY} ORDER BY name LIMIT ? OFFSET ?"))
            .bind(i64::from(params.page_size()))
            .bind(i64::from(params.offset()))
            .fetch_all(&self.pool)
            .await?;

        Ok((rows.iter().map(row_to_summary).collect(), total))
    }

    /// Fetch a full routine tree by id
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx` error on query failure.
    pub async fn get(&self, id: i64) -> Result<Option<Routine>, sqlx::Error> {
        let row = sqlx::query(&format!("{SUMMARY_QUERY} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let summary = row_to_summary(&row);

        let weeks = self.load_weeks(id).await?;

        Ok(Some(Routine {
            id: summary.id,
            name: summary.name,
            description: summary.description,
            difficulty: summary.difficulty,
            session_duration: summary.session_duration,
            frequency: summary.frequency,
            image_source: summary.image_source,
            created_at: summary.created_at,
            weeks,
        }))
    }

    async fn load_weeks(&self, routine_id: i64) -> Result<Vec<RoutineWeek>, sqlx::Error> {
        let week_rows = sqlx::query(
            "SELECT id, week_number FROM routine_weeks WHERE routine_id = ? ORDER BY week_number",
        )
        .bind(routine_id)
        .fetch_all(&self.pool)
        .await?;

        let mut weeks = Vec::with_capacity(week_rows.len());
        for week_row in &week_rows {
            let week_id: i64 = week_row.get("id");
            weeks.push(RoutineWeek {
                id: week_id,
                week_number: week_row.get("week_number"),
                days: self.load_days(week_id).await?,
            });
        }
        Ok(weeks)
    }

    async fn load_days(&self, week_id: i64) -> Result<Vec<RoutineDay>, sqlx::Error> {
        let day_rows = sqlx::query(
            "SELECT id, day_number FROM routine_days WHERE week_id = ? ORDER BY day_number",
        )
        .bind(week_id)
        .fetch_all(&self.pool)
        .await?;

        let mut days = Vec::with_capacity(day_rows.len());
        for day_row in &day_rows {
            let day_id: i64 = day_row.get("id");
            days.push(RoutineDay {
                id: day_id,
                day_number: day_row.get("day_number"),
                exercises: self.load_exercises(day_id).await?,
            });
        }
        Ok(days)
    }

    async fn load_exercises(&self, day_id: i64) -> Result<Vec<RoutineExercise>, sqlx::Error> {
        let exercise_rows = sqlx::query(
            r"
            SELECT re.id, re.exercise_id, re.position, e.name AS exercise_name
            FROM routine_exercises re
            JOIN exercises e ON e.id = re.exercise_id
            WHERE re.day_id = ?
            ORDER BY re.position
            ",
        )
        .bind(day_id)
        .fetch_all(&self.pool)
        .await?;

        let mut exercises = Vec::with_capacity(exercise_rows.len());
        for exercise_row in &exercise_rows {
            let slot_id: i64 = exercise_row.get("id");
            exercises.push(RoutineExercise {
                id: slot_id,
                exercise_id: exercise_row.get("exercise_id"),
                exercise_name: exercise_row.get("exercise_name"),
                position: exercise_row.get("position"),
                sets: self.load_sets(slot_id).await?,
            });
        }
        Ok(exercises)
    }

    async fn load_sets(&self, routine_exercise_id: i64) -> Result<Vec<RoutineSet>, sqlx::Error> {
        let set_rows = sqlx::query(
            r"
            SELECT id, set_number, reps, percent_one_rm, rest_seconds, set_type
            FROM routine_sets
            WHERE routine_exercise_id = ?
            ORDER BY set_number
            ",
        )
        .bind(routine_exercise_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(set_rows
            .iter()
            .map(|row| {
                let set_type: String = row.get("set_type");
                RoutineSet {
                    id: row.get("id"),
                    set_number: row.get("set_number"),
                    reps: row.get("reps"),
                    percent_one_rm: row.get("percent_one_rm"),
                    rest_seconds: row.get("rest_seconds"),
                    set_type: SetType::parse(&set_type),
                }
            })
            .collect())
    }
}

const SUMMARY_QUERY: &str = r"
    SELECT id, name, description, difficulty, session_duration, frequency, image_source, created_at
    FROM routines
";

fn row_to_summary(row: &SqliteRow) -> RoutineSummary {
    RoutineSummary {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        difficulty: row.get("difficulty"),
        session_duration: row.get("session_duration"),
        frequency: row.get("frequency"),
        image_source: row.get("image_source"),
        created_at: parse_timestamp(row.get("created_at")),
    }
}
