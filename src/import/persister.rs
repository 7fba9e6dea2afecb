// ABOUTME: Batch persister committing staged exercises in fixed-size chunks
// ABOUTME: Falls back to one transaction per record when a chunk hits a constraint failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

use crate::constants::limits;
use crate::database::exercises::ExercisesManager;
use crate::import::report::ImportReport;
use crate::models::NewExercise;
use sqlx::error::ErrorKind;
use sqlx::SqlitePool;
use tracing::{debug, error, info, warn};

/// Closed classification of storage constraint failures.
///
/// The reconciler only ever branches on this enum, never on engine-specific
/// error codes, so any backend's driver can map into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Unique or primary-key violation
    Unique,
    /// Foreign-key violation
    ForeignKey,
    /// Check-constraint violation
    Check,
    /// Some other database-reported failure
    Other,
}

impl ConstraintKind {
    /// Classify a `sqlx` error, returning `None` for errors that did not
    /// come from the database at all (I/O, pool, decoding).
    #[must_use]
    pub fn classify(err: &sqlx::Error) -> Option<Self> {
        let db_err = err.as_database_error()?;
        Some(match db_err.kind() {
            ErrorKind::UniqueViolation => Self::Unique,
            ErrorKind::ForeignKeyViolation => Self::ForeignKey,
            ErrorKind::CheckViolation => Self::Check,
            _ => Self::Other,
        })
    }

    /// Whether this is one of the constraint classes that trigger the
    /// per-record fallback tier
    #[must_use]
    pub const fn is_constraint(self) -> bool {
        matches!(self, Self::Unique | Self::ForeignKey | Self::Check)
    }
}

/// Translate a storage error into a human-readable message, distinguishing
/// the constraint classes and including the engine-reported code otherwise.
#[must_use]
pub fn describe_db_error(err: &sqlx::Error) -> String {
    let Some(db_err) = err.as_database_error() else {
        return err.to_string();
    };

    match ConstraintKind::classify(err) {
        Some(ConstraintKind::Unique) => format!("Uniqueness violation: {}", db_err.message()),
        Some(ConstraintKind::ForeignKey) => {
            format!("Foreign key not found: {}", db_err.message())
        }
        Some(ConstraintKind::Check) => {
            format!("Check constraint violated: {}", db_err.message())
        }
        _ => {
            let code = db_err.code().unwrap_or_default();
            format!("Database error ({code}): {}", db_err.message())
        }
    }
}

/// Commits staged exercises in fixed-size chunks with per-record fallback.
///
/// Bulk commits are fast but opaque about which row failed; when a chunk
/// hits a constraint failure every record in it is retried in its own
/// transaction so the failure is attributed to exactly the offending rows
/// while the rest of the chunk still persists.
pub struct BatchPersister<'a> {
    exercises: &'a ExercisesManager,
    pool: &'a SqlitePool,
}

impl<'a> BatchPersister<'a> {
    /// Create a persister writing through the given manager and pool
    #[must_use]
    pub const fn new(exercises: &'a ExercisesManager, pool: &'a SqlitePool) -> Self {
        Self { exercises, pool }
    }

    /// Persist staged `(entity, original index)` pairs in chunks of
    /// [`limits::IMPORT_BATCH_SIZE`], recording every outcome on the report.
    /// One failing record never discards its siblings.
    pub async fn persist(&self, staged: &[(NewExercise, usize)], report: &mut ImportReport) {
        for (chunk_number, chunk) in staged.chunks(limits::IMPORT_BATCH_SIZE).enumerate() {
            match self.commit_chunk(chunk).await {
                Ok(()) => {
                    report.exercises_created += u32::try_from(chunk.len()).unwrap_or(u32::MAX);
                    info!(
                        "Batch {} committed: {} exercises created",
                        chunk_number + 1,
                        chunk.len()
                    );
                }
                Err(err)
                    if ConstraintKind::classify(&err).is_some_and(ConstraintKind::is_constraint) =>
                {
                    warn!(
                        "Batch {} failed ({}), retrying records individually",
                        chunk_number + 1,
                        describe_db_error(&err)
                    );
                    self.persist_individually(chunk, report).await;
                }
                Err(err) => {
                    error!("Unexpected error committing batch {}: {err}", chunk_number + 1);
                    for (exercise, index) in chunk {
                        report.add_indexed_error(
                            *index,
                            Some(&exercise.name),
                            format!("Unexpected error while saving batch: {err}"),
                        );
                    }
                }
            }
        }
    }

    /// Insert a whole chunk inside one transaction
    async fn commit_chunk(&self, chunk: &[(NewExercise, usize)]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for (exercise, _) in chunk {
            self.exercises.insert(&mut *tx, exercise).await?;
        }
        tx.commit().await
    }

    /// Retry every record of a failed chunk in its own transaction.
    ///
    /// Each attempt starts from a fresh transaction, which is the write-state
    /// reset between attempts; a failing record rolls back alone.
    async fn persist_individually(
        &self,
        chunk: &[(NewExercise, usize)],
        report: &mut ImportReport,
    ) {
        for (exercise, index) in chunk {
            match self.commit_one(exercise).await {
                Ok(()) => {
                    report.exercises_created += 1;
                    debug!("Exercise created individually: {}", exercise.name);
                }
                Err(err) if err.as_database_error().is_some() => {
                    let message = describe_db_error(&err);
                    error!(
                        "Failed to save exercise at index {index} individually: {} - {message}",
                        exercise.name
                    );
                    report.add_detailed_error(
                        *index,
                        Some(&exercise.name),
                        format!("Database error while saving: {message}"),
                        err.to_string(),
                    );
                }
                Err(err) => {
                    error!(
                        "Unexpected error saving exercise individually: {}",
                        exercise.name
                    );
                    report.add_indexed_error(
                        *index,
                        Some(&exercise.name),
                        format!("Unexpected error: {err}"),
                    );
                }
            }
        }
    }

    async fn commit_one(&self, exercise: &NewExercise) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        match self.exercises.insert(&mut *tx, exercise).await {
            Ok(_) => tx.commit().await,
            Err(err) => {
                tx.rollback().await.ok();
                Err(err)
            }
        }
    }
}
