// ABOUTME: Exercise reconciler validating candidate records against resolved references and storage
// ABOUTME: Detects intra-batch and storage duplicates, stages valid rows, and drives batch persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

use crate::database::exercises::ExercisesManager;
use crate::database::muscles::MusclesManager;
use crate::database::Database;
use crate::import::persister::BatchPersister;
use crate::import::records::ExerciseRecord;
use crate::import::report::ImportReport;
use crate::import::resolver::{
    collect_group_names, collect_muscle_names, resolve_muscle_groups, resolve_muscles,
};
use crate::models::{Muscle, MuscleGroup, NewExercise};
use sqlx::SqlitePool;
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Imports a batch of candidate exercise records end to end.
///
/// Processing is strictly sequential: each record's duplicate and
/// existing-name checks depend on state mutated by the records before it in
/// the same call. All lookup tables are call-scoped.
pub struct ExerciseImporter {
    muscles: MusclesManager,
    exercises: ExercisesManager,
    pool: SqlitePool,
}

impl ExerciseImporter {
    /// Create an importer over the given database
    #[must_use]
    pub fn new(database: &Database) -> Self {
        Self {
            muscles: MusclesManager::new(database.pool().clone()),
            exercises: ExercisesManager::new(database.pool().clone()),
            pool: database.pool().clone(),
        }
    }

    /// Run the full exercise import pipeline: resolve references, validate
    /// each record, stage survivors, and persist them in batches.
    ///
    /// Always returns a report; recoverable problems become report entries
    /// rather than errors.
    pub async fn import(&self, records: &[ExerciseRecord]) -> ImportReport {
        let started = Instant::now();
        let mut report = ImportReport::default();

        info!("Starting import of {} exercise records", records.len());

        let Some((groups, muscles)) = self.resolve_references(records, &mut report).await else {
            report.critical_failure = true;
            report.set_duration(started.elapsed());
            return report;
        };

        let mut existing = match self.exercises.existing_by_name().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                report.critical_failure = true;
                report.add_error(format!("Failed to load existing exercises: {err}"));
                report.set_duration(started.elapsed());
                return report;
            }
        };

        let duplicates = duplicate_indices(records);

        let mut staged: Vec<(NewExercise, usize)> = Vec::new();
        for (index, record) in records.iter().enumerate() {
            report.total_processed += 1;

            if duplicates.contains(&index) {
                warn!("Duplicate exercise in payload at index {index}: {}", record.name);
                report.add_warning(format!("Duplicate exercise omitted: {}", record.name.trim()));
                continue;
            }

            if let Some(exercise) = self
                .validate_record(record, index, &groups, &muscles, &mut existing, &mut report)
                .await
            {
                staged.push((exercise, index));
            }
        }

        info!(
            "Validation completed. {} records processed, {} staged for persistence",
            report.total_processed,
            staged.len()
        );

        BatchPersister::new(&self.exercises, &self.pool)
            .persist(&staged, &mut report)
            .await;

        report.set_duration(started.elapsed());
        info!(
            "Import completed in {}. Created: {}, omitted: {}, errors: {}",
            report.formatted_duration(),
            report.exercises_created,
            report.exercises_omitted,
            report.errors.len()
        );

        report
    }

    /// Load reference snapshots and resolve every candidate group and
    /// muscle name. Returns `None` when a snapshot cannot be loaded at all,
    /// which aborts the call.
    async fn resolve_references(
        &self,
        records: &[ExerciseRecord],
        report: &mut ImportReport,
    ) -> Option<(HashMap<String, MuscleGroup>, HashMap<String, Muscle>)> {
        let group_names = collect_group_names(records);
        let muscle_names = collect_muscle_names(records);

        info!(
            "Resolving {} muscle groups and {} muscles",
            group_names.len(),
            muscle_names.len()
        );

        let group_snapshot = match self.muscles.groups_by_name().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                report.add_error(format!("Failed to load muscle groups: {err}"));
                return None;
            }
        };
        let muscle_snapshot = match self.muscles.muscles_by_name().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                report.add_error(format!("Failed to load muscles: {err}"));
                return None;
            }
        };

        let groups =
            resolve_muscle_groups(&self.muscles, &group_names, &group_snapshot, report).await;
        let muscles = resolve_muscles(&self.muscles, &muscle_names, &muscle_snapshot, report).await;

        Some((groups, muscles))
    }

    /// Run the per-record validation pipeline, short-circuiting on the
    /// first failure. Returns the staged entity when the record survives.
    async fn validate_record(
        &self,
        record: &ExerciseRecord,
        index: usize,
        groups: &HashMap<String, MuscleGroup>,
        muscles: &HashMap<String, Muscle>,
        existing: &mut HashMap<String, i64>,
        report: &mut ImportReport,
    ) -> Option<NewExercise> {
        let name = record.name.trim();
        if name.is_empty() {
            report.add_indexed_error(index, None, "Exercise name is empty");
            return None;
        }

        let group_name = named(record.muscle_group.as_ref());
        let Some(group_name) = group_name else {
            report.add_indexed_error(index, Some(name), "No muscle group specified");
            return None;
        };

        let primary_name = named(record.primary_muscle.as_ref());
        let Some(primary_name) = primary_name else {
            report.add_indexed_error(index, Some(name), "No primary muscle specified");
            return None;
        };

        let Some(group) = groups.get(&group_name.to_lowercase()) else {
            report.add_indexed_error(
                index,
                Some(name),
                format!("Muscle group '{group_name}' not found"),
            );
            return None;
        };

        let Some(primary) = muscles.get(&primary_name.to_lowercase()) else {
            report.add_indexed_error(
                index,
                Some(name),
                format!("Primary muscle '{primary_name}' not found"),
            );
            return None;
        };

        let normalized = name.to_lowercase();
        if existing.contains_key(&normalized) {
            report.exercises_omitted += 1;
            debug!("Exercise {name} already exists, omitting");
            return None;
        }

        let exercise = build_exercise(record, name, group, primary, muscles);

        if let Err(violation) = self.validate_staged(&exercise).await {
            report.add_indexed_error(index, Some(name), format!("Validation failed: {violation}"));
            return None;
        }

        debug!("Exercise {name} passed all validations");
        // Later same-name records in this call must hit the existing check,
        // so the snapshot grows before anything is persisted.
        existing.insert(normalized, 0);

        Some(exercise)
    }

    /// Re-validate a staged entity directly against storage before it is
    /// queued for persistence. The first violation wins; each produces a
    /// distinct message.
    async fn validate_staged(&self, exercise: &NewExercise) -> Result<(), String> {
        if exercise.name.trim().is_empty() {
            return Err("Exercise name is empty".into());
        }
        if exercise.muscle_group_id <= 0 {
            return Err("Invalid muscle group (id must be positive)".into());
        }
        if exercise.primary_muscle_id <= 0 {
            return Err("Invalid primary muscle (id must be positive)".into());
        }

        // Race check straight against storage, not the call-scoped snapshot.
        match self.exercises.name_exists(&exercise.name).await {
            Ok(true) => {
                return Err(format!(
                    "Exercise '{}' already exists in the database",
                    exercise.name
                ));
            }
            Ok(false) => {}
            Err(err) => return Err(err.to_string()),
        }

        match self.muscles.group_exists(exercise.muscle_group_id).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(format!(
                    "Muscle group with id {} does not exist",
                    exercise.muscle_group_id
                ));
            }
            Err(err) => return Err(err.to_string()),
        }

        match self.muscles.muscle_exists(exercise.primary_muscle_id).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(format!(
                    "Primary muscle with id {} does not exist",
                    exercise.primary_muscle_id
                ));
            }
            Err(err) => return Err(err.to_string()),
        }

        let mut seen = HashSet::new();
        for muscle_id in &exercise.secondary_muscle_ids {
            match self.muscles.muscle_exists(*muscle_id).await {
                Ok(true) => {}
                Ok(false) => {
                    return Err(format!("Secondary muscle with id {muscle_id} does not exist"));
                }
                Err(err) => return Err(err.to_string()),
            }
            if *muscle_id == exercise.primary_muscle_id {
                return Err("A secondary muscle must not equal the primary muscle".into());
            }
            if !seen.insert(*muscle_id) {
                return Err("Duplicate secondary muscles".into());
            }
        }

        Ok(())
    }
}

/// Extract a trimmed, non-empty name from an optional reference
fn named(reference: Option<&crate::import::records::NamedRef>) -> Option<&str> {
    reference
        .and_then(|r| r.name.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty())
}

/// Construct the staged entity for a validated record. The description
/// defaults from the primary muscle; secondary muscles resolve by name and
/// silently drop unresolved names, the primary, and repeats.
fn build_exercise(
    record: &ExerciseRecord,
    name: &str,
    group: &MuscleGroup,
    primary: &Muscle,
    muscles: &HashMap<String, Muscle>,
) -> NewExercise {
    let description = record
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map_or_else(|| format!("Exercise for {}", primary.name), str::to_owned);

    let mut secondary_muscle_ids = Vec::new();
    let mut seen = HashSet::new();
    if let Some(secondaries) = record.secondary_muscles.as_deref() {
        for secondary in secondaries {
            let Some(secondary_name) = secondary.name.as_deref().map(str::trim) else {
                continue;
            };
            if secondary_name.is_empty() {
                continue;
            }
            if let Some(muscle) = muscles.get(&secondary_name.to_lowercase()) {
                if muscle.id != primary.id && seen.insert(muscle.id) {
                    secondary_muscle_ids.push(muscle.id);
                }
            }
        }
    }

    NewExercise {
        name: name.to_owned(),
        description,
        muscle_group_id: group.id,
        primary_muscle_id: primary.id,
        secondary_muscle_ids,
    }
}

/// Pre-scan the payload for intra-batch duplicates: every later record
/// whose trimmed, lowercased name was already seen is flagged.
fn duplicate_indices(records: &[ExerciseRecord]) -> HashSet<usize> {
    let mut seen = HashSet::new();
    let mut duplicates = HashSet::new();
    for (index, record) in records.iter().enumerate() {
        let name = record.name.trim();
        if name.is_empty() {
            continue;
        }
        if !seen.insert(name.to_lowercase()) {
            duplicates.insert(index);
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::records::NamedRef;

    fn record(name: &str) -> ExerciseRecord {
        ExerciseRecord {
            name: name.into(),
            ..ExerciseRecord::default()
        }
    }

    #[test]
    fn flags_later_occurrences_of_equivalent_names() {
        let records = vec![
            record("Squat"),
            record("squat"),
            record("  SQUAT "),
            record("Deadlift"),
        ];
        let duplicates = duplicate_indices(&records);
        assert_eq!(duplicates, HashSet::from([1, 2]));
    }

    #[test]
    fn blank_names_are_never_duplicates() {
        let records = vec![record(""), record("  "), record("Row")];
        assert!(duplicate_indices(&records).is_empty());
    }

    #[test]
    fn builds_defaults_and_dedups_secondaries() {
        let group = MuscleGroup {
            id: 1,
            name: "Legs".into(),
            created_at: chrono::Utc::now(),
        };
        let primary = Muscle {
            id: 10,
            name: "Quadriceps".into(),
            created_at: chrono::Utc::now(),
        };
        let glutes = Muscle {
            id: 11,
            name: "Glutes".into(),
            created_at: chrono::Utc::now(),
        };
        let muscles = HashMap::from([
            ("quadriceps".to_owned(), primary.clone()),
            ("glutes".to_owned(), glutes),
        ]);

        let mut candidate = record("Squat");
        candidate.secondary_muscles = Some(vec![
            NamedRef {
                name: Some("Glutes".into()),
            },
            NamedRef {
                name: Some("glutes".into()),
            },
            NamedRef {
                name: Some("Quadriceps".into()),
            },
            NamedRef {
                name: Some("Unknown".into()),
            },
        ]);

        let exercise = build_exercise(&candidate, "Squat", &group, &primary, &muscles);
        assert_eq!(exercise.description, "Exercise for Quadriceps");
        assert_eq!(exercise.secondary_muscle_ids, vec![11]);
        assert_eq!(exercise.muscle_group_id, 1);
        assert_eq!(exercise.primary_muscle_id, 10);
    }
}
