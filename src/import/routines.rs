// ABOUTME: Routine reconciler importing whole routine trees with all-or-nothing semantics
// ABOUTME: Resolves every referenced exercise name up front, then persists the forest in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

use crate::database::routines::RoutinesManager;
use crate::database::Database;
use crate::import::persister::describe_db_error;
use crate::import::records::{RoutineRecord, RoutineSetRecord};
use crate::import::report::ImportReport;
use crate::models::{
    parse_rest_duration, NewRoutine, NewRoutineDay, NewRoutineExercise, NewRoutineSet,
    NewRoutineWeek,
};
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{error, info, warn};

/// Imports candidate routine trees.
///
/// A routine with a missing exercise reference is not a valid domain
/// object, so this path is all-or-nothing: either every referenced
/// exercise resolves and the full forest persists in one transaction, or
/// nothing is written.
pub struct RoutineImporter {
    routines: RoutinesManager,
}

impl RoutineImporter {
    /// Create an importer over the given database
    #[must_use]
    pub fn new(database: &Database) -> Self {
        Self {
            routines: RoutinesManager::new(database.pool().clone()),
        }
    }

    /// Run the routine import pipeline. Always returns a report; when the
    /// critical-failure flag is set, zero routines were persisted.
    pub async fn import(&self, records: &[RoutineRecord]) -> ImportReport {
        let started = Instant::now();
        let mut report = ImportReport {
            total_processed: u32::try_from(records.len()).unwrap_or(u32::MAX),
            ..ImportReport::default()
        };

        info!("Starting import of {} routine records", records.len());

        let referenced = referenced_exercise_names(records);
        let resolved = match self.routines.exercise_ids_by_names(&referenced).await {
            Ok(map) => map,
            Err(err) => {
                report.critical_failure = true;
                report.add_error(format!("Failed to resolve exercise references: {err}"));
                report.set_duration(started.elapsed());
                return report;
            }
        };

        let mut unresolved = 0_usize;
        for name in &referenced {
            if !resolved.contains_key(&name.to_lowercase()) {
                report.add_named_error(name, "Exercise not found in the database");
                unresolved += 1;
            }
        }
        if unresolved > 0 {
            warn!("Routine import aborted: {unresolved} unresolved exercise references");
            report.critical_failure = true;
            report.set_duration(started.elapsed());
            return report;
        }

        let staged: Vec<NewRoutine> = records
            .iter()
            .map(|record| build_routine(record, &resolved, &mut report))
            .collect();

        match self.routines.insert_routines(&staged).await {
            Ok(created) => {
                report.routines_created = u32::try_from(created).unwrap_or(u32::MAX);
                info!("Routine import committed: {created} routines created");
            }
            Err(err) => {
                error!("Fatal error while saving routines: {err}");
                report.critical_failure = true;
                report.add_error(format!(
                    "Fatal error while saving routines: {}",
                    describe_db_error(&err)
                ));
            }
        }

        report.set_duration(started.elapsed());
        report
    }
}

/// Collect the distinct exercise names referenced anywhere in the forest,
/// trimmed and deduplicated case-insensitively, first spelling wins.
///
/// A slot with a missing or blank name still counts as a reference: it can
/// never resolve against storage, so it aborts the call like any other
/// unknown exercise.
fn referenced_exercise_names(records: &[RoutineRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for record in records {
        for week in &record.weeks {
            for day in &week.days {
                for exercise in &day.exercises {
                    let name = exercise.exercise.name.as_deref().unwrap_or_default().trim();
                    if seen.insert(name.to_lowercase()) {
                        names.push(name.to_owned());
                    }
                }
            }
        }
    }
    names
}

/// Rebuild one candidate tree as staged entities, assigning 1-based
/// positions from source-array order at every level and ignoring any
/// sequence metadata in the input.
fn build_routine(
    record: &RoutineRecord,
    resolved: &HashMap<String, i64>,
    report: &mut ImportReport,
) -> NewRoutine {
    let mut weeks = Vec::with_capacity(record.weeks.len());
    for (week_index, week) in record.weeks.iter().enumerate() {
        let mut days = Vec::with_capacity(week.days.len());
        for (day_index, day) in week.days.iter().enumerate() {
            let mut exercises = Vec::with_capacity(day.exercises.len());
            let mut position = 1_i64;
            for exercise in &day.exercises {
                let name = exercise.exercise.name.as_deref().unwrap_or_default().trim();
                // Unresolvable names abort the call before this point.
                let Some(exercise_id) = resolved.get(&name.to_lowercase()).copied() else {
                    continue;
                };

                exercises.push(NewRoutineExercise {
                    exercise_id,
                    position,
                    sets: build_sets(&exercise.sets, name, report),
                });
                position += 1;
            }
            days.push(NewRoutineDay {
                day_number: to_position(day_index),
                exercises,
            });
        }
        weeks.push(NewRoutineWeek {
            week_number: to_position(week_index),
            days,
        });
    }

    NewRoutine {
        name: record.name.trim().to_owned(),
        description: record.description.clone(),
        difficulty: record.difficulty.clone(),
        session_duration: record.session_duration.clone(),
        frequency: record.frequency.clone(),
        image_source: record.image_source.clone(),
        weeks,
    }
}

/// Build the staged sets for one exercise slot. A rest text that fails to
/// parse drops only its set and records an error against the owning
/// exercise name; sibling sets keep contiguous numbering.
fn build_sets(
    sets: &[RoutineSetRecord],
    exercise_name: &str,
    report: &mut ImportReport,
) -> Vec<NewRoutineSet> {
    let mut staged = Vec::with_capacity(sets.len());
    let mut set_number = 1_i64;
    for set in sets {
        let rest_seconds = match set.rest.as_deref() {
            Some(text) => match parse_rest_duration(text) {
                Some(seconds) => Some(seconds),
                None => {
                    report
                        .add_named_error(exercise_name, format!("Invalid rest duration format: {text}"));
                    continue;
                }
            },
            None => None,
        };

        staged.push(NewRoutineSet {
            set_number,
            reps: set.reps,
            percent_one_rm: set.percent_one_rm,
            rest_seconds,
            set_type: set.set_type,
        });
        set_number += 1;
    }
    staged
}

fn to_position(index: usize) -> i64 {
    i64::try_from(index).map_or(i64::MAX, |i| i + 1)
}
