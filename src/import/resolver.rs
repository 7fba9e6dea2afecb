// ABOUTME: Reference resolver classifying candidate muscle and muscle-group names as existing or new
// ABOUTME: Creates missing reference data lazily and reports created counts through the accumulator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

use crate::database::muscles::MusclesManager;
use crate::import::records::ExerciseRecord;
use crate::import::report::ImportReport;
use crate::models::{Muscle, MuscleGroup};
use std::collections::{HashMap, HashSet};
use tracing::{debug, error, info};

/// Collect the distinct muscle-group names referenced by a batch of
/// candidate exercises: trimmed, deduplicated case-insensitively with the
/// first spelling winning, in source order.
#[must_use]
pub fn collect_group_names(records: &[ExerciseRecord]) -> Vec<String> {
    dedup_names(
        records
            .iter()
            .filter_map(|r| r.muscle_group.as_ref())
            .filter_map(|g| g.name.as_deref()),
    )
}

/// Collect the distinct muscle names referenced by a batch of candidate
/// exercises, primaries before secondaries, deduplicated the same way as
/// [`collect_group_names`].
#[must_use]
pub fn collect_muscle_names(records: &[ExerciseRecord]) -> Vec<String> {
    let primaries = records
        .iter()
        .filter_map(|r| r.primary_muscle.as_ref())
        .filter_map(|m| m.name.as_deref());
    let secondaries = records
        .iter()
        .filter_map(|r| r.secondary_muscles.as_deref())
        .flatten()
        .filter_map(|m| m.name.as_deref());

    dedup_names(primaries.chain(secondaries))
}

fn dedup_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for name in names.map(str::trim).filter(|n| !n.is_empty()) {
        if seen.insert(name.to_lowercase()) {
            out.push(name.to_owned());
        }
    }
    out
}

/// Resolve every candidate muscle-group name to a stored entity, creating
/// groups that are absent from the snapshot.
///
/// Resolution is independent per name: a creation failure is recorded as an
/// un-indexed error and the remaining names still resolve. The returned map
/// is keyed by lowercase name and covers every input name that resolved.
pub async fn resolve_muscle_groups(
    manager: &MusclesManager,
    names: &[String],
    snapshot: &HashMap<String, MuscleGroup>,
    report: &mut ImportReport,
) -> HashMap<String, MuscleGroup> {
    let mut resolved = HashMap::new();
    let mut created = 0_usize;

    for name in names {
        let key = name.to_lowercase();
        if let Some(existing) = snapshot.get(&key) {
            resolved.insert(key, existing.clone());
            continue;
        }

        match manager.create_group(name).await {
            Ok(group) => {
                debug!("Created muscle group: {}", group.name);
                resolved.insert(key, group);
                report.muscle_groups_created += 1;
                created += 1;
            }
            Err(err) => {
                error!("Failed to create muscle group '{name}': {err}");
                report.add_error(format!("Failed to create muscle group '{name}': {err}"));
            }
        }
    }

    info!(
        "Muscle groups processed. Existing: {}, new: {created}",
        snapshot.len()
    );
    resolved
}

/// Resolve every candidate muscle name to a stored entity, creating muscles
/// that are absent from the snapshot. Same failure semantics as
/// [`resolve_muscle_groups`].
pub async fn resolve_muscles(
    manager: &MusclesManager,
    names: &[String],
    snapshot: &HashMap<String, Muscle>,
    report: &mut ImportReport,
) -> HashMap<String, Muscle> {
    let mut resolved = HashMap::new();
    let mut created = 0_usize;

    for name in names {
        let key = name.to_lowercase();
        if let Some(existing) = snapshot.get(&key) {
            resolved.insert(key, existing.clone());
            continue;
        }

        match manager.create_muscle(name).await {
            Ok(muscle) => {
                debug!("Created muscle: {}", muscle.name);
                resolved.insert(key, muscle);
                report.muscles_created += 1;
                created += 1;
            }
            Err(err) => {
                error!("Failed to create muscle '{name}': {err}");
                report.add_error(format!("Failed to create muscle '{name}': {err}"));
            }
        }
    }

    info!(
        "Muscles processed. Existing: {}, new: {created}",
        snapshot.len()
    );
    resolved
}
