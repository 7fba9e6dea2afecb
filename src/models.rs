// ABOUTME: Domain entities for exercises, muscle taxonomy, and routine trees
// ABOUTME: Includes staged (not yet persisted) variants used by the import pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

//! Domain data structures shared by storage, the import pipeline, and the
//! REST surface.
//!
//! Ownership is unidirectional throughout: parents hold ordered collections
//! of children, children carry only non-owning parent ids. Staged (`New*`)
//! variants describe fully validated rows queued for persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A muscle group (e.g. "Legs"), created lazily during import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuscleGroup {
    /// Unique identifier
    pub id: i64,
    /// Unique display name, stored in original case
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A specific muscle (e.g. "Quadriceps"), created lazily during import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Muscle {
    /// Unique identifier
    pub id: i64,
    /// Unique display name, stored in original case
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// An exercise projected with muscle names resolved, for query responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDetail {
    /// Unique identifier
    pub id: i64,
    /// Exercise name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Muscle group name
    pub muscle_group: String,
    /// Primary muscle name
    pub primary_muscle: String,
    /// Secondary muscle names
    pub secondary_muscles: Vec<String>,
}

/// A fully validated exercise staged for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExercise {
    /// Name in original case
    pub name: String,
    /// Description, defaulted when the candidate record omitted one
    pub description: String,
    /// Resolved muscle group id
    pub muscle_group_id: i64,
    /// Resolved primary muscle id
    pub primary_muscle_id: i64,
    /// Resolved secondary muscle ids, deduplicated, primary excluded
    pub secondary_muscle_ids: Vec<i64>,
}

/// Set-type tag for a routine set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SetType {
    /// A plain working set
    #[default]
    Normal,
    /// Weight reduced mid-set without rest
    DropSet,
    /// Short intra-set pauses
    Cluster,
    /// Activation set followed by mini-sets
    MyoReps,
    /// Eccentric-only repetitions
    Negatives,
    /// Max rep test at a given load
    MaxRm,
}

impl SetType {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::DropSet => "drop_set",
            Self::Cluster => "cluster",
            Self::MyoReps => "myo_reps",
            Self::Negatives => "negatives",
            Self::MaxRm => "max_rm",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "drop_set" => Self::DropSet,
            "cluster" => Self::Cluster,
            "myo_reps" => Self::MyoReps,
            "negatives" => Self::Negatives,
            "max_rm" => Self::MaxRm,
            _ => Self::Normal,
        }
    }
}

/// Routine summary without the week/day/set tree, for list responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineSummary {
    /// Unique identifier
    pub id: i64,
    /// Unique routine name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Free-text difficulty label
    pub difficulty: String,
    /// Free-text expected session duration
    pub session_duration: String,
    /// Free-text training frequency
    pub frequency: String,
    /// Image reference for clients
    pub image_source: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A full routine tree as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    /// Unique identifier
    pub id: i64,
    /// Unique routine name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Free-text difficulty label
    pub difficulty: String,
    /// Free-text expected session duration
    pub session_duration: String,
    /// Free-text training frequency
    pub frequency: String,
    /// Image reference for clients
    pub image_source: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Ordered weeks
    pub weeks: Vec<RoutineWeek>,
}

/// One week of a routine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineWeek {
    /// Unique identifier
    pub id: i64,
    /// 1-based position within the routine
    pub week_number: i64,
    /// Ordered days
    pub days: Vec<RoutineDay>,
}

/// One day of a routine week
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineDay {
    /// Unique identifier
    pub id: i64,
    /// 1-based position within the week
    pub day_number: i64,
    /// Ordered exercises
    pub exercises: Vec<RoutineExercise>,
}

/// One exercise slot inside a routine day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineExercise {
    /// Unique identifier
    pub id: i64,
    /// Referenced exercise row
    pub exercise_id: i64,
    /// Referenced exercise name, resolved for responses
    pub exercise_name: String,
    /// 1-based position within the day
    pub position: i64,
    /// Ordered sets
    pub sets: Vec<RoutineSet>,
}

/// One prescribed set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineSet {
    /// Unique identifier
    pub id: i64,
    /// 1-based position within the exercise
    pub set_number: i64,
    /// Prescribed repetitions, when given
    pub reps: Option<i64>,
    /// Prescribed percentage of one-rep max, when given
    pub percent_one_rm: Option<i64>,
    /// Rest before the next set, in whole seconds
    pub rest_seconds: Option<i64>,
    /// Set-type tag
    pub set_type: SetType,
}

/// A staged routine tree queued for single-transaction persistence
#[derive(Debug, Clone)]
pub struct NewRoutine {
    pub name: String,
    pub description: String,
    pub difficulty: String,
    pub session_duration: String,
    pub frequency: String,
    pub image_source: String,
    pub weeks: Vec<NewRoutineWeek>,
}

/// A staged routine week
#[derive(Debug, Clone)]
pub struct NewRoutineWeek {
    pub week_number: i64,
    pub days: Vec<NewRoutineDay>,
}

/// A staged routine day
#[derive(Debug, Clone)]
pub struct NewRoutineDay {
    pub day_number: i64,
    pub exercises: Vec<NewRoutineExercise>,
}

/// A staged routine exercise slot
#[derive(Debug, Clone)]
pub struct NewRoutineExercise {
    pub exercise_id: i64,
    pub position: i64,
    pub sets: Vec<NewRoutineSet>,
}

/// A staged prescribed set
#[derive(Debug, Clone)]
pub struct NewRoutineSet {
    pub set_number: i64,
    pub reps: Option<i64>,
    pub percent_one_rm: Option<i64>,
    pub rest_seconds: Option<i64>,
    pub set_type: SetType,
}

/// Parse a rest-duration text field of the form `h:mm` or `h:mm:ss` into
/// whole seconds.
///
/// Minutes and seconds must be below 60. Anything else (missing colons,
/// non-numeric components, out-of-range values) returns `None`.
#[must_use]
pub fn parse_rest_duration(text: &str) -> Option<i64> {
    let mut parts = text.trim().split(':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds: i64 = match parts.next() {
        Some(s) => s.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    if hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return None;
    }
    Some(hours * 3600 + minutes * 60 + seconds)
}
