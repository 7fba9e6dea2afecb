// ABOUTME: Typed candidate-record DTOs deserialized from uploaded import payloads
// ABOUTME: Everything is optional or defaulted so validation, not deserialization, rejects bad records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

use crate::models::SetType;
use serde::{Deserialize, Serialize};

/// A by-name reference to another entity inside a candidate record
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NamedRef {
    /// Referenced name; resolved case-insensitively against storage
    #[serde(default)]
    pub name: Option<String>,
}

/// One candidate exercise from an import payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecord {
    /// Exercise name; the global uniqueness key
    #[serde(default)]
    pub name: String,
    /// Free-text description; defaulted from the primary muscle when absent
    #[serde(default)]
    pub description: Option<String>,
    /// Muscle group reference
    #[serde(default)]
    pub muscle_group: Option<NamedRef>,
    /// Primary muscle reference
    #[serde(default)]
    pub primary_muscle: Option<NamedRef>,
    /// Secondary muscle references
    #[serde(default)]
    pub secondary_muscles: Option<Vec<NamedRef>>,
}

/// One candidate routine tree from an import payload.
///
/// Any sequence metadata present in the payload is ignored; positions are
/// reassigned from source-array order at import time.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RoutineRecord {
    /// Routine name
    #[serde(default)]
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Free-text difficulty label
    #[serde(default)]
    pub difficulty: String,
    /// Free-text expected session duration
    #[serde(default)]
    pub session_duration: String,
    /// Free-text training frequency
    #[serde(default)]
    pub frequency: String,
    /// Image reference for clients
    #[serde(default)]
    pub image_source: String,
    /// Candidate weeks in source order
    #[serde(default)]
    pub weeks: Vec<RoutineWeekRecord>,
}

/// One candidate week
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RoutineWeekRecord {
    /// Candidate days in source order
    #[serde(default)]
    pub days: Vec<RoutineDayRecord>,
}

/// One candidate day
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RoutineDayRecord {
    /// Candidate exercise slots in source order
    #[serde(default)]
    pub exercises: Vec<RoutineExerciseRecord>,
}

/// One candidate exercise slot referencing a stored exercise by name
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RoutineExerciseRecord {
    /// Reference to an exercise that must already exist in storage
    #[serde(default)]
    pub exercise: NamedRef,
    /// Candidate sets in source order
    #[serde(default)]
    pub sets: Vec<RoutineSetRecord>,
}

/// One candidate prescribed set
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RoutineSetRecord {
    /// Prescribed repetitions
    #[serde(default)]
    pub reps: Option<i64>,
    /// Prescribed percentage of one-rep max
    #[serde(default)]
    pub percent_one_rm: Option<i64>,
    /// Rest before the next set as `h:mm[:ss]` text
    #[serde(default)]
    pub rest: Option<String>,
    /// Set-type tag
    #[serde(default)]
    pub set_type: SetType,
}
