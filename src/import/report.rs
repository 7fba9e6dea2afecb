// ABOUTME: Import result accumulator collecting counters, warnings, and structured errors
// ABOUTME: Write-only while the pipeline runs, read by the caller once the import returns
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One structured error recorded during an import call
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImportError {
    /// Original position of the offending record, when the error belongs
    /// to a single record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Name of the entity the error refers to, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Human-readable description of what went wrong
    pub message: String,
    /// Diagnostic detail from the underlying failure, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Aggregated outcome of one import call.
///
/// The pipeline only ever writes to this; every derived value is a method
/// so the serialized form stays a plain record of what happened.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// The whole call was aborted; no rows were persisted for it
    pub critical_failure: bool,
    /// Exercises created by this call
    pub exercises_created: u32,
    /// Routines created by this call
    pub routines_created: u32,
    /// Exercises updated by this call
    pub exercises_updated: u32,
    /// Muscles created lazily as reference data
    pub muscles_created: u32,
    /// Muscle groups created lazily as reference data
    pub muscle_groups_created: u32,
    /// Exercises skipped because the name already existed in storage
    pub exercises_omitted: u32,
    /// Structured errors recorded during processing
    pub errors: Vec<ImportError>,
    /// Free-text warnings recorded during processing
    pub warnings: Vec<String>,
    /// Total candidate records attempted
    pub total_processed: u32,
    /// Elapsed wall-clock time in whole milliseconds
    pub duration_ms: u64,
}

impl ImportReport {
    /// Record an error that belongs to no single record
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(ImportError {
            message: message.into(),
            ..ImportError::default()
        });
    }

    /// Record an error against a record's original position
    pub fn add_indexed_error(
        &mut self,
        index: usize,
        name: Option<&str>,
        message: impl Into<String>,
    ) {
        self.errors.push(ImportError {
            index: Some(index),
            name: name.map(str::to_owned),
            message: message.into(),
            detail: None,
        });
    }

    /// Record an indexed error carrying the underlying failure's detail
    pub fn add_detailed_error(
        &mut self,
        index: usize,
        name: Option<&str>,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) {
        self.errors.push(ImportError {
            index: Some(index),
            name: name.map(str::to_owned),
            message: message.into(),
            detail: Some(detail.into()),
        });
    }

    /// Record an error tied to a named entity rather than an index
    pub fn add_named_error(&mut self, name: &str, message: impl Into<String>) {
        self.errors.push(ImportError {
            name: Some(name.to_owned()),
            message: message.into(),
            ..ImportError::default()
        });
    }

    /// Record a free-text warning
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Store the elapsed wall-clock time
    pub fn set_duration(&mut self, elapsed: Duration) {
        self.duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    }

    /// Whether any error was recorded
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether any warning was recorded
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Exercises affected by the call (created + updated)
    #[must_use]
    pub const fn total_exercises_affected(&self) -> u32 {
        self.exercises_created + self.exercises_updated
    }

    /// New rows of any kind created by the call
    #[must_use]
    pub const fn total_records_created(&self) -> u32 {
        self.exercises_created + self.muscles_created + self.muscle_groups_created
    }

    /// Share of processed records that ended up affected, as a percentage.
    /// Zero when nothing was processed.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.total_processed == 0 {
            return 0.0;
        }
        f64::from(self.total_exercises_affected()) * 100.0 / f64::from(self.total_processed)
    }

    /// Elapsed time rendered with the largest applicable unit
    #[must_use]
    pub fn formatted_duration(&self) -> String {
        let millis = self.duration_ms;
        if millis >= 3_600_000 {
            #[allow(clippy::cast_precision_loss)]
            let hours = millis as f64 / 3_600_000.0;
            format!("{hours:.2} hours")
        } else if millis >= 60_000 {
            #[allow(clippy::cast_precision_loss)]
            let minutes = millis as f64 / 60_000.0;
            format!("{minutes:.2} minutes")
        } else if millis >= 1_000 {
            #[allow(clippy::cast_precision_loss)]
            let seconds = millis as f64 / 1_000.0;
            format!("{seconds:.2} seconds")
        } else {
            format!("{millis} ms")
        }
    }
}
