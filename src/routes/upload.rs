// ABOUTME: Upload boundary validation for multipart JSON import payloads
// ABOUTME: Rejects missing, empty, oversized, or wrongly-named files before any reconciliation runs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

//! Boundary checks for import uploads.
//!
//! Everything here happens before the reconcilers see a single record:
//! malformed files never reach the pipeline, they become a
//! critical-failure report at the HTTP layer.

use axum::extract::Multipart;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Outcome of a format-only validation call; nothing is persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    /// Whether the file parsed as the expected record list
    pub valid: bool,
    /// How many candidate records were detected
    pub record_count: usize,
    /// Human-readable summary
    pub message: String,
}

/// Read the uploaded file from a multipart request and decode it as a
/// JSON array of candidate records.
///
/// # Errors
///
/// Returns a human-readable boundary error when the file is missing,
/// empty, oversized, not named `*.json`, or fails to parse.
pub async fn read_records<T: DeserializeOwned>(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<Vec<T>, String> {
    let field = match multipart.next_field().await {
        Ok(Some(field)) => field,
        Ok(None) => return Err("No file was uploaded".to_owned()),
        Err(err) => return Err(format!("Error reading upload: {err}")),
    };

    let file_name = field.file_name().unwrap_or_default().to_owned();
    if !file_name.to_lowercase().ends_with(".json") {
        warn!("Rejected upload with invalid extension: {file_name}");
        return Err("Invalid file extension".to_owned());
    }

    let bytes = field
        .bytes()
        .await
        .map_err(|err| format!("Error reading upload: {err}"))?;

    if bytes.is_empty() {
        return Err("File is empty".to_owned());
    }
    if bytes.len() > max_bytes {
        let limit_mib = max_bytes / (1024 * 1024);
        return Err(format!("File must not exceed {limit_mib} MiB"));
    }

    let records: Vec<T> = serde_json::from_slice(&bytes)
        .map_err(|err| format!("Invalid JSON: {err}"))?;

    if records.is_empty() {
        return Err("The JSON file is empty or invalid".to_owned());
    }

    Ok(records)
}

/// Run the boundary checks only, without touching storage
pub async fn validate_upload<T: DeserializeOwned>(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> ValidationOutcome {
    match read_records::<T>(multipart, max_bytes).await {
        Ok(records) => ValidationOutcome {
            valid: true,
            record_count: records.len(),
            message: format!("File is valid: {} records detected", records.len()),
        },
        Err(message) => ValidationOutcome {
            valid: false,
            record_count: 0,
            message,
        },
    }
}
