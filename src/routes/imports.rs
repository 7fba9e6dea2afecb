// ABOUTME: Exercise import route handlers for multipart JSON uploads
// ABOUTME: Runs boundary validation, then hands candidate records to the exercise pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

use crate::import::records::ExerciseRecord;
use crate::import::report::ImportReport;
use crate::import::ExerciseImporter;
use crate::resources::ServerResources;
use crate::routes::upload::{read_records, validate_upload};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Exercise import routes
pub struct ImportRoutes;

impl ImportRoutes {
    /// Create all exercise import routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/imports", post(Self::handle_import))
            .route("/api/imports/validate", post(Self::handle_validate))
            .with_state(resources)
    }

    /// Handle an exercise import upload. Boundary failures return 400 with
    /// a critical-failure report; everything else returns 201 with the
    /// pipeline's report.
    async fn handle_import(
        State(resources): State<Arc<ServerResources>>,
        mut multipart: Multipart,
    ) -> Response {
        let started = Instant::now();

        let records = match read_records::<ExerciseRecord>(
            &mut multipart,
            resources.config.max_upload_bytes,
        )
        .await
        {
            Ok(records) => records,
            Err(message) => {
                warn!("Exercise import rejected at the boundary: {message}");
                let report = boundary_failure(&message, started);
                return (StatusCode::BAD_REQUEST, Json(report)).into_response();
            }
        };

        let report = ExerciseImporter::new(&resources.database)
            .import(&records)
            .await;

        let status = if report.critical_failure {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::CREATED
        };
        (status, Json(report)).into_response()
    }

    /// Handle a format-only validation upload; never persists anything
    async fn handle_validate(
        State(resources): State<Arc<ServerResources>>,
        mut multipart: Multipart,
    ) -> Response {
        let outcome =
            validate_upload::<ExerciseRecord>(&mut multipart, resources.config.max_upload_bytes)
                .await;
        Json(outcome).into_response()
    }
}

/// Build the critical-failure report returned for boundary rejections
pub(crate) fn boundary_failure(message: &str, started: Instant) -> ImportReport {
    let mut report = ImportReport {
        critical_failure: true,
        ..ImportReport::default()
    };
    report.add_error(format!("Error processing file: {message}"));
    report.set_duration(started.elapsed());
    report
}
