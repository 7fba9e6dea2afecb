// ABOUTME: Routine route handlers for paginated summaries, tree reads, and tree imports
// ABOUTME: Import uploads go through boundary validation, then the all-or-nothing routine pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

use crate::errors::AppError;
use crate::import::records::RoutineRecord;
use crate::import::RoutineImporter;
use crate::pagination::{Page, PaginationParams};
use crate::resources::ServerResources;
use crate::routes::imports::boundary_failure;
use crate::routes::upload::{read_records, validate_upload};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Routine query and import routes
pub struct RoutineRoutes;

impl RoutineRoutes {
    /// Create all routine routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/routines", get(Self::handle_list))
            .route("/api/routines/:id", get(Self::handle_get))
            .route("/api/routines/import", post(Self::handle_import))
            .route(
                "/api/routines/import/validate",
                post(Self::handle_validate),
            )
            .with_state(resources)
    }

    /// Handle the paginated routine summary list
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<PaginationParams>,
    ) -> Result<Response, AppError> {
        let (items, total) = resources.routines.list(&params).await?;
        let page = Page::new(items, total, params.page(), params.page_size());
        Ok(Json(page).into_response())
    }

    /// Handle a full routine tree read
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let routine = resources
            .routines
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Routine {id}")))?;
        Ok(Json(routine).into_response())
    }

    /// Handle a routine import upload. The pipeline is all-or-nothing;
    /// a critical-failure report comes back with a 400 status, anything
    /// else with 200.
    async fn handle_import(
        State(resources): State<Arc<ServerResources>>,
        mut multipart: Multipart,
    ) -> Response {
        let started = Instant::now();

        let records = match read_records::<RoutineRecord>(
            &mut multipart,
            resources.config.max_upload_bytes,
        )
        .await
        {
            Ok(records) => records,
            Err(message) => {
                warn!("Routine import rejected at the boundary: {message}");
                let report = boundary_failure(&message, started);
                return (StatusCode::BAD_REQUEST, Json(report)).into_response();
            }
        };

        let report = RoutineImporter::new(&resources.database)
            .import(&records)
            .await;

        let status = if report.critical_failure {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::OK
        };
        (status, Json(report)).into_response()
    }

    /// Handle a format-only validation upload for routine payloads
    async fn handle_validate(
        State(resources): State<Arc<ServerResources>>,
        mut multipart: Multipart,
    ) -> Response {
        let outcome =
            validate_upload::<RoutineRecord>(&mut multipart, resources.config.max_upload_bytes)
                .await;
        Json(outcome).into_response()
    }
}
