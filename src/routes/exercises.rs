// ABOUTME: Exercise query route handlers for paginated, full, and by-id reads
// ABOUTME: Thin handlers that delegate to the exercises manager and shape responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

use crate::errors::AppError;
use crate::pagination::{Page, PaginationParams};
use crate::resources::ServerResources;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;

/// Exercise query routes
pub struct ExerciseRoutes;

impl ExerciseRoutes {
    /// Create all exercise query routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/exercises", get(Self::handle_list))
            .route("/api/exercises/all", get(Self::handle_list_all))
            .route("/api/exercises/:id", get(Self::handle_get))
            .with_state(resources)
    }

    /// Handle the paginated exercise list with an optional name suffix filter
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<PaginationParams>,
    ) -> Result<Response, AppError> {
        let (items, total) = resources.exercises.list(&params).await?;
        let page = Page::new(items, total, params.page(), params.page_size());
        Ok(Json(page).into_response())
    }

    /// Handle the unpaginated exercise projection list
    async fn handle_list_all(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let items = resources.exercises.list_all().await?;
        Ok(Json(items).into_response())
    }

    /// Handle a single exercise read with muscle names resolved
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let exercise = resources
            .exercises
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Exercise {id}")))?;
        Ok(Json(exercise).into_response())
    }
}
