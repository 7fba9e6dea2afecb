// ABOUTME: Route module organization for the Repforge HTTP surface
// ABOUTME: Assembles domain routers and the shared tower-http middleware stack
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

//! Route module for the Repforge server.
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the managers and the import pipeline.

/// Exercise query routes
pub mod exercises;
/// Exercise import routes
pub mod imports;
/// Routine query and import routes
pub mod routines;
/// Multipart upload boundary validation
pub mod upload;

pub use exercises::ExerciseRoutes;
pub use imports::ImportRoutes;
pub use routines::RoutineRoutes;

use crate::resources::ServerResources;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Assemble the full application router with the shared middleware stack
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let max_upload_bytes = resources.config.max_upload_bytes;

    async fn health_handler() -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    Router::new()
        .merge(ExerciseRoutes::routes(resources.clone()))
        .merge(ImportRoutes::routes(resources.clone()))
        .merge(RoutineRoutes::routes(resources))
        .route("/health", get(health_handler))
        // The multipart framing adds overhead on top of the file itself,
        // so the transport limit sits above the per-file limit enforced
        // in the upload module.
        .layer(DefaultBodyLimit::max(max_upload_bytes + 64 * 1024))
        .layer(RequestBodyLimitLayer::new(max_upload_bytes + 64 * 1024))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
