// ABOUTME: Main library entry point for the Repforge workout tracking backend
// ABOUTME: Exposes exercise and routine storage, query routes, and the bulk import pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

#![deny(unsafe_code)]

//! # Repforge
//!
//! A backend for workout tracking: exercises, muscle taxonomies, and
//! multi-level routines (routine → week → day → exercise → set), with query
//! endpoints and a bulk JSON import pipeline.
//!
//! The import pipeline is the heart of the crate. It reconciles uploaded
//! candidate records against existing storage: reference data (muscle groups
//! and muscles) is created lazily, exercises are validated and deduplicated
//! per record, and staged rows are committed in fixed-size batches with a
//! per-record transactional fallback so one bad row never discards its
//! siblings. Routine imports are all-or-nothing by design.
//!
//! ## Architecture
//!
//! - **models**: Domain entities shared by storage and the import pipeline
//! - **database**: `SQLite` storage managers built on `sqlx`
//! - **import**: Reference resolution, reconciliation, batch persistence,
//!   and the import result report
//! - **routes**: Axum REST surface (queries + multipart upload endpoints)
//! - **config**: Environment-based server configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use repforge::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Repforge configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod database;
pub mod errors;
pub mod import;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod resources;
pub mod routes;
