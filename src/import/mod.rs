// ABOUTME: Bulk import pipeline reconciling uploaded exercises and routines against storage
// ABOUTME: Groups the resolver, reconcilers, batch persister, and the import result report
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

//! # Import Pipeline
//!
//! Reconciles uploaded JSON payloads against existing storage.
//!
//! Control flow: candidate records → [`resolver`] (reference data created
//! lazily) → [`ExerciseImporter`] / [`RoutineImporter`] →
//! [`BatchPersister`] → [`ImportReport`].
//!
//! Exercise imports are best-effort per record: one bad row never discards
//! its siblings, and a chunk-level constraint failure falls back to
//! per-record transactions for precise attribution. Routine imports are
//! all-or-nothing: every referenced exercise must already exist or nothing
//! is persisted.

pub mod exercises;
pub mod persister;
pub mod records;
pub mod report;
pub mod resolver;
pub mod routines;

pub use exercises::ExerciseImporter;
pub use persister::{describe_db_error, BatchPersister, ConstraintKind};
pub use records::{ExerciseRecord, NamedRef, RoutineRecord};
pub use report::{ImportError, ImportReport};
pub use routines::RoutineImporter;
