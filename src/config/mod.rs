// ABOUTME: Configuration module grouping environment-based server configuration
// ABOUTME: Environment variables are the single source of configuration truth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

pub mod environment;
