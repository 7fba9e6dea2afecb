// ABOUTME: Page-number pagination parameters and response envelope for list endpoints
// ABOUTME: Clamps page and page-size inputs so callers cannot request unbounded result sets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repforge Project

use crate::constants::{defaults, limits};
use serde::{Deserialize, Serialize};

/// Pagination parameters for offset-based queries
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// 1-based page number
    pub page: Option<u32>,
    /// Items per page
    pub page_size: Option<u32>,
    /// Optional name suffix filter
    pub name: Option<String>,
}

impl PaginationParams {
    /// Effective page, clamped to at least 1
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size, clamped to `1..=MAX_PAGE_SIZE`
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
            .unwrap_or(defaults::PAGE_SIZE)
            .clamp(1, limits::MAX_PAGE_SIZE)
    }

    /// Row offset for the effective page
    #[must_use]
    pub fn offset(&self) -> u32 {
        (self.page() - 1) * self.page_size()
    }

    /// Name filter with surrounding whitespace removed, `None` when blank
    #[must_use]
    pub fn name_filter(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

/// Paginated response containing items and pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items in this page
    pub items: Vec<T>,
    /// Total number of matching items across all pages
    pub total: i64,
    /// 1-based page number served
    pub page: u32,
    /// Page size served
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Create a new page
    #[must_use]
    pub fn new(items: Vec<T>, total: i64, page: u32, page_size: u32) -> Self {
        Self {
            items,
            total,
            page,
            page_size,
        }
    }
}
