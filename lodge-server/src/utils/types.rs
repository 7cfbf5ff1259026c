//! Common request/response types shared across handlers

use serde::{Deserialize, Serialize};

/// Hard cap on page size, regardless of what the client asks for
const MAX_PAGE_LIMIT: usize = 100;

/// Pagination query parameters (`?page=N&limit=M`)
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    10
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl Pagination {
    /// Effective page size (non-zero, capped)
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, MAX_PAGE_LIMIT)
    }

    /// Zero-based offset of the first record on this page
    pub fn start(&self) -> usize {
        self.page.max(1).saturating_sub(1) * self.limit()
    }
}

/// A single page of results
#[derive(Debug, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub limit: usize,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, pagination: &Pagination) -> Self {
        Self {
            items,
            page: pagination.page.max(1),
            limit: pagination.limit(),
        }
    }
}
