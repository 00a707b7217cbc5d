//! Paginated list responses.

use serde::{Deserialize, Serialize};

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Total number of items across all pages
    pub total: u64,
    /// Number of pages
    #[serde(alias = "totalPages", alias = "pages")]
    pub total_pages: u32,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self { page: 1, limit: 10, total: 0, total_pages: 0 }
    }
}

/// A page of items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paginated<T> {
    /// Items on this page
    #[serde(alias = "data", alias = "results")]
    pub items: Vec<T>,
    /// Paging metadata; some endpoints omit it for short lists
    #[serde(default, alias = "meta")]
    pub pagination: PageInfo,
}

impl<T> Paginated<T> {
    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Common list query parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageQuery {
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Free-text filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: 1, limit: 10, search: None }
    }
}

impl PageQuery {
    /// Query for the given page with the default size.
    pub fn page(page: u32) -> Self {
        Self { page: page.max(1), ..Self::default() }
    }
}
