//! Page-based pagination: parameter clamping, meta, and link construction.
//!
//! The wire convention is JSON:API style `page[number]` / `page[size]` query
//! parameters. Parsing from the raw query map happens here so both services
//! share the same clamping rules.

use std::collections::HashMap;

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Requested page, already clamped to valid bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    /// Parse `page[number]` / `page[size]` from a raw query map.
    ///
    /// Missing or unparseable values fall back to defaults; out-of-range
    /// values are clamped (page >= 1, 1 <= size <= 100).
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        let number = query
            .get("page[number]")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(1)
            .clamp(1, i64::from(u32::MAX)) as u32;
        let size = query
            .get("page[size]")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(i64::from(DEFAULT_PAGE_SIZE))
            .clamp(1, i64::from(MAX_PAGE_SIZE)) as u32;

        Self {
            page: number,
            page_size: size,
        }
    }

    /// Number of rows to skip for this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// Pagination metadata included alongside list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl PageMeta {
    pub fn new(total: u64, params: PageParams) -> Self {
        let total_pages = total.div_ceil(u64::from(params.page_size)) as u32;
        Self {
            total,
            page: params.page,
            page_size: params.page_size,
            total_pages,
        }
    }
}

/// Navigation links for a paginated collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub first: String,
    pub last: String,
    pub next: Option<String>,
    pub prev: Option<String>,
}

impl PageLinks {
    pub fn new(base_path: &str, meta: &PageMeta) -> Self {
        let url = |page: u32| format!("{base_path}?page[number]={page}&page[size]={}", meta.page_size);

        Self {
            self_link: url(meta.page),
            first: url(1),
            last: url(meta.total_pages.max(1)),
            next: (meta.page < meta.total_pages).then(|| url(meta.page + 1)),
            prev: (meta.page > 1).then(|| url(meta.page - 1)),
        }
    }
}
