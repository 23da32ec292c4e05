use serde::Serialize;

/// Fixed number of items on a listing page.
pub const PAGE_SIZE: u32 = 50;

/// A 1-based page number taken from the `?page=<n>` query parameter.
///
/// Non-integer values fail form parsing; a missing parameter defaults to the
/// first page. Pages past the end of the data simply come back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromForm, UriDisplayQuery)]
pub struct PaginationRequest {
    #[field(default = 1)]
    pub page: u32,
}

impl Default for PaginationRequest {
    fn default() -> Self {
        Self { page: 1 }
    }
}

impl PaginationRequest {
    /// Number of documents to skip to reach this page.
    /// Page 0 is treated as page 1.
    pub fn skip(&self) -> u64 {
        u64::from(self.page.max(1) - 1) * u64::from(PAGE_SIZE)
    }

    /// Number of documents on a full page.
    pub fn limit(&self) -> i64 {
        i64::from(PAGE_SIZE)
    }

    /// Attach the total count and this page's items.
    pub fn to_paginated<T>(self, total: u64, items: Vec<T>) -> Paginated<T> {
        let pages = ((total + u64::from(PAGE_SIZE) - 1) / u64::from(PAGE_SIZE)).max(1);
        let page = u64::from(self.page.max(1));
        Paginated {
            pagination: PaginationResult {
                page,
                page_size: PAGE_SIZE,
                total,
                pages,
                has_prev: page > 1,
                has_next: page < pages,
                prev: page.saturating_sub(1),
                next: page + 1,
            },
            items,
        }
    }
}

/// Pagination metadata for a rendered listing page.
#[derive(Debug, Serialize)]
pub struct PaginationResult {
    pub page: u64,
    pub page_size: u32,
    pub total: u64,
    pub pages: u64,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev: u64,
    pub next: u64,
}

/// One page of items plus its pagination metadata.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub pagination: PaginationResult,
    pub items: Vec<T>,
}
