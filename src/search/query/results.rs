//! Result page container and pagination arithmetic

use serde::{Deserialize, Serialize};

use crate::search::types::Item;

/// Page bounds derived from a total and a requested page
///
/// A page is never reported as "1 of 0" and an out-of-range request clamps
/// to the last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl Pagination {
    /// # Panics
    ///
    /// Panics when `page_size` or `requested_page` is zero. Both are
    /// guaranteed by config validation and normalization, so reaching this
    /// is a bug rather than bad input.
    #[must_use]
    pub fn compute(total_items: usize, page_size: usize, requested_page: usize) -> Self {
        assert!(page_size > 0, "page size must be greater than zero");
        assert!(requested_page >= 1, "requested page is 1-based");

        let total_pages = total_items.div_ceil(page_size).max(1);

        Self {
            current_page: requested_page.min(total_pages),
            total_pages,
            total_items,
            page_size,
        }
    }

    /// Zero-based position of the first item on the current page
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.current_page - 1) * self.page_size
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Slice the current page out of a fully ranked list
    #[must_use]
    pub fn slice(&self, mut ranked: Vec<Item>) -> Vec<Item> {
        let offset = self.offset().min(ranked.len());
        let end = (offset + self.page_size).min(ranked.len());
        ranked.truncate(end);
        ranked.drain(..offset);
        ranked
    }
}

/// One page of ranked offers plus pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    /// Offers in rank order
    pub items: Vec<Item>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub has_next: bool,
    pub has_prev: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<usize>,
}

impl ResultPage {
    #[must_use]
    pub fn new(items: Vec<Item>, pagination: Pagination) -> Self {
        let has_next = pagination.has_next();
        let has_prev = pagination.has_prev();

        Self {
            items,
            current_page: pagination.current_page,
            total_pages: pagination.total_pages,
            total_items: pagination.total_items,
            has_next,
            has_prev,
            next_page: has_next.then(|| pagination.current_page + 1),
            prev_page: has_prev.then(|| pagination.current_page - 1),
        }
    }

    /// Page 1 of 1 with nothing on it
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), Pagination::compute(0, 1, 1))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
