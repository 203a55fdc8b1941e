//! Document store interface consumed by the search engine
//!
//! The store is an external collaborator: a paginated, filterable, sortable
//! offer collection. The engine only ever calls [`OfferStore::count`] and
//! [`OfferStore::find`]; everything else (indexing, persistence, access
//! control) lives on the other side of this trait.

pub mod memory;
pub mod retry;

pub use memory::MemoryStore;
pub use retry::{RetryConfig, RetryingStore, retry_task};

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::search::conditions::ConditionSet;
use crate::search::types::Item;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported by a store implementation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The store did not answer in time
    #[error("store request timed out: {0}")]
    Timeout(String),

    /// The connection to the store failed or dropped
    #[error("store connection failed: {0}")]
    Connection(String),

    /// The store rejected or failed to execute the query
    #[error("store query failed: {0}")]
    Query(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// Check if error is transient and should be retried
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Timeout(_) | StoreError::Connection(_))
    }

    /// Get suggested retry delay for transient errors
    #[must_use]
    pub fn retry_delay(&self) -> Option<Duration> {
        if self.is_transient() {
            Some(Duration::from_millis(100))
        } else {
            None
        }
    }
}

/// Fields the store can order by natively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedAt,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Store-side ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NativeSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl NativeSort {
    #[must_use]
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// Newest first
impl Default for NativeSort {
    fn default() -> Self {
        Self::new(SortField::CreatedAt, SortDirection::Desc)
    }
}

/// Page size requested from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Limit {
    /// At most this many items per page. Must be greater than zero.
    Bounded(usize),
    /// Every matching item in a single page
    Unbounded,
}

/// Parameters of a single `find` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FindRequest {
    pub limit: Limit,
    /// 1-based page number; ignored for [`Limit::Unbounded`]
    pub page: usize,
    pub sort: NativeSort,
}

impl FindRequest {
    #[must_use]
    pub fn page(page: usize, limit: usize, sort: NativeSort) -> Self {
        Self {
            limit: Limit::Bounded(limit),
            page,
            sort,
        }
    }

    /// Every match in one page; `sort` is only a hint for this request
    #[must_use]
    pub fn unbounded(sort: NativeSort) -> Self {
        Self {
            limit: Limit::Unbounded,
            page: 1,
            sort,
        }
    }
}

/// One page of store results with the store's own pagination view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorePage {
    pub items: Vec<Item>,
    pub total_items: usize,
    pub total_pages: usize,
    pub page: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Paginated offer collection
///
/// Implementations may be eventually consistent: a `count` and a later
/// `find` over the same conditions can disagree. The engine tolerates that.
pub trait OfferStore: Send + Sync {
    /// Number of items matching `conditions`
    fn count(&self, conditions: &ConditionSet) -> impl Future<Output = StoreResult<usize>> + Send;

    /// One page of items matching `conditions`
    ///
    /// Bounded pages must be ordered by `request.sort`. An unbounded request
    /// may return its items unsorted or in the store's default order; the
    /// engine sorts those in memory.
    fn find(
        &self,
        conditions: &ConditionSet,
        request: FindRequest,
    ) -> impl Future<Output = StoreResult<StorePage>> + Send;
}

impl<S: OfferStore> OfferStore for Arc<S> {
    fn count(&self, conditions: &ConditionSet) -> impl Future<Output = StoreResult<usize>> + Send {
        (**self).count(conditions)
    }

    fn find(
        &self,
        conditions: &ConditionSet,
        request: FindRequest,
    ) -> impl Future<Output = StoreResult<StorePage>> + Send {
        (**self).find(conditions, request)
    }
}
