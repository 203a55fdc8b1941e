//! Error types for search operations
//!
//! Malformed input never produces an error: the normalizer degrades it to
//! defaults. The only runtime failures are store failures, which are
//! carried through unchanged. The engine does not retry; wrap the store in
//! [`crate::store::RetryingStore`] for that.

use thiserror::Error;

use crate::store::StoreError;

/// Result type alias for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Error types for search operations
#[derive(Debug, Error)]
pub enum SearchError {
    /// The document store failed a count or find call
    #[error("Search store call failed: {0}")]
    Store(#[from] StoreError),
}

impl SearchError {
    /// The underlying store error
    #[must_use]
    pub fn store_error(&self) -> &StoreError {
        match self {
            SearchError::Store(e) => e,
        }
    }

    /// Check if a retry of the whole search could succeed
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.store_error().is_transient()
    }
}

/// Helper macro for logging search operations with performance metrics
#[macro_export]
macro_rules! log_search_operation {
    ($op:expr, $strategy:expr) => {{
        let start = std::time::Instant::now();
        let result = $op;
        let duration = start.elapsed();

        match &result {
            Ok(page) => {
                tracing::debug!(
                    strategy = ?$strategy,
                    duration_ms = duration.as_millis(),
                    total_items = page.total_items,
                    returned = page.items.len(),
                    "Search operation completed successfully"
                );
            }
            Err(e) => {
                tracing::error!(
                    strategy = ?$strategy,
                    duration_ms = duration.as_millis(),
                    error = %e,
                    "Search operation failed"
                );
            }
        }

        result
    }};
}
