//! Search query normalization, execution and result paging
//!
//! Raw parameters go through [`normalize`] (or [`SearchQueryBuilder`]) into
//! a [`QueryDescriptor`], which the execution layer turns into store calls
//! and a [`ResultPage`].

// Internal modules
mod builder;
mod execution;
mod parsing;
mod results;

// Public exports
pub use builder::SearchQueryBuilder;
pub use execution::RetrievalStrategy;
pub use parsing::{GeoQuery, QueryDescriptor, SortMode, keys, normalize};
pub use results::{Pagination, ResultPage};

pub(crate) use execution::execute_search_query;

use std::collections::HashMap;

use crate::search::conditions::ConditionSet;
use crate::search::engine::OfferSearchEngine;
use crate::search::errors::SearchResult;
use crate::store::OfferStore;

/// Convenience function for one-off searches with logging
pub async fn search<S: OfferStore>(
    engine: &OfferSearchEngine<S>,
    base: &ConditionSet,
    raw: &HashMap<String, String>,
) -> SearchResult<ResultPage> {
    let start = std::time::Instant::now();

    let result = engine.search(base, raw).await?;

    let duration = start.elapsed();
    tracing::info!(
        params = raw.len(),
        page = result.current_page,
        total_items = result.total_items,
        results_count = result.len(),
        duration_ms = duration.as_millis(),
        "Search completed successfully"
    );

    Ok(result)
}
