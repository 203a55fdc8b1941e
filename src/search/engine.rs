//! Offer search engine
//!
//! This module provides the `OfferSearchEngine` that owns a store handle and
//! the engine configuration, and runs normalized searches against the store.

use std::collections::HashMap;

use super::conditions::ConditionSet;
use super::errors::SearchResult;
use super::query::{
    QueryDescriptor, ResultPage, RetrievalStrategy, SearchQueryBuilder, execute_search_query,
    normalize,
};
use crate::config::EngineConfig;
use crate::log_search_operation;
use crate::store::OfferStore;

/// Main search engine running offer queries against a document store
///
/// Holds no per-request state, so a single instance can serve concurrent
/// searches. Wrap the store in an `Arc` to share it with other components.
#[derive(Debug, Clone)]
pub struct OfferSearchEngine<S> {
    store: S,
    config: EngineConfig,
}

impl<S: OfferStore> OfferSearchEngine<S> {
    #[must_use]
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Engine with [`EngineConfig::default`]
    #[must_use]
    pub fn with_defaults(store: S) -> Self {
        Self::new(store, EngineConfig::default())
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start a typed query using this engine's defaults
    #[must_use]
    pub fn query(&self) -> SearchQueryBuilder {
        SearchQueryBuilder::new(&self.config)
    }

    /// Search with raw query-string parameters
    ///
    /// `base` carries the caller's fixed constraints (for example
    /// `status = published`) and is combined with every derived condition.
    /// Malformed parameters never fail; only store errors are returned.
    pub async fn search(
        &self,
        base: &ConditionSet,
        raw: &HashMap<String, String>,
    ) -> SearchResult<ResultPage> {
        let descriptor = normalize(raw, &self.config);
        self.search_descriptor(base, &descriptor).await
    }

    /// Search with an already normalized descriptor
    pub async fn search_descriptor(
        &self,
        base: &ConditionSet,
        descriptor: &QueryDescriptor,
    ) -> SearchResult<ResultPage> {
        let strategy = RetrievalStrategy::select(descriptor);

        log_search_operation!(
            execute_search_query(&self.store, &self.config, base, descriptor).await,
            strategy
        )
    }
}
