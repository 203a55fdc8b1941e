//! Query builder for constructing search queries with a fluent interface
//!
//! Typed counterpart of [`super::normalize`]: the same cleaning rules apply,
//! so a builder and a raw parameter map describing the same request produce
//! equal descriptors.

use super::parsing::{QueryDescriptor, SortMode, clean_category, clean_text, geo_query};
use super::results::ResultPage;
use crate::config::EngineConfig;
use crate::search::conditions::ConditionSet;
use crate::search::engine::OfferSearchEngine;
use crate::search::errors::SearchResult;
use crate::store::OfferStore;

/// Search query builder with fluent interface
#[derive(Debug, Clone)]
pub struct SearchQueryBuilder {
    descriptor: QueryDescriptor,
    default_geo_radius_km: f64,
}

impl SearchQueryBuilder {
    /// Create a builder using the page size and geo defaults of `config`
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            descriptor: QueryDescriptor::new(config.page_size()),
            default_geo_radius_km: config.default_geo_radius_km(),
        }
    }

    /// Set the 1-based page; zero is treated as page 1
    #[must_use]
    pub fn page(mut self, page: usize) -> Self {
        self.descriptor.page = page.max(1);
        self
    }

    /// Restrict to a category subtree
    #[must_use]
    pub fn category(mut self, path: impl AsRef<str>) -> Self {
        self.descriptor.category_path = clean_category(path.as_ref());
        self
    }

    /// Set the free-text term; blank terms clear the search
    #[must_use]
    pub fn search(mut self, term: impl AsRef<str>) -> Self {
        self.descriptor.search_term = clean_text(term.as_ref());
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: SortMode) -> Self {
        self.descriptor.sort = sort;
        self
    }

    /// Search around a point
    ///
    /// Invalid coordinates disable geo search, matching the parameter
    /// normalizer. `radius_km` of `None` uses the configured default.
    #[must_use]
    pub fn near(mut self, lat: f64, lng: f64, radius_km: Option<f64>) -> Self {
        self.descriptor.geo = geo_query(lat, lng, radius_km, self.default_geo_radius_km);
        self
    }

    #[must_use]
    pub fn price_min(mut self, min: f64) -> Self {
        self.descriptor.price_min = min.is_finite().then_some(min);
        self
    }

    #[must_use]
    pub fn price_max(mut self, max: f64) -> Self {
        self.descriptor.price_max = max.is_finite().then_some(max);
        self
    }

    /// Finish building without executing
    #[must_use]
    pub fn build(self) -> QueryDescriptor {
        self.descriptor
    }

    /// Execute the search query and return the result page
    pub async fn execute<S: OfferStore>(
        self,
        engine: &OfferSearchEngine<S>,
        base: &ConditionSet,
    ) -> SearchResult<ResultPage> {
        engine.search_descriptor(base, &self.descriptor).await
    }
}
