//! Offer retrieval and ranking
//!
//! Raw request parameters are normalized into a query descriptor, turned
//! into store conditions, and executed with one of four retrieval
//! strategies. Text searches rank title matches ahead of description-only
//! matches; geo searches prune the store's bounding-box candidates by exact
//! great-circle distance before ranking.

pub mod conditions;
pub mod engine;
pub mod errors;
pub mod geo;
pub mod query;
pub mod ranking;
pub mod types;

pub use conditions::{Condition, ConditionSet, Field, SearchConditions, Value, build_conditions};
pub use engine::OfferSearchEngine;
pub use errors::{SearchError, SearchResult};
pub use geo::{BoundingBox, LngSpan, bounding_box, filter_by_distance, haversine_km};
pub use query::{
    GeoQuery, Pagination, QueryDescriptor, ResultPage, RetrievalStrategy, SearchQueryBuilder,
    SortMode, normalize, search,
};
pub use types::{Item, ItemId, Location, Pricing};
