pub mod config;
pub mod search;
pub mod store;
pub mod utils;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use search::{
    Condition, ConditionSet, Field, Item, ItemId, Location, OfferSearchEngine, Pricing,
    QueryDescriptor, ResultPage, SearchError, SearchQueryBuilder, SearchResult, SortMode, Value,
};
pub use store::{
    FindRequest, Limit, MemoryStore, NativeSort, OfferStore, RetryConfig, RetryingStore,
    SortDirection, SortField, StoreError, StorePage, StoreResult,
};
