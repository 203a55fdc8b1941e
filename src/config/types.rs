//! Core configuration types for the offer search engine
//!
//! These values were historically process-wide constants. They are carried
//! on an explicit struct so each engine (and each test) can vary them.

use serde::{Deserialize, Serialize};

use crate::utils::{
    DEFAULT_FULL_FETCH_THRESHOLD, DEFAULT_GEO_RADIUS_KM, DEFAULT_PAGE_SIZE,
    DEFAULT_SCAN_BATCH_SIZE, MAX_SERVICE_RADIUS_KM,
};

/// Main configuration struct for offer retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Offers per result page. Always greater than zero.
    pub(crate) page_size: usize,

    /// Radius applied when coordinates are supplied without a usable radius.
    pub(crate) default_geo_radius_km: f64,

    /// Upper bound on any offer's own service radius.
    ///
    /// **INVARIANT:** must be at least as large as every `service_radius_km`
    /// stored in the collection, otherwise the bounding-box pre-filter can
    /// drop true matches.
    pub(crate) max_service_radius_km: f64,

    /// All-matches count at or below which both tiers are fetched in full.
    pub(crate) full_fetch_threshold: usize,

    /// Minimum window used when scanning for description-only offers.
    pub(crate) scan_batch_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_geo_radius_km: DEFAULT_GEO_RADIUS_KM,
            max_service_radius_km: MAX_SERVICE_RADIUS_KM,
            full_fetch_threshold: DEFAULT_FULL_FETCH_THRESHOLD,
            scan_batch_size: DEFAULT_SCAN_BATCH_SIZE,
        }
    }
}
