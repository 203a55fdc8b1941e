//! Shared configuration constants for the offer search engine
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Default page size: 10 offers per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default geo search radius: 50 km
///
/// Applied when a search supplies valid coordinates but no usable radius.
pub const DEFAULT_GEO_RADIUS_KM: f64 = 50.0;

/// Upper bound on any single offer's own service radius: 500 km
///
/// The bounding-box pre-filter is widened by this amount so that an offer
/// located outside the searcher's radius, but willing to travel, still
/// reaches the exact distance filter.
pub const MAX_SERVICE_RADIUS_KM: f64 = 500.0;

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres per degree of latitude (and of longitude at the equator)
pub const KM_PER_DEGREE: f64 = 111.32;

/// All-matches count at or below which the two-tier search fetches both
/// tiers in full and slices in memory instead of windowing through the store.
pub const DEFAULT_FULL_FETCH_THRESHOLD: usize = 500;

/// Minimum window used when scanning the all-matches set for
/// description-only offers.
pub const DEFAULT_SCAN_BATCH_SIZE: usize = 50;
