//! Query parameter normalization
//!
//! Turns raw query-string values into a strict [`QueryDescriptor`]. Nothing
//! here fails: malformed or missing input degrades to a safe default.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::store::{NativeSort, SortDirection, SortField};

/// Raw parameter names understood by [`normalize`]
pub mod keys {
    pub const PAGE: &str = "page";
    pub const CATEGORY: &str = "category";
    pub const SEARCH: &str = "search";
    /// Short alias of [`SEARCH`]
    pub const SEARCH_ALIAS: &str = "q";
    pub const SORT: &str = "sort";
    pub const LAT: &str = "lat";
    pub const LNG: &str = "lng";
    pub const RADIUS: &str = "radius";
    pub const PRICE_MIN: &str = "price_min";
    pub const PRICE_MAX: &str = "price_max";
}

/// Requested result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
    TitleAsc,
    TitleDesc,
}

impl SortMode {
    /// Parse a sort token; unknown tokens fall back to [`SortMode::Newest`]
    ///
    /// Accepts `price_asc`, `price-asc` and any casing of either.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        let token = token.trim().to_ascii_lowercase().replace('-', "_");

        match token.as_str() {
            "newest" => SortMode::Newest,
            "oldest" => SortMode::Oldest,
            "price_asc" => SortMode::PriceAsc,
            "price_desc" => SortMode::PriceDesc,
            "title_asc" => SortMode::TitleAsc,
            "title_desc" => SortMode::TitleDesc,
            _ => SortMode::Newest,
        }
    }

    /// Ordering the store can apply itself, if any
    #[must_use]
    pub fn native_sort(self) -> Option<NativeSort> {
        match self {
            SortMode::Newest => Some(NativeSort::new(SortField::CreatedAt, SortDirection::Desc)),
            SortMode::Oldest => Some(NativeSort::new(SortField::CreatedAt, SortDirection::Asc)),
            SortMode::TitleAsc => Some(NativeSort::new(SortField::Title, SortDirection::Asc)),
            SortMode::TitleDesc => Some(NativeSort::new(SortField::Title, SortDirection::Desc)),
            SortMode::PriceAsc | SortMode::PriceDesc => None,
        }
    }

    /// Ordering to request from the store
    ///
    /// Derived sort modes ask for the stable default (newest first) and are
    /// reordered in memory afterwards.
    #[must_use]
    pub fn store_sort(self) -> NativeSort {
        self.native_sort().unwrap_or_default()
    }

    /// Whether ordering happens in memory on the effective price
    #[must_use]
    pub fn is_derived(self) -> bool {
        self.native_sort().is_none()
    }
}

/// Radius search around a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: f64,
}

/// Validated, immutable description of one search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// 1-based requested page
    pub page: usize,
    pub page_size: usize,
    pub category_path: Option<String>,
    pub search_term: Option<String>,
    pub sort: SortMode,
    pub geo: Option<GeoQuery>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

impl QueryDescriptor {
    /// Descriptor for page 1 with no filters
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size,
            category_path: None,
            search_term: None,
            sort: SortMode::Newest,
            geo: None,
            price_min: None,
            price_max: None,
        }
    }

    #[must_use]
    pub fn has_search(&self) -> bool {
        self.search_term.is_some()
    }
}

/// Normalize raw query parameters into a [`QueryDescriptor`]
///
/// The page size always comes from `config`, never from the caller.
#[must_use]
pub fn normalize(raw: &HashMap<String, String>, config: &EngineConfig) -> QueryDescriptor {
    let get = |key: &str| raw.get(key).map(String::as_str);

    let search_term = get(keys::SEARCH)
        .and_then(clean_text)
        .or_else(|| get(keys::SEARCH_ALIAS).and_then(clean_text));

    QueryDescriptor {
        page: get(keys::PAGE).map_or(1, parse_page),
        page_size: config.page_size(),
        category_path: get(keys::CATEGORY).and_then(clean_category),
        search_term,
        sort: get(keys::SORT).map_or(SortMode::Newest, SortMode::parse),
        geo: parse_geo(
            get(keys::LAT),
            get(keys::LNG),
            get(keys::RADIUS),
            config.default_geo_radius_km(),
        ),
        price_min: get(keys::PRICE_MIN).and_then(parse_finite),
        price_max: get(keys::PRICE_MAX).and_then(parse_finite),
    }
}

fn parse_page(value: &str) -> usize {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

fn parse_finite(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub(super) fn clean_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(super) fn clean_category(value: &str) -> Option<String> {
    let trimmed = value.trim().trim_end_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Both coordinates must be valid or geo search is dropped entirely
fn parse_geo(
    lat: Option<&str>,
    lng: Option<&str>,
    radius: Option<&str>,
    default_radius_km: f64,
) -> Option<GeoQuery> {
    geo_query(
        lat.and_then(parse_finite)?,
        lng.and_then(parse_finite)?,
        radius.and_then(parse_finite),
        default_radius_km,
    )
}

/// Out-of-range coordinates disable geo search; a missing or non-positive
/// radius falls back to `default_radius_km`
pub(super) fn geo_query(
    lat: f64,
    lng: f64,
    radius_km: Option<f64>,
    default_radius_km: f64,
) -> Option<GeoQuery> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return None;
    }

    let radius_km = radius_km
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(default_radius_km);

    Some(GeoQuery { lat, lng, radius_km })
}
