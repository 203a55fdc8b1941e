//! Geospatial helpers: bounding-box pre-filter and exact distance filter
//!
//! The bounding box is a cheap, over-inclusive rectangle handed to the store.
//! The distance filter then runs haversine over whatever the box let
//! through and keeps offers within the search radius plus their own
//! service radius. Correctness depends on the box never excluding a true
//! match.

use crate::search::types::Item;
use crate::utils::{EARTH_RADIUS_KM, KM_PER_DEGREE};

/// Longitude extent of a bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LngSpan {
    /// Box touches a pole or spans the whole globe
    Any,
    /// `min <= lng <= max`
    Range { min: f64, max: f64 },
    /// Box crosses the antimeridian: `lng >= east_of || lng <= west_of`
    Wrapped { east_of: f64, west_of: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub lng: LngSpan,
}

impl BoundingBox {
    #[must_use]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        if lat < self.min_lat || lat > self.max_lat {
            return false;
        }
        match self.lng {
            LngSpan::Any => true,
            LngSpan::Range { min, max } => lng >= min && lng <= max,
            LngSpan::Wrapped { east_of, west_of } => lng >= east_of || lng <= west_of,
        }
    }
}

/// Rectangle around `(lat, lng)` covering every point within `radius_km`
///
/// Deltas follow `radius / 111.32` for latitude and
/// `radius / (111.32 * cos(lat))` for longitude, widened to the exact
/// spherical bound whenever that one is larger.
#[must_use]
pub fn bounding_box(lat: f64, lng: f64, radius_km: f64) -> BoundingBox {
    let angular = radius_km / EARTH_RADIUS_KM;

    let lat_delta = (radius_km / KM_PER_DEGREE).max(angular.to_degrees());
    let min_lat = lat - lat_delta;
    let max_lat = lat + lat_delta;

    if min_lat <= -90.0 || max_lat >= 90.0 {
        return BoundingBox {
            min_lat: min_lat.max(-90.0),
            max_lat: max_lat.min(90.0),
            lng: LngSpan::Any,
        };
    }

    let cos_lat = lat.to_radians().cos();
    let approx_delta = radius_km / (KM_PER_DEGREE * cos_lat);
    let ratio = angular.sin() / cos_lat;
    let exact_delta = if angular >= std::f64::consts::FRAC_PI_2 || ratio >= 1.0 {
        180.0
    } else {
        ratio.asin().to_degrees()
    };
    let lng_delta = approx_delta.max(exact_delta);

    if !lng_delta.is_finite() || lng_delta >= 180.0 {
        return BoundingBox {
            min_lat,
            max_lat,
            lng: LngSpan::Any,
        };
    }

    let min_lng = lng - lng_delta;
    let max_lng = lng + lng_delta;

    let span = if min_lng < -180.0 {
        LngSpan::Wrapped {
            east_of: min_lng + 360.0,
            west_of: max_lng,
        }
    } else if max_lng > 180.0 {
        LngSpan::Wrapped {
            east_of: min_lng,
            west_of: max_lng - 360.0,
        }
    } else {
        LngSpan::Range {
            min: min_lng,
            max: max_lng,
        }
    };

    BoundingBox {
        min_lat,
        max_lat,
        lng: span,
    }
}

/// Great-circle distance in km between two points (haversine)
#[must_use]
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Keep offers within `radius_km + service radius` of the center
///
/// Offers without a location cannot be geo-matched and are dropped.
/// Input order is preserved.
#[must_use]
pub fn filter_by_distance(
    items: Vec<Item>,
    center_lat: f64,
    center_lng: f64,
    radius_km: f64,
) -> Vec<Item> {
    items
        .into_iter()
        .filter(|item| {
            item.location.is_some_and(|loc| {
                let distance = haversine_km(center_lat, center_lng, loc.lat, loc.lng);
                distance <= radius_km + loc.service_radius()
            })
        })
        .collect()
}
