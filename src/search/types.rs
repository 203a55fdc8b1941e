//! Common types used across the search module
//!
//! This module contains the offer record returned by the store and the
//! small value types hanging off it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of an offer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// Where an offer is located and how far its offeror will travel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    /// Distance in km the offeror serves around `lat`/`lng`. Unset means 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_radius_km: Option<f64>,
}

impl Location {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            service_radius_km: None,
        }
    }

    #[must_use]
    pub fn with_service_radius(mut self, radius_km: f64) -> Self {
        self.service_radius_km = Some(radius_km);
        self
    }

    /// Service radius with the unset case resolved to 0
    #[must_use]
    pub fn service_radius(&self) -> f64 {
        self.service_radius_km.unwrap_or(0.0)
    }
}

/// Pricing data, either a single figure or a from/to range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pricing {
    Fixed {
        price: Option<f64>,
    },
    Range {
        from: Option<f64>,
        to: Option<f64>,
    },
}

impl Pricing {
    #[must_use]
    pub fn fixed(price: f64) -> Self {
        Pricing::Fixed { price: Some(price) }
    }

    #[must_use]
    pub fn range(from: f64, to: f64) -> Self {
        Pricing::Range {
            from: Some(from),
            to: Some(to),
        }
    }

    #[must_use]
    pub fn is_range(&self) -> bool {
        matches!(self, Pricing::Range { .. })
    }

    /// Single comparable value used for price ordering
    ///
    /// A range yields its midpoint. A missing bound takes the other bound's
    /// value; with both missing (or a fixed offer without a price) the
    /// result is 0.
    #[must_use]
    pub fn effective_price(&self) -> f64 {
        match *self {
            Pricing::Fixed { price } => price.unwrap_or(0.0),
            Pricing::Range { from, to } => {
                let (from, to) = match (from, to) {
                    (Some(from), Some(to)) => (from, to),
                    (Some(only), None) | (None, Some(only)) => (only, only),
                    (None, None) => (0.0, 0.0),
                };
                (from + to) / 2.0
            }
        }
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Pricing::Fixed { price: None }
    }
}

/// Offer record as returned by the document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    /// Slash-delimited category path, e.g. `events/wedding/photo`
    pub category_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default)]
    pub pricing: Pricing,
    pub created_at: DateTime<Utc>,
}

impl Item {
    #[must_use]
    pub fn effective_price(&self) -> f64 {
        self.pricing.effective_price()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_price_fixed() {
        assert_eq!(Pricing::fixed(120.0).effective_price(), 120.0);
        assert_eq!(Pricing::Fixed { price: None }.effective_price(), 0.0);
    }

    #[test]
    fn test_effective_price_range_midpoint() {
        assert_eq!(Pricing::range(100.0, 300.0).effective_price(), 200.0);
    }

    #[test]
    fn test_effective_price_range_missing_bounds() {
        let only_from = Pricing::Range {
            from: Some(80.0),
            to: None,
        };
        assert_eq!(only_from.effective_price(), 80.0);

        let only_to = Pricing::Range {
            from: None,
            to: Some(40.0),
        };
        assert_eq!(only_to.effective_price(), 40.0);

        let neither = Pricing::Range {
            from: None,
            to: None,
        };
        assert_eq!(neither.effective_price(), 0.0);
    }

    #[test]
    fn test_location_service_radius_defaults_to_zero() {
        assert_eq!(Location::new(52.0, 21.0).service_radius(), 0.0);
        assert_eq!(
            Location::new(52.0, 21.0).with_service_radius(15.0).service_radius(),
            15.0
        );
    }
}
