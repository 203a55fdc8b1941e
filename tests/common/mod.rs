//! Test utilities and fixtures for the offer search test suite

use chrono::{DateTime, Duration, TimeZone, Utc};
use kodegen_offer_search::{
    Condition, ConditionSet, EngineConfig, Field, FindRequest, Item, ItemId, Limit, Location,
    MemoryStore, NativeSort, OfferStore, Pricing, StorePage, StoreResult,
};
use std::collections::HashMap;

/// Install a test subscriber once; later calls are no-ops
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[allow(dead_code)]
fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Published offer `n`, created `n` minutes after a fixed epoch
///
/// Higher `n` means newer, so the default ordering lists the highest ids first.
#[allow(dead_code)]
pub fn offer(n: u64, title: &str) -> Item {
    Item {
        id: ItemId::from(n),
        title: title.to_string(),
        description: None,
        status: "published".to_string(),
        category_path: "services".to_string(),
        location: None,
        pricing: Pricing::default(),
        created_at: epoch() + Duration::minutes(i64::try_from(n).unwrap_or(i64::MAX)),
    }
}

#[allow(dead_code)]
pub fn described(n: u64, title: &str, description: &str) -> Item {
    Item {
        description: Some(description.to_string()),
        ..offer(n, title)
    }
}

#[allow(dead_code)]
pub fn priced(item: Item, pricing: Pricing) -> Item {
    Item { pricing, ..item }
}

#[allow(dead_code)]
pub fn located(item: Item, location: Location) -> Item {
    Item {
        location: Some(location),
        ..item
    }
}

#[allow(dead_code)]
pub fn in_category(item: Item, path: &str) -> Item {
    Item {
        category_path: path.to_string(),
        ..item
    }
}

#[allow(dead_code)]
pub fn with_status(item: Item, status: &str) -> Item {
    Item {
        status: status.to_string(),
        ..item
    }
}

/// Base conditions used by a public listing
#[allow(dead_code)]
pub fn published() -> ConditionSet {
    ConditionSet::new().with(Condition::eq(Field::Status, "published"))
}

#[allow(dead_code)]
pub fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[allow(dead_code)]
pub fn ids(items: &[Item]) -> Vec<String> {
    items.iter().map(|item| item.id.to_string()).collect()
}

/// Config that always takes the windowed two-tier path
#[allow(dead_code)]
pub fn windowed_config(page_size: usize, scan_batch_size: usize) -> EngineConfig {
    EngineConfig::builder()
        .page_size(page_size)
        .full_fetch_threshold(0)
        .scan_batch_size(scan_batch_size)
        .build()
        .unwrap()
}

/// Config that always fetches both tiers in full
#[allow(dead_code)]
pub fn full_fetch_config(page_size: usize) -> EngineConfig {
    EngineConfig::builder()
        .page_size(page_size)
        .full_fetch_threshold(usize::MAX)
        .build()
        .unwrap()
}

/// Point `distance_km` from (`lat`, `lng`) along `bearing_deg`
#[allow(dead_code)]
pub fn destination(lat: f64, lng: f64, bearing_deg: f64, distance_km: f64) -> (f64, f64) {
    let angular = distance_km / 6371.0;
    let bearing = bearing_deg.to_radians();
    let lat1 = lat.to_radians();
    let lng1 = lng.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lng2 = lng1
        + (bearing.sin() * angular.sin() * lat1.cos()).atan2(angular.cos() - lat1.sin() * lat2.sin());

    (lat2.to_degrees(), lng2.to_degrees())
}

/// Store that honors `sort` only on bounded pages
///
/// Unbounded requests come back newest first whatever was asked for, which
/// a store is allowed to do.
#[allow(dead_code)]
#[derive(Debug)]
pub struct LooseOrderStore(pub MemoryStore);

#[allow(dead_code)]
impl LooseOrderStore {
    pub fn new(items: Vec<Item>) -> Self {
        Self(MemoryStore::new(items))
    }
}

impl OfferStore for LooseOrderStore {
    async fn count(&self, conditions: &ConditionSet) -> StoreResult<usize> {
        self.0.count(conditions).await
    }

    async fn find(&self, conditions: &ConditionSet, request: FindRequest) -> StoreResult<StorePage> {
        let request = match request.limit {
            Limit::Unbounded => FindRequest::unbounded(NativeSort::default()),
            Limit::Bounded(_) => request,
        };
        self.0.find(conditions, request).await
    }
}
