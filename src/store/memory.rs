//! In-memory reference store
//!
//! Evaluates every [`Condition`] variant exactly, orders with a stable sort
//! and paginates like a real document store. Used by the test-suite and by
//! hosts that want to run the engine over a fixed offer list.

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use super::{FindRequest, Limit, OfferStore, StoreError};
use super::{StorePage, StoreResult};
use crate::search::conditions::{Condition, ConditionSet, Field, Value};
use crate::search::ranking::{contains_term, sort_native};
use crate::search::types::{Item, Pricing};

/// Call counters, handy for asserting how many round trips a search took
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub count_calls: usize,
    pub find_calls: usize,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<Vec<Item>>,
    count_calls: AtomicUsize,
    find_calls: AtomicUsize,
    /// Error returned by the next `n` calls
    injected: Mutex<Option<(StoreError, usize)>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items: RwLock::new(items),
            ..Self::default()
        }
    }

    pub fn insert(&self, item: Item) {
        self.items.write().push(item);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Make the next `times` calls fail with `error`
    pub fn fail_next(&self, error: StoreError, times: usize) {
        *self.injected.lock() = (times > 0).then_some((error, times));
    }

    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            count_calls: self.count_calls.load(AtomicOrdering::SeqCst),
            find_calls: self.find_calls.load(AtomicOrdering::SeqCst),
        }
    }

    pub fn reset_stats(&self) {
        self.count_calls.store(0, AtomicOrdering::SeqCst);
        self.find_calls.store(0, AtomicOrdering::SeqCst);
    }

    fn take_injected(&self) -> StoreResult<()> {
        let mut injected = self.injected.lock();
        match injected.take() {
            Some((error, remaining)) => {
                if remaining > 1 {
                    *injected = Some((error.clone(), remaining - 1));
                }
                Err(error)
            }
            None => Ok(()),
        }
    }

    fn matching(&self, conditions: &ConditionSet) -> Vec<Item> {
        self.items
            .read()
            .iter()
            .filter(|item| conditions.iter().all(|c| evaluate(c, item)))
            .cloned()
            .collect()
    }
}

impl OfferStore for MemoryStore {
    async fn count(&self, conditions: &ConditionSet) -> StoreResult<usize> {
        self.count_calls.fetch_add(1, AtomicOrdering::SeqCst);
        self.take_injected()?;
        Ok(self.matching(conditions).len())
    }

    async fn find(&self, conditions: &ConditionSet, request: FindRequest) -> StoreResult<StorePage> {
        self.find_calls.fetch_add(1, AtomicOrdering::SeqCst);
        self.take_injected()?;

        let mut items = self.matching(conditions);
        sort_native(&mut items, request.sort);
        Ok(paginate(items, request))
    }
}

/// `Bounded(0)` is treated like `Unbounded`
fn paginate(mut items: Vec<Item>, request: FindRequest) -> StorePage {
    let total_items = items.len();

    let limit = match request.limit {
        Limit::Bounded(limit) if limit > 0 => limit,
        _ => {
            return StorePage {
                items,
                total_items,
                total_pages: 1,
                page: 1,
                has_next: false,
                has_prev: false,
            };
        }
    };

    let page = request.page.max(1);
    let total_pages = total_items.div_ceil(limit).max(1);
    let start = (page - 1).saturating_mul(limit).min(total_items);
    let end = start.saturating_add(limit).min(total_items);

    items.truncate(end);
    items.drain(..start);

    StorePage {
        items,
        total_items,
        total_pages,
        page,
        has_next: page < total_pages,
        has_prev: page > 1,
    }
}

fn field_value(item: &Item, field: Field) -> Option<Value> {
    match field {
        Field::Id => Some(Value::Text(item.id.0.clone())),
        Field::Status => Some(Value::Text(item.status.clone())),
        Field::CategoryPath => Some(Value::Text(item.category_path.clone())),
        Field::Title => Some(Value::Text(item.title.clone())),
        Field::Description => item.description.clone().map(Value::Text),
        Field::Lat => item.location.map(|loc| Value::Number(loc.lat)),
        Field::Lng => item.location.map(|loc| Value::Number(loc.lng)),
        Field::IsPriceRange => Some(Value::Bool(item.pricing.is_range())),
        Field::Price => match item.pricing {
            Pricing::Fixed { price } => price.map(Value::Number),
            Pricing::Range { .. } => None,
        },
        Field::PriceFrom => match item.pricing {
            Pricing::Range { from, .. } => from.map(Value::Number),
            Pricing::Fixed { .. } => None,
        },
        Field::PriceTo => match item.pricing {
            Pricing::Range { to, .. } => to.map(Value::Number),
            Pricing::Fixed { .. } => None,
        },
        #[allow(clippy::cast_precision_loss)]
        Field::CreatedAt => Some(Value::Number(item.created_at.timestamp_millis() as f64)),
    }
}

/// Comparisons against a missing field are false
fn evaluate(condition: &Condition, item: &Item) -> bool {
    match condition {
        Condition::Eq(field, expected) => field_value(item, *field).as_ref() == Some(expected),
        Condition::StartsWith(field, prefix) => matches!(
            field_value(item, *field),
            Some(Value::Text(text)) if text.starts_with(prefix.as_str())
        ),
        Condition::Contains(field, needle) => matches!(
            field_value(item, *field),
            Some(Value::Text(text)) if contains_term(&text, needle)
        ),
        Condition::Gte(field, bound) => matches!(
            field_value(item, *field),
            Some(Value::Number(n)) if n >= *bound
        ),
        Condition::Lte(field, bound) => matches!(
            field_value(item, *field),
            Some(Value::Number(n)) if n <= *bound
        ),
        Condition::And(all) => all.iter().all(|c| evaluate(c, item)),
        Condition::Or(any) => any.iter().any(|c| evaluate(c, item)),
        Condition::Not(inner) => !evaluate(inner, item),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::conditions::{category_condition, price_condition};
    use crate::search::types::{ItemId, Location};
    use crate::store::NativeSort;
    use chrono::{Duration, TimeZone, Utc};

    fn make_item(n: i64, title: &str, category: &str, pricing: Pricing) -> Item {
        Item {
            id: ItemId::from(n.to_string()),
            title: title.to_string(),
            description: None,
            status: "published".into(),
            category_path: category.to_string(),
            location: Some(Location::new(52.0, 21.0)),
            pricing,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(n),
        }
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.id.0.as_str()).collect()
    }

    #[tokio::test]
    async fn test_find_sorts_and_paginates() {
        let store = MemoryStore::new((1..=5).map(|n| make_item(n, "x", "a", Pricing::default())).collect());

        let page = store
            .find(&ConditionSet::new(), FindRequest::page(2, 2, NativeSort::default()))
            .await
            .unwrap();
        assert_eq!(ids(&page.items), vec!["3", "2"]);
        assert_eq!(page.total_items, 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next && page.has_prev);

        let past_end = store
            .find(&ConditionSet::new(), FindRequest::page(9, 2, NativeSort::default()))
            .await
            .unwrap();
        assert!(past_end.items.is_empty());
        assert!(!past_end.has_next);
    }

    #[tokio::test]
    async fn test_unbounded_and_zero_limit_return_everything() {
        let store = MemoryStore::new((1..=25).map(|n| make_item(n, "x", "a", Pricing::default())).collect());
        let sort = NativeSort::default();

        let all = store.find(&ConditionSet::new(), FindRequest::unbounded(sort)).await.unwrap();
        assert_eq!(all.items.len(), 25);

        let zero = store.find(&ConditionSet::new(), FindRequest::page(1, 0, sort)).await.unwrap();
        assert_eq!(zero.items.len(), 25);
    }

    #[tokio::test]
    async fn test_category_condition_matches_descendants_only() {
        let store = MemoryStore::new(vec![
            make_item(1, "x", "events", Pricing::default()),
            make_item(2, "x", "events/wedding", Pricing::default()),
            make_item(3, "x", "events-extra", Pricing::default()),
            make_item(4, "x", "music", Pricing::default()),
        ]);
        let conditions = ConditionSet::new().with(category_condition("events"));
        assert_eq!(store.count(&conditions).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_price_condition_over_both_representations() {
        let store = MemoryStore::new(vec![
            make_item(1, "x", "a", Pricing::fixed(50.0)),
            make_item(2, "x", "a", Pricing::fixed(150.0)),
            make_item(3, "x", "a", Pricing::range(80.0, 120.0)),
            make_item(4, "x", "a", Pricing::range(130.0, 200.0)),
            make_item(5, "x", "a", Pricing::range(10.0, 90.0)),
        ]);
        let conditions = ConditionSet::new()
            .with(price_condition(Some(100.0), Some(140.0)).unwrap());

        let page = store
            .find(&conditions, FindRequest::unbounded(NativeSort::default()))
            .await
            .unwrap();
        let mut matched = ids(&page.items);
        matched.sort_unstable();
        assert_eq!(matched, vec!["3", "4"]);
    }

    #[tokio::test]
    async fn test_injected_failures_expire() {
        let store = MemoryStore::new(Vec::new());
        store.fail_next(StoreError::Timeout("slow".into()), 2);

        assert!(store.count(&ConditionSet::new()).await.is_err());
        assert!(store.count(&ConditionSet::new()).await.is_err());
        assert_eq!(store.count(&ConditionSet::new()).await.unwrap(), 0);
        assert_eq!(store.stats().count_calls, 3);
    }

    #[tokio::test]
    async fn test_insert_and_reset_stats() {
        let store = MemoryStore::new(Vec::new());
        assert!(store.is_empty());
        assert_eq!(store.count(&ConditionSet::new()).await.unwrap(), 0);

        store.insert(make_item(1, "x", "a", Pricing::default()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.count(&ConditionSet::new()).await.unwrap(), 1);
        assert_eq!(store.stats().count_calls, 2);

        store.reset_stats();
        assert_eq!(store.stats(), StoreStats::default());
    }

    #[tokio::test]
    async fn test_negation_and_collapsed_set() {
        let store = MemoryStore::new(vec![
            make_item(1, "x", "events", Pricing::fixed(50.0)),
            make_item(2, "x", "events/wedding", Pricing::fixed(150.0)),
            make_item(3, "x", "music", Pricing::fixed(150.0)),
        ]);

        let not_events = ConditionSet::new().with(Condition::not(category_condition("events")));
        let page = store
            .find(&not_events, FindRequest::unbounded(NativeSort::default()))
            .await
            .unwrap();
        assert_eq!(ids(&page.items), vec!["3"]);

        let set = ConditionSet::new()
            .with(category_condition("events"))
            .with(price_condition(Some(100.0), None).unwrap());
        let collapsed = ConditionSet::new().with(set.to_condition());
        assert_eq!(store.count(&set).await.unwrap(), 1);
        assert_eq!(store.count(&collapsed).await.unwrap(), 1);
    }
}
