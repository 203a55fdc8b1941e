//! Relevance tiering, derived price ordering and identity dedup
//!
//! A search term splits offers into two tiers: title matches first, then
//! offers that only match in their description. Within a tier the requested
//! sort mode applies. Price ordering has no store-side equivalent, so it
//! happens here on the effective price.
//!
//! Unbounded store fetches carry no ordering guarantee, so every list built
//! from one goes through [`apply_sort`] before it is sliced.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::query::SortMode;
use super::types::{Item, ItemId};
use crate::store::{NativeSort, SortDirection, SortField};

/// Case-insensitive containment, matching the store's text predicate
#[must_use]
pub fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(&term.to_lowercase())
}

/// Identity set of a tier
#[must_use]
pub fn id_set(items: &[Item]) -> HashSet<ItemId> {
    items.iter().map(|item| item.id.clone()).collect()
}

/// Remove every offer whose identity is in `exclude`, keeping order
#[must_use]
pub fn subtract_by_id(items: Vec<Item>, exclude: &HashSet<ItemId>) -> Vec<Item> {
    items
        .into_iter()
        .filter(|item| !exclude.contains(&item.id))
        .collect()
}

/// Stable sort on effective price; ties keep their incoming order
pub fn sort_by_effective_price(items: &mut [Item], descending: bool) {
    if descending {
        items.sort_by(|a, b| b.effective_price().total_cmp(&a.effective_price()));
    } else {
        items.sort_by(|a, b| a.effective_price().total_cmp(&b.effective_price()));
    }
}

/// Compare two offers the way a store orders them for `sort`
///
/// Titles compare case-insensitively.
#[must_use]
pub fn compare_native(a: &Item, b: &Item, sort: NativeSort) -> Ordering {
    let ordering = match sort.field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    };

    match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Stable sort on a store-native ordering
pub fn sort_native(items: &mut [Item], sort: NativeSort) {
    items.sort_by(|a, b| compare_native(a, b, sort));
}

/// Apply the in-memory half of a sort mode
///
/// Native modes are left untouched.
pub fn apply_derived_sort(items: &mut [Item], sort: SortMode) {
    match sort {
        SortMode::PriceAsc => sort_by_effective_price(items, false),
        SortMode::PriceDesc => sort_by_effective_price(items, true),
        SortMode::Newest | SortMode::Oldest | SortMode::TitleAsc | SortMode::TitleDesc => {}
    }
}

/// Fully order a list for `sort`, whatever order it arrived in
///
/// The store ordering is applied first, so price ties fall back to newest
/// first.
pub fn apply_sort(items: &mut [Item], sort: SortMode) {
    sort_native(items, sort.store_sort());
    apply_derived_sort(items, sort);
}

/// Order each tier by `sort`, then concatenate title tier first
#[must_use]
pub fn merge_tiers(mut title: Vec<Item>, mut description_only: Vec<Item>, sort: SortMode) -> Vec<Item> {
    apply_sort(&mut title, sort);
    apply_sort(&mut description_only, sort);
    title.append(&mut description_only);
    title
}

/// Drop repeated identities, keeping the first (highest ranked) occurrence
#[must_use]
pub fn deduplicate(items: Vec<Item>) -> Vec<Item> {
    let mut seen: HashSet<ItemId> = HashSet::with_capacity(items.len());
    let mut deduplicated: Vec<Item> = Vec::with_capacity(items.len());

    for item in items {
        if seen.insert(item.id.clone()) {
            deduplicated.push(item);
        }
    }

    deduplicated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::types::Pricing;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn make_item(id: &str, title: &str, description: Option<&str>, pricing: Pricing) -> Item {
        Item {
            id: ItemId::from(id),
            title: title.to_string(),
            description: description.map(str::to_string),
            status: "published".into(),
            category_path: "events".into(),
            location: None,
            pricing,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn dated(id: &str, title: &str, minutes: i64, pricing: Pricing) -> Item {
        let mut item = make_item(id, title, None, pricing);
        item.created_at += Duration::minutes(minutes);
        item
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.id.0.as_str()).collect()
    }

    #[test]
    fn test_contains_term_is_case_insensitive() {
        assert!(contains_term("Wedding DJ", "wedding"));
        assert!(contains_term("great for a wedding", "WEDDING"));
        assert!(!contains_term("Photo booth", "wedding"));
    }

    #[test]
    fn test_subtract_by_id() {
        let title = vec![make_item("1", "a", None, Pricing::default())];
        let all = vec![
            make_item("2", "b", None, Pricing::default()),
            make_item("1", "a", None, Pricing::default()),
            make_item("3", "c", None, Pricing::default()),
        ];
        let rest = subtract_by_id(all, &id_set(&title));
        assert_eq!(ids(&rest), vec!["2", "3"]);
    }

    #[test]
    fn test_price_sort_is_stable() {
        let mut items = vec![
            make_item("a", "a", None, Pricing::fixed(50.0)),
            make_item("b", "b", None, Pricing::range(40.0, 60.0)),
            make_item("c", "c", None, Pricing::fixed(10.0)),
            make_item("d", "d", None, Pricing::fixed(50.0)),
        ];
        apply_derived_sort(&mut items, SortMode::PriceAsc);
        assert_eq!(ids(&items), vec!["c", "a", "b", "d"]);

        apply_derived_sort(&mut items, SortMode::PriceDesc);
        assert_eq!(ids(&items), vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn test_native_modes_leave_order_alone() {
        let mut items = vec![
            make_item("b", "b", None, Pricing::fixed(5.0)),
            make_item("a", "a", None, Pricing::fixed(1.0)),
        ];
        apply_derived_sort(&mut items, SortMode::TitleAsc);
        assert_eq!(ids(&items), vec!["b", "a"]);
    }

    #[test]
    fn test_merge_tiers_sorts_within_each_tier() {
        let title = vec![
            make_item("t1", "x", None, Pricing::fixed(300.0)),
            make_item("t2", "x", None, Pricing::fixed(100.0)),
        ];
        let rest = vec![
            make_item("d1", "y", None, Pricing::fixed(50.0)),
            make_item("d2", "y", None, Pricing::fixed(10.0)),
        ];
        let merged = merge_tiers(title, rest, SortMode::PriceAsc);
        assert_eq!(ids(&merged), vec!["t2", "t1", "d2", "d1"]);
    }

    #[test]
    fn test_apply_sort_orders_native_modes() {
        let unordered = vec![
            dated("2", "banana", 2, Pricing::default()),
            dated("1", "Cherry", 1, Pricing::default()),
            dated("3", "apple", 3, Pricing::default()),
        ];

        let mut items = unordered.clone();
        apply_sort(&mut items, SortMode::Oldest);
        assert_eq!(ids(&items), vec!["1", "2", "3"]);

        let mut items = unordered.clone();
        apply_sort(&mut items, SortMode::Newest);
        assert_eq!(ids(&items), vec!["3", "2", "1"]);

        let mut items = unordered.clone();
        apply_sort(&mut items, SortMode::TitleAsc);
        assert_eq!(ids(&items), vec!["3", "2", "1"]);

        let mut items = unordered;
        apply_sort(&mut items, SortMode::TitleDesc);
        assert_eq!(ids(&items), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_price_ties_fall_back_to_newest() {
        let mut items = vec![
            dated("old", "x", 1, Pricing::fixed(50.0)),
            dated("cheap", "x", 2, Pricing::fixed(10.0)),
            dated("new", "x", 3, Pricing::fixed(50.0)),
        ];
        apply_sort(&mut items, SortMode::PriceAsc);
        assert_eq!(ids(&items), vec!["cheap", "new", "old"]);
    }

    #[test]
    fn test_merge_tiers_orders_unsorted_tiers() {
        let title = vec![dated("t1", "b", 1, Pricing::default()), dated("t2", "a", 2, Pricing::default())];
        let rest = vec![dated("d1", "d", 3, Pricing::default()), dated("d2", "c", 4, Pricing::default())];
        let merged = merge_tiers(title, rest, SortMode::TitleAsc);
        assert_eq!(ids(&merged), vec!["t2", "t1", "d2", "d1"]);
    }

    #[test]
    fn test_deduplicate_keeps_first() {
        let items = vec![
            make_item("1", "first", None, Pricing::default()),
            make_item("2", "other", None, Pricing::default()),
            make_item("1", "second", None, Pricing::default()),
        ];
        let deduped = deduplicate(items);
        assert_eq!(ids(&deduped), vec!["1", "2"]);
        assert_eq!(deduped[0].title, "first");
    }

    proptest! {
        #[test]
        fn prop_price_asc_is_monotonic(prices in proptest::collection::vec(0.0f64..10_000.0, 0..40)) {
            let mut items: Vec<Item> = prices
                .iter()
                .enumerate()
                .map(|(i, p)| make_item(&i.to_string(), "x", None, Pricing::fixed(*p)))
                .collect();
            apply_derived_sort(&mut items, SortMode::PriceAsc);
            for pair in items.windows(2) {
                prop_assert!(pair[0].effective_price() <= pair[1].effective_price());
            }
        }
    }
}
