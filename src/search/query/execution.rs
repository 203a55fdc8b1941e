//! Search query execution logic
//!
//! Picks one of four retrieval strategies from the descriptor and runs it
//! against the store:
//!
//! 1. **Geo**: unbounded fetches through the bounding box (one per tier when
//!    a search term is active), exact distance pruning, in-memory
//!    tiering/sorting, then slicing.
//! 2. **Search, native sort**: two-tier retrieval where the store orders
//!    and slices each tier.
//! 3. **Search, derived sort**: both tiers fetched in full, subtracted by
//!    identity, sorted per tier, then sliced.
//! 4. **Plain**: one paginated fetch, or an unbounded fetch plus in-memory
//!    sort.
//!
//! Unbounded fetches may come back in any order, so their results are always
//! sorted in memory before slicing. Every strategy ends with an identity
//! dedup.

use futures::try_join;
use std::collections::HashSet;

use super::parsing::{GeoQuery, QueryDescriptor};
use super::results::{Pagination, ResultPage};
use crate::config::EngineConfig;
use crate::search::conditions::{ConditionSet, SearchConditions, build_conditions};
use crate::search::errors::SearchResult;
use crate::search::geo::filter_by_distance;
use crate::search::ranking::{apply_sort, deduplicate, id_set, merge_tiers, subtract_by_id};
use crate::search::types::{Item, ItemId};
use crate::store::{FindRequest, NativeSort, OfferStore};

/// Retrieval strategy chosen per request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalStrategy {
    Geo,
    SearchNativeSort,
    SearchDerivedSort,
    Plain,
}

impl RetrievalStrategy {
    /// Geo wins over everything, then search, then plain
    #[must_use]
    pub fn select(descriptor: &QueryDescriptor) -> Self {
        match (
            descriptor.geo.is_some(),
            descriptor.has_search(),
            descriptor.sort.is_derived(),
        ) {
            (true, _, _) => RetrievalStrategy::Geo,
            (false, true, false) => RetrievalStrategy::SearchNativeSort,
            (false, true, true) => RetrievalStrategy::SearchDerivedSort,
            (false, false, _) => RetrievalStrategy::Plain,
        }
    }
}

/// Run a search for `descriptor` against `store`
pub(crate) async fn execute_search_query<S: OfferStore>(
    store: &S,
    config: &EngineConfig,
    base: &ConditionSet,
    descriptor: &QueryDescriptor,
) -> SearchResult<ResultPage> {
    let strategy = RetrievalStrategy::select(descriptor);
    let conditions = build_conditions(base, descriptor, config);

    tracing::debug!(
        strategy = ?strategy,
        page = descriptor.page,
        page_size = descriptor.page_size,
        sort = ?descriptor.sort,
        filters = conditions.filters.len(),
        "Executing offer search"
    );

    let run = Execution {
        store,
        config,
        descriptor,
        conditions,
        sort: descriptor.sort.store_sort(),
    };

    let (items, pagination) = match (strategy, descriptor.geo) {
        (RetrievalStrategy::Geo, Some(geo)) => run.geo(geo).await?,
        (RetrievalStrategy::SearchNativeSort, _) => run.two_tier().await?,
        (RetrievalStrategy::SearchDerivedSort, _) => run.full_tiers().await?,
        _ => run.plain().await?,
    };

    Ok(ResultPage::new(deduplicate(items), pagination))
}

/// Title tier deduplicated, and all matches minus every title identity
fn split_tiers(title: Vec<Item>, all: Vec<Item>) -> (Vec<Item>, Vec<Item>) {
    let title = deduplicate(title);
    let description_only = subtract_by_id(all, &id_set(&title));
    (title, description_only)
}

struct Execution<'a, S> {
    store: &'a S,
    config: &'a EngineConfig,
    descriptor: &'a QueryDescriptor,
    conditions: SearchConditions,
    /// Ordering requested from the store
    sort: NativeSort,
}

impl<S: OfferStore> Execution<'_, S> {
    fn page_size(&self) -> usize {
        self.descriptor.page_size
    }

    fn paginate(&self, total_items: usize) -> Pagination {
        Pagination::compute(total_items, self.page_size(), self.descriptor.page)
    }

    /// Rank a complete candidate list in memory and slice the page
    fn slice_ranked(&self, ranked: Vec<Item>) -> (Vec<Item>, Pagination) {
        let ranked = deduplicate(ranked);
        let pagination = self.paginate(ranked.len());
        (pagination.slice(ranked), pagination)
    }

    /// Strategy 1
    ///
    /// Store-side pagination would page over the box, not the circle, so
    /// everything inside the box is fetched and pruned before slicing. With
    /// a search term the title tier is fetched through the store's own title
    /// predicate, the same way the non-geo strategies split tiers.
    async fn geo(&self, geo: GeoQuery) -> SearchResult<(Vec<Item>, Pagination)> {
        let within_radius =
            |items: Vec<Item>| filter_by_distance(items, geo.lat, geo.lng, geo.radius_km);

        let ranked = if self.descriptor.has_search() {
            let (title, all) = self.fetch_both_tiers().await?;
            let candidates = all.len();
            let (title, description_only) = split_tiers(within_radius(title), within_radius(all));

            tracing::debug!(
                candidates,
                title_tier = title.len(),
                description_tier = description_only.len(),
                radius_km = geo.radius_km,
                "Applied distance filter to both tiers"
            );

            merge_tiers(title, description_only, self.descriptor.sort)
        } else {
            let page = self
                .store
                .find(&self.conditions.all_matches(), FindRequest::unbounded(self.sort))
                .await?;

            let candidates = page.items.len();
            let mut nearby = within_radius(page.items);

            tracing::debug!(
                candidates,
                within_radius = nearby.len(),
                radius_km = geo.radius_km,
                "Applied distance filter"
            );

            apply_sort(&mut nearby, self.descriptor.sort);
            nearby
        };

        Ok(self.slice_ranked(ranked))
    }

    /// Unbounded `(title tier, all matches)`, in no particular order
    async fn fetch_both_tiers(&self) -> SearchResult<(Vec<Item>, Vec<Item>)> {
        let title_conditions = self.conditions.title_tier();
        let all_conditions = self.conditions.all_matches();

        let (title_page, all_page) = try_join!(
            self.store
                .find(&title_conditions, FindRequest::unbounded(self.sort)),
            self.store
                .find(&all_conditions, FindRequest::unbounded(self.sort)),
        )?;

        Ok((title_page.items, all_page.items))
    }

    /// Strategy 3, and strategy 2 below the full-fetch threshold
    async fn full_tiers(&self) -> SearchResult<(Vec<Item>, Pagination)> {
        let (title, all) = self.fetch_both_tiers().await?;
        let (title, description_only) = split_tiers(title, all);

        tracing::debug!(
            title_tier = title.len(),
            description_tier = description_only.len(),
            "Fetched both tiers in full"
        );

        Ok(self.slice_ranked(merge_tiers(title, description_only, self.descriptor.sort)))
    }

    /// Strategy 2
    ///
    /// The store knows nothing about tiers, so the title tier is paged
    /// natively and the description-only tier is recovered by scanning the
    /// all-matches set with every title identity excluded.
    async fn two_tier(&self) -> SearchResult<(Vec<Item>, Pagination)> {
        let title_conditions = self.conditions.title_tier();
        let all_conditions = self.conditions.all_matches();

        let (title_count, all_count) = try_join!(
            self.store.count(&title_conditions),
            self.store.count(&all_conditions),
        )?;

        if title_count > all_count {
            tracing::warn!(
                title_count,
                all_count,
                "Title tier larger than all matches, counts raced a write"
            );
        }

        let description_count = all_count.saturating_sub(title_count);
        let total_items = all_count.max(title_count);

        if total_items == 0 {
            return Ok((Vec::new(), self.paginate(0)));
        }

        if all_count <= self.config.full_fetch_threshold() {
            return self.full_tiers().await;
        }

        let pagination = self.paginate(total_items);
        let offset = pagination.offset();
        let page_size = self.page_size();

        tracing::debug!(
            title_count,
            description_count,
            offset,
            current_page = pagination.current_page,
            "Two-tier windowed retrieval"
        );

        let items = if offset < title_count {
            let page = self
                .store
                .find(
                    &title_conditions,
                    FindRequest::page(pagination.current_page, page_size, self.sort),
                )
                .await?;

            let mut items = page.items;
            items.truncate(page_size);

            let remaining = page_size.saturating_sub(items.len());
            if remaining > 0 && description_count > 0 {
                let fill = self
                    .description_window(&title_conditions, &all_conditions, 0, remaining)
                    .await?;
                items.extend(fill);
            }
            items
        } else {
            self.description_window(
                &title_conditions,
                &all_conditions,
                offset - title_count,
                page_size,
            )
            .await?
        };

        Ok((items, pagination))
    }

    /// Description-only offers `[skip, skip + take)` in store order
    ///
    /// Scans the all-matches set window by window, dropping title-tier
    /// identities, until enough offers are collected or the store runs out.
    async fn description_window(
        &self,
        title_conditions: &ConditionSet,
        all_conditions: &ConditionSet,
        skip: usize,
        take: usize,
    ) -> SearchResult<Vec<Item>> {
        let exclude: HashSet<ItemId> = id_set(
            &self
                .store
                .find(title_conditions, FindRequest::unbounded(self.sort))
                .await?
                .items,
        );

        let window = self.config.scan_window();
        let mut store_page = 1;
        let mut skipped = 0;
        let mut collected: Vec<Item> = Vec::with_capacity(take);

        'scan: loop {
            let page = self
                .store
                .find(all_conditions, FindRequest::page(store_page, window, self.sort))
                .await?;

            let fetched = page.items.len();
            let has_next = page.has_next;

            for item in page.items {
                if exclude.contains(&item.id) {
                    continue;
                }
                if skipped < skip {
                    skipped += 1;
                    continue;
                }
                collected.push(item);
                if collected.len() >= take {
                    break 'scan;
                }
            }

            if fetched < window || !has_next {
                break;
            }
            store_page += 1;
        }

        tracing::debug!(
            skip,
            take,
            collected = collected.len(),
            excluded = exclude.len(),
            store_pages = store_page,
            "Scanned description-only tier"
        );

        Ok(collected)
    }

    /// Strategy 4
    async fn plain(&self) -> SearchResult<(Vec<Item>, Pagination)> {
        let conditions = self.conditions.all_matches();

        if self.descriptor.sort.is_derived() {
            let page = self
                .store
                .find(&conditions, FindRequest::unbounded(self.sort))
                .await?;
            let mut items = page.items;
            apply_sort(&mut items, self.descriptor.sort);
            return Ok(self.slice_ranked(items));
        }

        let page_size = self.page_size();
        let mut page = self
            .store
            .find(
                &conditions,
                FindRequest::page(self.descriptor.page, page_size, self.sort),
            )
            .await?;
        let mut pagination = self.paginate(page.total_items);

        if pagination.current_page != self.descriptor.page {
            tracing::debug!(
                requested = self.descriptor.page,
                clamped = pagination.current_page,
                "Requested page out of range, fetching last page"
            );
            page = self
                .store
                .find(
                    &conditions,
                    FindRequest::page(pagination.current_page, page_size, self.sort),
                )
                .await?;
            pagination =
                Pagination::compute(page.total_items, page_size, pagination.current_page);
        }

        let mut items = page.items;
        items.truncate(page_size);
        Ok((items, pagination))
    }
}
