//! Composable filter conditions and the condition builder
//!
//! Conditions are a small predicate tree the store evaluates. The engine
//! builds them from a [`QueryDescriptor`] but never executes them itself.
//! A [`ConditionSet`] is a conjunction: every member must hold.

use serde::{Deserialize, Serialize};

use super::geo::{BoundingBox, LngSpan, bounding_box};
use super::query::QueryDescriptor;
use crate::config::EngineConfig;

/// Offer fields a condition can refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Id,
    Status,
    CategoryPath,
    Title,
    Description,
    Lat,
    Lng,
    IsPriceRange,
    Price,
    PriceFrom,
    PriceTo,
    CreatedAt,
}

/// Literal compared against a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// Predicate over a single offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Eq(Field, Value),
    /// `field LIKE 'prefix%'`
    StartsWith(Field, String),
    /// Case-insensitive `field LIKE '%needle%'`
    Contains(Field, String),
    Gte(Field, f64),
    Lte(Field, f64),
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    #[must_use]
    pub fn eq(field: Field, value: impl Into<Value>) -> Self {
        Condition::Eq(field, value.into())
    }

    #[must_use]
    pub fn starts_with(field: Field, prefix: impl Into<String>) -> Self {
        Condition::StartsWith(field, prefix.into())
    }

    #[must_use]
    pub fn contains(field: Field, needle: impl Into<String>) -> Self {
        Condition::Contains(field, needle.into())
    }

    #[must_use]
    pub fn gte(field: Field, bound: f64) -> Self {
        Condition::Gte(field, bound)
    }

    #[must_use]
    pub fn lte(field: Field, bound: f64) -> Self {
        Condition::Lte(field, bound)
    }

    #[must_use]
    pub fn and(conditions: Vec<Condition>) -> Self {
        Condition::And(conditions)
    }

    #[must_use]
    pub fn or(conditions: Vec<Condition>) -> Self {
        Condition::Or(conditions)
    }

    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(condition: Condition) -> Self {
        Condition::Not(Box::new(condition))
    }
}

/// Conjunction of conditions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionSet {
    conditions: Vec<Condition>,
}

impl ConditionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a condition in place
    pub fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    /// Append a condition, builder style
    #[must_use]
    pub fn with(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter()
    }

    /// The whole set as a single `And` node
    #[must_use]
    pub fn to_condition(&self) -> Condition {
        Condition::And(self.conditions.clone())
    }
}

impl FromIterator<Condition> for ConditionSet {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        Self {
            conditions: iter.into_iter().collect(),
        }
    }
}

impl Extend<Condition> for ConditionSet {
    fn extend<I: IntoIterator<Item = Condition>>(&mut self, iter: I) {
        self.conditions.extend(iter);
    }
}

/// Exact category or any category nested below it
#[must_use]
pub fn category_condition(path: &str) -> Condition {
    Condition::or(vec![
        Condition::eq(Field::CategoryPath, path),
        Condition::starts_with(Field::CategoryPath, format!("{path}/")),
    ])
}

/// Price bounds over both pricing representations
///
/// A fixed price must fall inside the bounds. A range only has to overlap
/// them: its upper end must reach `min` and its lower end must not exceed
/// `max`. Returns `None` when neither bound is set.
#[must_use]
pub fn price_condition(min: Option<f64>, max: Option<f64>) -> Option<Condition> {
    let mut parts = Vec::with_capacity(2);

    if let Some(min) = min {
        parts.push(Condition::or(vec![
            Condition::and(vec![
                Condition::eq(Field::IsPriceRange, false),
                Condition::gte(Field::Price, min),
            ]),
            Condition::and(vec![
                Condition::eq(Field::IsPriceRange, true),
                Condition::gte(Field::PriceTo, min),
            ]),
        ]));
    }

    if let Some(max) = max {
        parts.push(Condition::or(vec![
            Condition::and(vec![
                Condition::eq(Field::IsPriceRange, false),
                Condition::lte(Field::Price, max),
            ]),
            Condition::and(vec![
                Condition::eq(Field::IsPriceRange, true),
                Condition::lte(Field::PriceFrom, max),
            ]),
        ]));
    }

    match parts.len() {
        0 => None,
        1 => parts.pop(),
        _ => Some(Condition::and(parts)),
    }
}

/// Latitude/longitude rectangle as a store condition
#[must_use]
pub fn bounding_box_condition(bbox: &BoundingBox) -> Condition {
    let mut parts = vec![
        Condition::gte(Field::Lat, bbox.min_lat),
        Condition::lte(Field::Lat, bbox.max_lat),
    ];

    match bbox.lng {
        LngSpan::Any => {}
        LngSpan::Range { min, max } => {
            parts.push(Condition::gte(Field::Lng, min));
            parts.push(Condition::lte(Field::Lng, max));
        }
        LngSpan::Wrapped { east_of, west_of } => {
            parts.push(Condition::or(vec![
                Condition::gte(Field::Lng, east_of),
                Condition::lte(Field::Lng, west_of),
            ]));
        }
    }

    Condition::and(parts)
}

/// Term appears in the title
#[must_use]
pub fn title_condition(term: &str) -> Condition {
    Condition::contains(Field::Title, term)
}

/// Term appears in the title or the description
#[must_use]
pub fn text_condition(term: &str) -> Condition {
    Condition::or(vec![
        Condition::contains(Field::Title, term),
        Condition::contains(Field::Description, term),
    ])
}

/// Everything the orchestrator needs to query the store for one request
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConditions {
    /// Caller base conditions plus category, price and bounding box
    pub filters: ConditionSet,
    /// Title tier predicate, present when a search term is active
    pub title: Option<Condition>,
    /// Title-or-description predicate, present when a search term is active
    pub text: Option<Condition>,
}

impl SearchConditions {
    /// Filters plus the text predicate: every offer that matches at all
    #[must_use]
    pub fn all_matches(&self) -> ConditionSet {
        let mut set = self.filters.clone();
        if let Some(text) = &self.text {
            set.push(text.clone());
        }
        set
    }

    /// Filters plus the title predicate
    #[must_use]
    pub fn title_tier(&self) -> ConditionSet {
        let mut set = self.filters.clone();
        if let Some(title) = &self.title {
            set.push(title.clone());
        }
        set
    }
}

/// Translate a descriptor into store conditions
///
/// `base` carries caller-owned visibility rules (for example "published
/// only") and is always included unchanged. The bounding box is built from
/// the search radius widened by the maximum service radius, since it only
/// pre-filters; exact distance pruning happens after the fetch.
#[must_use]
pub fn build_conditions(
    base: &ConditionSet,
    descriptor: &QueryDescriptor,
    config: &EngineConfig,
) -> SearchConditions {
    let mut filters = base.clone();

    if let Some(path) = &descriptor.category_path {
        filters.push(category_condition(path));
    }

    if let Some(geo) = &descriptor.geo {
        let expanded_radius = geo.radius_km + config.max_service_radius_km();
        let bbox = bounding_box(geo.lat, geo.lng, expanded_radius);
        filters.push(bounding_box_condition(&bbox));
    }

    if let Some(price) = price_condition(descriptor.price_min, descriptor.price_max) {
        filters.push(price);
    }

    let term = descriptor.search_term.as_deref();

    SearchConditions {
        filters,
        title: term.map(title_condition),
        text: term.map(text_condition),
    }
}
