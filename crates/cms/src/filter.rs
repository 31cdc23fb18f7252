// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory filtering and ordering of normalized entities.

use crate::entity::{ContentEntity, EntityKind};
use crate::text::{make_slug, normalize_text};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Active-category sentinel meaning "no category constraint".
pub const ALL_CATEGORIES: &str = "all";

/// Service headings in display order. `depannage` shares the `sav` rank.
const SERVICE_ORDER: &[(&str, usize)] = &[
    ("vente", 0),
    ("installation", 1),
    ("entretien", 2),
    ("sav", 3),
    ("depannage", 3),
];

/// User-selected constraints. Empty lists and `None` bounds do not filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "type")]
    pub types: Vec<String>,
    #[serde(default, rename = "brand")]
    pub brands: Vec<String>,
    #[serde(default)]
    pub power_min: Option<f64>,
    #[serde(default)]
    pub power_max: Option<f64>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.category.as_deref().is_none_or(is_all)
            && self.types.is_empty()
            && self.brands.is_empty()
            && self.power_min.is_none()
            && self.power_max.is_none()
    }

    /// Does `entity` satisfy every constraint?
    pub fn matches(&self, entity: &ContentEntity) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|c| matches_category(entity, c));

        category_ok
            && matches_any(entity.product_type.as_deref(), &self.types)
            && matches_any(entity.brand.as_deref(), &self.brands)
            && self.matches_power(entity.power_kw)
    }

    /// Bounds apply independently, so an inverted range matches nothing.
    fn matches_power(&self, power: Option<f64>) -> bool {
        if self.power_min.is_none() && self.power_max.is_none() {
            return true;
        }
        let Some(power) = power else {
            return false;
        };
        self.power_min.is_none_or(|min| power >= min) && self.power_max.is_none_or(|max| power <= max)
    }
}

fn is_all(category: &str) -> bool {
    let folded = normalize_text(category);
    folded.is_empty() || folded == ALL_CATEGORIES
}

/// Category match on folded names or on slugs.
pub fn matches_category(entity: &ContentEntity, active: &str) -> bool {
    if is_all(active) {
        return true;
    }
    let wanted = normalize_text(active);
    let wanted_slug = make_slug(active);

    let slug_matches = |candidate: &str| !wanted_slug.is_empty() && make_slug(candidate) == wanted_slug;

    entity
        .categories
        .iter()
        .any(|name| normalize_text(name) == wanted || slug_matches(name.as_str()))
        || entity.category_slug.as_deref().is_some_and(slug_matches)
}

fn matches_any(value: Option<&str>, wanted: &[String]) -> bool {
    if wanted.is_empty() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    let value = normalize_text(value);
    wanted.iter().any(|w| normalize_text(w) == value)
}

/// Rank of a service post in the business ordering, `None` when unranked.
pub fn service_rank(entity: &ContentEntity) -> Option<usize> {
    let title = normalize_text(&entity.title);
    let slug = entity.slug.to_ascii_lowercase();
    SERVICE_ORDER.iter().find_map(|(key, rank)| {
        let hit = title == *key
            || title.starts_with(&format!("{} ", key))
            || slug == *key
            || slug.starts_with(&format!("{}-", key));
        hit.then_some(*rank)
    })
}

/// Total order over service posts: ranked before unranked, then by
/// ascending numeric id (id-less last). Equal keys keep input order.
fn service_order(a: &ContentEntity, b: &ContentEntity) -> Ordering {
    let key = |e: &ContentEntity| {
        let id = e.numeric_id();
        (service_rank(e).unwrap_or(usize::MAX), id.is_none(), id)
    };
    key(a).cmp(&key(b))
}

/// Keep the entities matching `filters` and `active_category`.
///
/// Lists made only of service posts are then put in business order; other
/// lists keep their input order.
pub fn filter_and_sort(
    entities: &[ContentEntity],
    filters: &FilterState,
    active_category: &str,
) -> Vec<ContentEntity> {
    let mut kept: Vec<ContentEntity> = entities
        .iter()
        .filter(|e| matches_category(e, active_category) && filters.matches(e))
        .cloned()
        .collect();

    if !kept.is_empty() && kept.iter().all(|e| e.kind == EntityKind::ServicePost) {
        kept.sort_by(service_order);
    }
    kept
}
