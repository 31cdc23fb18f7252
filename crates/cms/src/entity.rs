// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Normalization of CMS entities into one flat record.
//!
//! Articles, products and service posts are handled identically. The raw
//! entity may be flat (`{id, title, ...}`) or wrapped (`{id, attributes:
//! {title, ...}}`); both produce the same [`ContentEntity`].

use crate::fields::{self, scalar_text};
use crate::media::MediaReference;
use crate::text::{make_slug, normalize_text, parse_decimal};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const NO_CATEGORY_LABEL: &str = "Aucune catégorie";

/// Which collection an entity comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Article,
    Product,
    ServicePost,
}

impl EntityKind {
    /// Collection path under the API root.
    pub fn resource(self) -> &'static str {
        match self {
            EntityKind::Article => "articles",
            EntityKind::Product => "products",
            EntityKind::ServicePost => "blog-posts",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Article => "article",
            EntityKind::Product => "product",
            EntityKind::ServicePost => "service",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_text(s).as_str() {
            "article" | "articles" | "actualite" | "actualites" | "news" => Ok(EntityKind::Article),
            "product" | "products" | "produit" | "produits" => Ok(EntityKind::Product),
            "service" | "services" | "blog-post" | "blog-posts" => Ok(EntityKind::ServicePost),
            other => Err(format!("unknown entity kind '{}'", other)),
        }
    }
}

/// Stable identifier: numeric row id, or a string document id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityId {
    Numeric(i64),
    Document(String),
}

impl EntityId {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(EntityId::Numeric),
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    None
                } else if let Ok(n) = s.parse::<i64>() {
                    Some(EntityId::Numeric(n))
                } else {
                    Some(EntityId::Document(s.to_string()))
                }
            }
            _ => None,
        }
    }

    pub fn numeric(&self) -> Option<i64> {
        match self {
            EntityId::Numeric(n) => Some(*n),
            EntityId::Document(_) => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Numeric(n) => write!(f, "{}", n),
            EntityId::Document(s) => f.write_str(s),
        }
    }
}

/// Body text: an HTML string or a list of text blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Content {
    #[default]
    Empty,
    Html(String),
    Blocks(Vec<String>),
}

impl Content {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) if !s.trim().is_empty() => Content::Html(s.clone()),
            Some(Value::Array(items)) => {
                let blocks: Vec<String> = items.iter().filter_map(block_text).collect();
                if blocks.is_empty() {
                    Content::Empty
                } else {
                    Content::Blocks(blocks)
                }
            }
            Some(v @ (Value::Number(_) | Value::Bool(_))) => Content::Html(v.to_string()),
            _ => Content::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Content::Empty)
    }
}

/// One normalized article, product or service post.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentEntity {
    pub kind: EntityKind,
    pub id: Option<EntityId>,
    pub document_id: Option<String>,
    /// Upstream slug, or one derived from the title. May be empty.
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub excerpt: String,
    pub content: Content,
    pub published_at: Option<String>,
    pub updated_at: Option<String>,
    pub cover: MediaReference,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub category_slug: Option<String>,
    pub href: Option<String>,
    pub product_type: Option<String>,
    pub brand: Option<String>,
    pub power_kw: Option<f64>,
    pub source: String,
    pub source_id: Option<String>,
    pub source_url: Option<String>,
}

impl ContentEntity {
    pub fn numeric_id(&self) -> Option<i64> {
        self.id.as_ref().and_then(EntityId::numeric)
    }

    /// Categories joined for display.
    pub fn categories_label(&self) -> String {
        if self.categories.is_empty() {
            NO_CATEGORY_LABEL.to_string()
        } else {
            self.categories.join(", ")
        }
    }

    /// Display label for the product type.
    pub fn type_label(&self) -> Option<String> {
        self.product_type.as_deref().map(type_label)
    }
}

/// Display label for a product type value.
pub fn type_label(value: &str) -> String {
    match normalize_text(value).as_str() {
        "air" => "Air".to_string(),
        "canalisable" => "Canalisable".to_string(),
        "etanche" => "Étanche".to_string(),
        "hydro" => "Hydro".to_string(),
        _ => value.to_string(),
    }
}

/// Normalize one raw entity. Never fails: missing fields become `None`,
/// empty strings or empty lists.
pub fn normalize(kind: EntityKind, raw: &Value) -> ContentEntity {
    let obj = flatten(raw);

    let title = fields::TITLE.text(&obj).unwrap_or_default();
    let slug = fields::SLUG
        .text(&obj)
        .unwrap_or_else(|| make_slug(&title));
    let categories = extract_categories(&obj);
    let category_slug = extract_category_slug(&obj, &categories);

    ContentEntity {
        kind,
        id: fields::ID.resolve(&obj).and_then(EntityId::from_value),
        document_id: fields::DOCUMENT_ID.text(&obj),
        slug,
        title,
        subtitle: fields::SUBTITLE.text(&obj),
        excerpt: fields::EXCERPT.text(&obj).unwrap_or_default(),
        content: Content::from_value(fields::CONTENT.resolve(&obj)),
        published_at: fields::PUBLISHED_AT.text(&obj),
        updated_at: fields::UPDATED_AT.text(&obj),
        cover: extract_cover(&obj),
        tags: extract_tags(&obj),
        categories,
        category_slug,
        href: fields::HREF.text(&obj),
        product_type: fields::TYPE.text(&obj),
        brand: fields::BRAND.text(&obj),
        power_kw: fields::POWER.resolve(&obj).and_then(parse_power),
        source: fields::SOURCE.text(&obj).unwrap_or_else(|| "manual".to_string()),
        source_id: fields::SOURCE_ID.text(&obj),
        source_url: fields::SOURCE_URL.text(&obj),
    }
}

/// Normalize every element of a list response, skipping non-objects.
pub fn normalize_all(kind: EntityKind, items: &[Value]) -> Vec<ContentEntity> {
    items
        .iter()
        .filter(|v| v.is_object())
        .map(|v| normalize(kind, v))
        .collect()
}

/// Power in kW from a number or a loosely formatted string.
pub fn parse_power(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

/// Lift an `attributes` envelope to the top level, keeping the outer ids.
fn flatten(raw: &Value) -> Map<String, Value> {
    let Some(obj) = raw.as_object() else {
        return Map::new();
    };
    match obj.get("attributes").and_then(Value::as_object) {
        Some(attrs) => {
            let mut flat = Map::new();
            for key in ["id", "documentId"] {
                if let Some(v) = obj.get(key) {
                    flat.insert(key.to_string(), v.clone());
                }
            }
            for (k, v) in attrs {
                flat.insert(k.clone(), v.clone());
            }
            flat
        }
        None => obj.clone(),
    }
}

/// First cover candidate that decodes to an actual asset.
fn extract_cover(obj: &Map<String, Value>) -> MediaReference {
    fields::COVER
        .candidates
        .iter()
        .filter_map(|key| obj.get(*key))
        .map(MediaReference::from_value)
        .find(|m| !m.is_missing())
        .unwrap_or_default()
}

/// The `attributes` of a relation node, or the node itself when flattened.
fn relation_attrs(node: &Value) -> &Value {
    node.get("attributes").filter(|a| a.is_object()).unwrap_or(node)
}

fn relation_field(node: &Value, keys: &[&str]) -> Option<String> {
    if let Some(s) = node.as_str() {
        return scalar_text(&Value::String(s.to_string()));
    }
    let attrs = relation_attrs(node);
    keys.iter().find_map(|k| attrs.get(*k).and_then(scalar_text))
}

/// Category names from every known relation shape, unioned in order:
/// nested multi, flattened multi, nested single, flattened single.
fn extract_categories(obj: &Map<String, Value>) -> Vec<String> {
    let mut names = Vec::new();

    if let Some(many) = obj.get("categories") {
        if let Some(items) = many.get("data").and_then(Value::as_array) {
            names.extend(items.iter().filter_map(|c| relation_field(c, &["name"])));
        }
        if let Some(items) = many.as_array() {
            names.extend(items.iter().filter_map(|c| relation_field(c, &["name"])));
        }
    }

    if let Some(one) = obj.get("category") {
        if let Some(node) = one.get("data").filter(|d| d.is_object()) {
            names.extend(relation_field(node, &["name"]));
        }
        if one.get("data").is_none() {
            names.extend(relation_field(one, &["name"]));
        }
    }

    let mut seen = Vec::new();
    names.retain(|name| {
        let key = normalize_text(name);
        if seen.contains(&key) {
            false
        } else {
            seen.push(key);
            true
        }
    });
    names
}

/// URL segment for the entity's category.
fn extract_category_slug(obj: &Map<String, Value>, categories: &[String]) -> Option<String> {
    let explicit = obj.get("category").and_then(|one| {
        let node = one.get("data").unwrap_or(one);
        if node.is_object() {
            relation_field(node, &["slug"])
        } else {
            None
        }
    });
    explicit
        .or_else(|| {
            let many = obj.get("categories")?;
            let first = many
                .get("data")
                .and_then(Value::as_array)
                .or_else(|| many.as_array())?
                .first()?;
            if first.is_object() {
                relation_field(first, &["slug"])
            } else {
                None
            }
        })
        .or_else(|| categories.first().map(|c| make_slug(c)))
        .filter(|s| !s.is_empty())
}

/// Tags from the first shape that yields any: a flat list of strings or
/// `{name|title}` objects, then a nested `tags.data[]` relation.
fn extract_tags(obj: &Map<String, Value>) -> Vec<String> {
    let Some(tags) = obj.get("tags") else {
        return Vec::new();
    };

    let strategies: [&dyn Fn(&Value) -> Vec<String>; 2] = [
        &|tags| {
            tags.as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|t| relation_field(t, &["name", "title"]))
                        .collect()
                })
                .unwrap_or_default()
        },
        &|tags| {
            tags.get("data")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|t| {
                            relation_field(t, &["name", "title"])
                                .or_else(|| t.get("id").and_then(scalar_text))
                        })
                        .collect()
                })
                .unwrap_or_default()
        },
    ];

    strategies
        .iter()
        .map(|strategy| strategy(tags))
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}

/// Plain text of one content block.
fn block_text(block: &Value) -> Option<String> {
    match block {
        Value::String(s) => Some(s.clone()).filter(|s| !s.trim().is_empty()),
        Value::Number(_) | Value::Bool(_) => Some(block.to_string()),
        Value::Object(obj) => {
            if let Some(children) = obj.get("children").and_then(Value::as_array) {
                let text: String = children.iter().filter_map(block_text).collect();
                Some(text).filter(|t| !t.trim().is_empty())
            } else {
                obj.get("text").and_then(Value::as_str).map(str::to_string)
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn article_attrs() -> Value {
        json!({
            "slug": "nouveau-poele",
            "title": "Nouveau poêle",
            "excerpt": "Résumé",
            "content": "<p>Texte</p>",
            "publishedAt": "2024-05-02T08:00:00.000Z",
            "updatedAt": "2024-05-03T08:00:00.000Z",
            "cover": { "data": { "id": 4, "attributes": { "url": "/uploads/p.jpg" } } },
            "tags": { "data": [ { "id": 1, "attributes": { "name": "granulés" } } ] },
            "categories": { "data": [ { "id": 2, "attributes": { "name": "Poêles", "slug": "poeles" } } ] }
        })
    }

    #[test]
    fn test_wrapped_and_flat_are_identical() {
        let wrapped = json!({ "id": 7, "attributes": article_attrs() });
        let mut flat = article_attrs();
        flat["id"] = json!(7);
        let a = normalize(EntityKind::Article, &wrapped);
        let b = normalize(EntityKind::Article, &flat);
        assert_eq!(a, b);
        assert_eq!(a.id, Some(EntityId::Numeric(7)));
        assert_eq!(a.title, "Nouveau poêle");
        assert_eq!(a.content, Content::Html("<p>Texte</p>".to_string()));
        assert_eq!(a.tags, vec!["granulés"]);
        assert_eq!(a.categories, vec!["Poêles"]);
        assert_eq!(a.category_slug.as_deref(), Some("poeles"));
        assert!(!a.cover.is_missing());
    }

    #[test]
    fn test_absent_fields_are_empty() {
        let e = normalize(EntityKind::Product, &json!({}));
        assert_eq!(e.id, None);
        assert_eq!(e.slug, "");
        assert_eq!(e.title, "");
        assert_eq!(e.excerpt, "");
        assert!(e.content.is_empty());
        assert_eq!(e.published_at, None);
        assert!(e.cover.is_missing());
        assert!(e.tags.is_empty());
        assert!(e.categories.is_empty());
        assert_eq!(e.category_slug, None);
        assert_eq!(e.power_kw, None);
        assert_eq!(e.source, "manual");
        assert_eq!(e.categories_label(), NO_CATEGORY_LABEL);

        let not_object = normalize(EntityKind::Article, &json!("oops"));
        assert_eq!(not_object.title, "");
    }

    #[test]
    fn test_slug_derived_from_title() {
        let e = normalize(EntityKind::ServicePost, &json!({ "id": 1, "title": "Entretien & Ramonage" }));
        assert_eq!(e.slug, "entretien-ramonage");
        let e = normalize(EntityKind::ServicePost, &json!({ "id": 1, "title": "X", "slug": "given" }));
        assert_eq!(e.slug, "given");
    }

    #[test]
    fn test_date_fallback_chain() {
        let e = normalize(EntityKind::Article, &json!({ "date": "2023-01-01", "createdAt": "2022-01-01" }));
        assert_eq!(e.published_at.as_deref(), Some("2023-01-01"));
        let e = normalize(EntityKind::Article, &json!({ "publishedAt": null, "createdAt": "2022-01-01" }));
        assert_eq!(e.published_at.as_deref(), Some("2022-01-01"));
        assert_eq!(e.updated_at, None);
    }

    #[test]
    fn test_categories_are_unioned_across_shapes() {
        let e = normalize(
            EntityKind::Product,
            &json!({
                "categories": [ { "name": "Poêles à bois" }, { "name": "Inserts" } ],
                "category": { "data": { "attributes": { "name": "Poêles a bois" } } }
            }),
        );
        // The single relation duplicates the first after folding
        assert_eq!(e.categories, vec!["Poêles à bois", "Inserts"]);
        assert_eq!(e.category_slug.as_deref(), Some("poeles-a-bois"));

        let e = normalize(EntityKind::ServicePost, &json!({ "category": "Dépannage" }));
        assert_eq!(e.categories, vec!["Dépannage"]);
        assert_eq!(e.category_slug.as_deref(), Some("depannage"));

        let e = normalize(
            EntityKind::ServicePost,
            &json!({ "category": { "data": { "attributes": { "name": "Vente", "slug": "ventes" } } } }),
        );
        assert_eq!(e.category_slug.as_deref(), Some("ventes"));
    }

    #[test]
    fn test_tags_take_first_shape_only() {
        let e = normalize(EntityKind::Article, &json!({ "tags": ["a", { "name": "b" }, { "title": "c" }] }));
        assert_eq!(e.tags, vec!["a", "b", "c"]);
        let e = normalize(
            EntityKind::Article,
            &json!({ "tags": { "data": [ { "id": 3, "attributes": {} }, { "attributes": { "title": "t" } } ] } }),
        );
        assert_eq!(e.tags, vec!["3", "t"]);
        let e = normalize(EntityKind::Article, &json!({ "tags": [] }));
        assert!(e.tags.is_empty());
    }

    #[test]
    fn test_product_fields() {
        let e = normalize(
            EntityKind::Product,
            &json!({
                "id": "12",
                "attributes": {
                    "title": "Poêle MCZ Ego",
                    "Type": "etanche",
                    "marque": "MCZ",
                    "puissance": "7,5 kW",
                    "image": [ { "url": "/uploads/ego.jpg" } ],
                    "href": "/products/ego"
                }
            }),
        );
        assert_eq!(e.id, Some(EntityId::Numeric(12)));
        assert_eq!(e.product_type.as_deref(), Some("etanche"));
        assert_eq!(e.type_label().as_deref(), Some("Étanche"));
        assert_eq!(e.brand.as_deref(), Some("MCZ"));
        assert_eq!(e.power_kw, Some(7.5));
        assert_eq!(e.href.as_deref(), Some("/products/ego"));
        assert!(!e.cover.is_missing());
    }

    #[test]
    fn test_cover_skips_empty_relation() {
        let e = normalize(
            EntityKind::ServicePost,
            &json!({ "cover": { "data": null }, "image": "/uploads/svc.jpg" }),
        );
        assert_eq!(e.cover, MediaReference::Url("/uploads/svc.jpg".to_string()));
    }

    #[test]
    fn test_document_id_and_legacy_fields() {
        let e = normalize(
            EntityKind::Article,
            &json!({ "documentId": "abc123", "titre": "Salon", "descriptionCourte": "Court" }),
        );
        assert_eq!(e.id, Some(EntityId::Document("abc123".to_string())));
        assert_eq!(e.document_id.as_deref(), Some("abc123"));
        assert_eq!(e.numeric_id(), None);
        assert_eq!(e.title, "Salon");
        assert_eq!(e.excerpt, "Court");
    }

    #[test]
    fn test_block_content() {
        let e = normalize(
            EntityKind::Article,
            &json!({ "content": [
                { "type": "paragraph", "children": [ { "text": "Bonjour " }, { "text": "à tous" } ] },
                "Deuxième",
                { "type": "paragraph", "children": [] }
            ] }),
        );
        assert_eq!(
            e.content,
            Content::Blocks(vec!["Bonjour à tous".to_string(), "Deuxième".to_string()])
        );
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Actualités".parse::<EntityKind>(), Ok(EntityKind::Article));
        assert_eq!("products".parse::<EntityKind>(), Ok(EntityKind::Product));
        assert_eq!("services".parse::<EntityKind>(), Ok(EntityKind::ServicePost));
        assert!("widgets".parse::<EntityKind>().is_err());
        assert_eq!(EntityKind::ServicePost.resource(), "blog-posts");
    }
}
