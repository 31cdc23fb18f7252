// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Detail lookups by slug, each trying several query strategies in turn.
//!
//! A strategy that answers 404 or returns no data counts as a miss. When
//! every strategy misses the lookup fails with [`CmsError::NotFound`]; any
//! other HTTP failure aborts the lookup immediately.

use crate::client::{Client, Transport};
use crate::entity::{ContentEntity, EntityKind, normalize};
use crate::error::{CmsError, Result};
use crate::query::{QueryParams, QueryValue};
use crate::text::normalize_text;
use diagnostics::*;
use serde_json::Value;

/// Service headings addressed by short URL slugs.
const SERVICE_TITLES: &[(&str, &str)] = &[
    ("installation", "Installation"),
    ("entretien", "Entretien"),
    ("vente", "Vente"),
    ("sav", "Dépannage"),
    ("depannage", "Dépannage"),
];

/// Page size for the last-resort service scan.
const SERVICE_SCAN_SIZE: u32 = 50;

fn eq_filter(field: &str, value: &str) -> QueryValue {
    QueryValue::map([(field, QueryValue::map([("$eq", value)]))])
}

fn article_populate() -> QueryValue {
    QueryValue::map([("cover", "*"), ("tags", "true")])
}

/// Title a service slug stands for: a known heading, else the slug with
/// dashes read as spaces.
pub fn service_title_for_slug(slug: &str) -> String {
    let key = slug.trim().to_ascii_lowercase();
    SERVICE_TITLES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, title)| title.to_string())
        .unwrap_or_else(|| slug.replace('-', " ").trim().to_string())
}

impl<T: Transport> Client<T> {
    /// A list request where 404 just means "nothing here".
    async fn list_or_empty(&self, resource: &str, params: &QueryParams) -> Result<Vec<Value>> {
        match self.fetch_list(resource, params).await {
            Ok(page) => Ok(page.items),
            Err(err) if err.status() == Some(404) => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }

    /// Published article with the given slug.
    pub async fn find_article(&self, slug: &str) -> Result<ContentEntity> {
        let params = QueryParams::new()
            .with("populate", article_populate())
            .with("filters", eq_filter("slug", slug))
            .with("publicationState", "live");

        let items = self.list_or_empty(EntityKind::Article.resource(), &params).await?;
        items
            .first()
            .map(|raw| normalize(EntityKind::Article, raw))
            .ok_or_else(|| CmsError::not_found(EntityKind::Article.label(), slug))
    }

    /// Product at `/products/<slug>`: by `href`, then by `slug`, then by
    /// treating the slug as an id or document id.
    pub async fn find_product(&self, slug: &str) -> Result<ContentEntity> {
        let resource = EntityKind::Product.resource();
        let requested_path = format!("/products/{}", slug);

        for (field, value) in [("href", requested_path.as_str()), ("slug", slug)] {
            let params = QueryParams::new()
                .with("filters", eq_filter(field, value))
                .with("populate", "*");
            let items = self.list_or_empty(resource, &params).await?;
            if let Some(raw) = items.first() {
                debug!("Product {slug} matched by {field}", slug: slug, field: field);
                return Ok(normalize(EntityKind::Product, raw));
            }
        }

        let params = QueryParams::new().with("populate", "*");
        match self.fetch_one(resource, slug, &params).await? {
            Some(raw) => {
                debug!("Product {slug} matched by id", slug: slug);
                Ok(normalize(EntityKind::Product, &raw))
            }
            None => Err(CmsError::not_found(EntityKind::Product.label(), slug)),
        }
    }

    /// Service post for `slug`, optionally with a legacy numeric `id`.
    ///
    /// Tries a case-insensitive title match, then `id`, then scans the first
    /// page of posts for a title containing the wanted one, settling for
    /// the first post when none does.
    pub async fn find_service(&self, slug: &str, id: Option<&str>) -> Result<ContentEntity> {
        let resource = EntityKind::ServicePost.resource();
        let wanted = service_title_for_slug(slug);

        let params = QueryParams::new()
            .with(
                "filters",
                QueryValue::map([("title", QueryValue::map([("$containsi", wanted.as_str())]))]),
            )
            .with("populate", "*")
            .with("publicationState", "live")
            .with("pagination", QueryValue::map([("page", 1u32), ("pageSize", 1u32)]));
        let items = self.list_or_empty(resource, &params).await?;
        if let Some(raw) = items.first() {
            return Ok(normalize(EntityKind::ServicePost, raw));
        }

        if let Some(id) = id.filter(|id| !id.trim().is_empty()) {
            let params = QueryParams::new().with("populate", "*");
            if let Some(raw) = self.fetch_one(resource, id, &params).await? {
                return Ok(normalize(EntityKind::ServicePost, &raw));
            }
        }

        let params = QueryParams::new()
            .with("populate", "*")
            .with("publicationState", "live")
            .with(
                "pagination",
                QueryValue::map([("page", 1u32), ("pageSize", SERVICE_SCAN_SIZE)]),
            );
        let items = self.list_or_empty(resource, &params).await?;
        let needle = normalize_text(&wanted);
        let posts: Vec<ContentEntity> = items
            .iter()
            .map(|raw| normalize(EntityKind::ServicePost, raw))
            .collect();

        if let Some(found) = posts.iter().find(|p| normalize_text(&p.title).contains(&needle)) {
            return Ok(found.clone());
        }
        match posts.into_iter().next() {
            Some(first) => {
                warn!(
                    "No service titled like {wanted}, showing {title}",
                    wanted: wanted.as_str(),
                    title: first.title.as_str()
                );
                Ok(first)
            }
            None => Err(CmsError::not_found(
                EntityKind::ServicePost.label(),
                id.unwrap_or(slug),
            )),
        }
    }

    /// Detail lookup dispatched on `kind`.
    pub async fn find(&self, kind: EntityKind, slug: &str, id: Option<&str>) -> Result<ContentEntity> {
        match kind {
            EntityKind::Article => self.find_article(slug).await,
            EntityKind::Product => self.find_product(slug).await,
            EntityKind::ServicePost => self.find_service(slug, id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CmsConfig;
    use crate::testing::{MemoryTransport, list_body};
    use serde_json::json;

    fn client(transport: MemoryTransport) -> Client<MemoryTransport> {
        Client::new(CmsConfig::new("http://cms.test"), transport)
    }

    fn one(item: Value) -> String {
        list_body(vec![item], 1, 25, 1, 1)
    }

    fn empty() -> String {
        list_body(vec![], 1, 25, 0, 0)
    }

    #[test]
    fn test_service_title_for_slug() {
        assert_eq!(service_title_for_slug("sav"), "Dépannage");
        assert_eq!(service_title_for_slug("vente"), "Vente");
        assert_eq!(service_title_for_slug("poele-a-bois"), "poele a bois");
    }

    #[tokio::test]
    async fn test_article_by_slug() {
        let transport = MemoryTransport::new().route_all(
            &["/articles?", "filters[slug][$eq]=salon-2024", "publicationState=live", "populate[cover]=*"],
            200,
            one(json!({ "id": 3, "attributes": { "slug": "salon-2024", "title": "Salon" } })),
        );
        let client = client(transport);
        let article = client.find_article("salon-2024").await.unwrap();
        assert_eq!(article.title, "Salon");

        let err = client.find_article("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_product_by_href_first() {
        let transport = MemoryTransport::new()
            .route("filters[href][$eq]=/products/ego", 200, one(json!({ "id": 1, "title": "Ego" })))
            .route("filters[slug][$eq]=ego", 200, one(json!({ "id": 2, "title": "Wrong" })));
        let client = client(transport);
        let product = client.find_product("ego").await.unwrap();
        assert_eq!(product.title, "Ego");
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_product_falls_back_to_slug_then_id() {
        let transport = MemoryTransport::new()
            .route("filters[href]", 200, empty())
            .route("filters[slug][$eq]=ego", 200, one(json!({ "id": 2, "title": "By slug" })))
            .route("filters[slug]", 200, empty())
            .route("/products/42?", 200, json!({ "data": { "id": 42, "title": "By id" } }).to_string());
        let client = client(transport);
        assert_eq!(client.find_product("ego").await.unwrap().title, "By slug");
        assert_eq!(client.find_product("42").await.unwrap().title, "By id");

        let err = client.find_product("nothing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_product_slug_is_encoded_in_path() {
        let client = client(MemoryTransport::new());
        let err = client.find_product("a#b?c").await.unwrap_err();
        assert!(err.is_not_found());
        let requests = client.transport().requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[2], "http://cms.test/api/products/a%23b%3Fc?populate=*");
    }

    #[tokio::test]
    async fn test_product_hard_failure_aborts() {
        let transport = MemoryTransport::new().route("filters[href]", 500, "internal");
        let err = client(transport).find_product("ego").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_service_by_title() {
        let transport = MemoryTransport::new().route_all(
            &["filters[title][$containsi]=Dépannage", "pagination[pageSize]=1"],
            200,
            one(json!({ "id": 5, "attributes": { "title": "Dépannage" } })),
        );
        let service = client(transport).find_service("sav", None).await.unwrap();
        assert_eq!(service.numeric_id(), Some(5));
    }

    #[tokio::test]
    async fn test_service_by_legacy_id() {
        let transport = MemoryTransport::new()
            .route("filters[title]", 200, empty())
            .route("/blog-posts/17?", 200, json!({ "data": { "id": 17, "title": "Ramonage" } }).to_string());
        let service = client(transport).find_service("ramonage", Some("17")).await.unwrap();
        assert_eq!(service.title, "Ramonage");
    }

    #[tokio::test]
    async fn test_service_scan_prefers_containing_title() {
        let posts = vec![
            json!({ "id": 1, "title": "Vente" }),
            json!({ "id": 2, "title": "Installation de poêles" }),
        ];
        let transport = MemoryTransport::new()
            .route("filters[title]", 200, empty())
            .route("pagination[pageSize]=50", 200, list_body(posts, 1, 50, 1, 2));
        let client = client(transport);
        let found = client.find_service("installation-de-poeles", None).await.unwrap();
        assert_eq!(found.numeric_id(), Some(2));

        let fallback = client.find_service("inconnu", None).await.unwrap();
        assert_eq!(fallback.numeric_id(), Some(1));
    }

    #[tokio::test]
    async fn test_service_not_found() {
        let transport = MemoryTransport::new().route("/blog-posts?", 200, empty());
        let err = client(transport).find_service("sav", None).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "service not found: sav");
    }
}
