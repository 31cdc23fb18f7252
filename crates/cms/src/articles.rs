// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Server-paginated news listing.

use crate::client::{Client, Page, PaginationState, Transport};
use crate::entity::{ContentEntity, EntityKind, normalize};
use crate::error::Result;
use crate::query::{QueryParams, QueryValue};
use serde_json::Value;

pub const DEFAULT_ARTICLE_PAGE_SIZE: u32 = 10;
pub const DEFAULT_ARTICLE_SORT: &str = "publishedAt:desc";

/// One request for a page of articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleQuery {
    pub page: u32,
    pub page_size: u32,
    pub sort: String,
    /// Case-insensitive match on title, excerpt or content.
    pub search: Option<String>,
    /// Any of these tags.
    pub tags: Vec<String>,
}

impl Default for ArticleQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_ARTICLE_PAGE_SIZE,
            sort: DEFAULT_ARTICLE_SORT.to_string(),
            search: None,
            tags: Vec::new(),
        }
    }
}

impl ArticleQuery {
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = Some(search).filter(|s| !s.trim().is_empty());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn params(&self) -> QueryParams {
        let mut filters = Vec::new();
        if let Some(search) = &self.search {
            let any_of: Vec<QueryValue> = ["title", "excerpt", "content"]
                .iter()
                .map(|field| {
                    QueryValue::map([(*field, QueryValue::map([("$containsi", search.as_str())]))])
                })
                .collect();
            filters.push(("$or".to_string(), indexed(any_of)));
        }
        if !self.tags.is_empty() {
            filters.push((
                "tags".to_string(),
                QueryValue::map([("$in", self.tags.clone())]),
            ));
        }

        QueryParams::new()
            .with("populate", QueryValue::map([("cover", "*"), ("tags", "true")]))
            .with("sort", self.sort.as_str())
            .with(
                "pagination",
                QueryValue::map([("page", self.page), ("pageSize", self.page_size)]),
            )
            .with("filters", QueryValue::Map(filters))
    }
}

/// `[a, b]` as `{0: a, 1: b}`, the bracket-indexed form `$or` takes.
fn indexed(items: Vec<QueryValue>) -> QueryValue {
    QueryValue::Map(
        items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
    )
}

/// Articles page plus the pagination to render controls with.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticlePage {
    pub items: Vec<ContentEntity>,
    pub pagination: PaginationState,
}

impl<T: Transport> Client<T> {
    pub async fn fetch_articles(&self, query: &ArticleQuery) -> Result<ArticlePage> {
        let page: Page<Value> = self
            .fetch_list(EntityKind::Article.resource(), &query.params())
            .await?;
        let pagination = page.state(query.page, query.page_size);
        Ok(ArticlePage {
            items: page.items.iter().map(|raw| normalize(EntityKind::Article, raw)).collect(),
            pagination,
        })
    }
}
