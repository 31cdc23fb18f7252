// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Async CMS API client and the paginated fetcher.
//!
//! HTTP goes through the [`Transport`] trait so lists, lookups and the
//! sitemap can run against [`crate::testing::MemoryTransport`] in tests.

use crate::config::CmsConfig;
use crate::entity::{ContentEntity, EntityKind, normalize_all};
use crate::error::{CmsError, Result};
use crate::query::{QueryParams, QueryValue, encode_path_segment, with_query};
use async_trait::async_trait;
use diagnostics::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page size used when enumerating whole collections.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A GET-only HTTP seam.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET. Only failures to exchange at all are errors; any HTTP
    /// status comes back as a response.
    async fn get(&self, url: &str, bearer: Option<&str>) -> Result<HttpResponse>;
}

/// [`Transport`] over a shared `reqwest::Client`. No timeout is set.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| CmsError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, bearer: Option<&str>) -> Result<HttpResponse> {
        let mut request = self
            .http_client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let to_transport = |source| CmsError::Transport {
            url: url.to_string(),
            source,
        };
        let response = request.send().await.map_err(to_transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(to_transport)?;
        Ok(HttpResponse { status, body })
    }
}

/// Pagination metadata as reported under `meta.pagination`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub total: u64,
}

fn first_page() -> u32 {
    1
}

impl PaginationState {
    /// Local stand-in when the response carried no pagination block: the
    /// returned items are all there is.
    pub fn fallback(page: u32, page_size: u32, total: usize) -> Self {
        Self {
            page: page.max(1),
            page_size,
            page_count: 1,
            total: total as u64,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// `None` when the server did not report pagination.
    pub pagination: Option<PaginationState>,
}

impl<T> Page<T> {
    /// Reported pagination, or [`PaginationState::fallback`].
    pub fn state(&self, page: u32, page_size: u32) -> PaginationState {
        self.pagination
            .unwrap_or_else(|| PaginationState::fallback(page, page_size, self.items.len()))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    meta: Meta,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    pagination: Option<PaginationState>,
}

/// List items from `data`: an array, a single object, or nothing.
fn data_items(data: Value) -> Vec<Value> {
    match data {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        _ => Vec::new(),
    }
}

fn pagination_params(page: u32, page_size: u32) -> QueryValue {
    QueryValue::map([("page", page), ("pageSize", page_size)])
}

/// CMS client bound to one configuration.
#[derive(Debug, Clone)]
pub struct Client<T: Transport = ReqwestTransport> {
    config: CmsConfig,
    transport: T,
}

impl Client<ReqwestTransport> {
    /// Client over real HTTP.
    pub fn connect(config: CmsConfig) -> Result<Self> {
        Ok(Self::new(config, ReqwestTransport::new()?))
    }
}

impl<T: Transport> Client<T> {
    pub fn new(config: CmsConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &CmsConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `path` under the API root and decode the JSON body.
    pub async fn fetch_json<D: DeserializeOwned>(&self, path: &str) -> Result<D> {
        let url = self.config.api_url(path);
        debug!("GET {url}", url: url.as_str());

        let response = self.transport.get(&url, self.config.token()).await?;
        if !response.is_success() {
            warn!(
                "CMS returned HTTP {status} for {url}",
                status: response.status,
                url: url.as_str()
            );
            return Err(CmsError::fetch(response.status, url, &response.body));
        }

        serde_json::from_str(&response.body).map_err(|source| CmsError::Decode { url, source })
    }

    /// One request against a list endpoint, without touching pagination.
    pub async fn fetch_list(&self, resource: &str, params: &QueryParams) -> Result<Page<Value>> {
        let path = with_query(&format!("/{}", resource), params);
        let envelope: Envelope = self.fetch_json(&path).await?;
        Ok(Page {
            items: data_items(envelope.data),
            pagination: envelope.meta.pagination,
        })
    }

    /// Page `page` of `resource`, `page_size` items per page.
    pub async fn fetch_page(
        &self,
        resource: &str,
        params: &QueryParams,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Value>> {
        let params = params
            .clone()
            .with("pagination", pagination_params(page, page_size));
        self.fetch_list(resource, &params).await
    }

    /// Every item of `resource`, fetched one page at a time.
    ///
    /// Stops after a short page or once the reported page count is reached.
    /// Any failed page fails the whole call and drops what was gathered.
    pub async fn fetch_all_pages(
        &self,
        resource: &str,
        params: &QueryParams,
        page_size: u32,
    ) -> Result<Vec<Value>> {
        let page_size = page_size.max(1);
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.fetch_page(resource, params, page, page_size).await?;
            let received = batch.items.len();
            all.extend(batch.items);

            debug!(
                "Fetched {resource} page {page}: {received} items",
                resource: resource,
                page: page,
                received: received
            );

            if received < page_size as usize {
                if let Some(state) = batch.pagination.filter(|s| page < s.page_count) {
                    warn!(
                        "Short {resource} page {page} of {page_count}: got {received} of {page_size}, stopping",
                        resource: resource,
                        page: page,
                        page_count: state.page_count,
                        received: received,
                        page_size: page_size
                    );
                }
                break;
            }
            if let Some(state) = batch.pagination {
                if page >= state.page_count {
                    break;
                }
            }
            page += 1;
        }

        info!(
            "Fetched {count} {resource} over {pages} pages",
            count: all.len(),
            resource: resource,
            pages: page
        );
        Ok(all)
    }

    /// Every entity of `kind`, normalized.
    pub async fn fetch_entities(
        &self,
        kind: EntityKind,
        params: &QueryParams,
        page_size: u32,
    ) -> Result<Vec<ContentEntity>> {
        let raw = self.fetch_all_pages(kind.resource(), params, page_size).await?;
        Ok(normalize_all(kind, &raw))
    }

    /// `GET /{resource}/{id}`. A 404 or a null `data` is `Ok(None)`.
    pub async fn fetch_one(
        &self,
        resource: &str,
        id: &str,
        params: &QueryParams,
    ) -> Result<Option<Value>> {
        let path = with_query(&format!("/{}/{}", resource, encode_path_segment(id)), params);
        match self.fetch_json::<Envelope>(&path).await {
            Ok(envelope) => Ok(Some(envelope.data).filter(Value::is_object)),
            Err(err) if err.status() == Some(404) => Ok(None),
            Err(err) => Err(err),
        }
    }
}
