// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory [`Transport`] for tests of anything built on [`crate::Client`].

use crate::client::{HttpResponse, Transport};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use url::form_urlencoded;

type Handler = dyn Fn(&str) -> HttpResponse + Send + Sync;

#[derive(Clone)]
enum Responder {
    /// Answer when the decoded URL contains every fragment.
    Route(Vec<String>, HttpResponse),
    Dynamic(Arc<Handler>),
}

/// Serves canned responses and records every request.
///
/// Matching happens on the *decoded* URL (`filters[slug][$eq]=x`), and the
/// first matching responder wins. Unmatched requests get a 404.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    responders: Vec<Responder>,
    log: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl std::fmt::Debug for MemoryTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTransport")
            .field("responders", &self.responders.len())
            .finish()
    }
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport answering every request with `handler(decoded_url)`.
    pub fn from_fn<F>(handler: F) -> Self
    where
        F: Fn(&str) -> HttpResponse + Send + Sync + 'static,
    {
        Self::new().dynamic(handler)
    }

    /// Answer requests whose decoded URL contains `fragment`.
    pub fn route(self, fragment: &str, status: u16, body: impl Into<String>) -> Self {
        self.route_all(&[fragment], status, body)
    }

    /// Answer requests whose decoded URL contains all of `fragments`.
    pub fn route_all(mut self, fragments: &[&str], status: u16, body: impl Into<String>) -> Self {
        let fragments = fragments.iter().map(|f| f.to_string()).collect();
        self.responders
            .push(Responder::Route(fragments, HttpResponse::new(status, body)));
        self
    }

    pub fn dynamic<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) -> HttpResponse + Send + Sync + 'static,
    {
        self.responders.push(Responder::Dynamic(Arc::new(handler)));
        self
    }

    /// Decoded URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.entries().into_iter().map(|(url, _)| url).collect()
    }

    /// Bearer tokens sent with each request, in order.
    pub fn bearers(&self) -> Vec<Option<String>> {
        self.entries().into_iter().map(|(_, b)| b).collect()
    }

    fn entries(&self) -> Vec<(String, Option<String>)> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    fn respond(&self, decoded: &str) -> HttpResponse {
        for responder in &self.responders {
            match responder {
                Responder::Route(fragments, response) => {
                    if fragments.iter().all(|f| decoded.contains(f.as_str())) {
                        return response.clone();
                    }
                }
                Responder::Dynamic(handler) => return handler(decoded),
            }
        }
        HttpResponse::new(404, r#"{"data":null,"error":{"status":404,"name":"NotFoundError"}}"#)
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get(&self, url: &str, bearer: Option<&str>) -> Result<HttpResponse> {
        let decoded = decode_url(url);
        if let Ok(mut log) = self.log.lock() {
            log.push((decoded.clone(), bearer.map(str::to_string)));
        }
        Ok(self.respond(&decoded))
    }
}

/// `url` with its query string percent-decoded.
pub fn decode_url(url: &str) -> String {
    match url.split_once('?') {
        Some((path, query)) => {
            let pairs: Vec<String> = form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            format!("{}?{}", path, pairs.join("&"))
        }
        None => url.to_string(),
    }
}

/// First value of `key` in a URL's query string. Accepts encoded or
/// decoded URLs.
pub fn query_param(url: &str, key: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        let k: String = form_urlencoded::parse(format!("{}=", k).as_bytes())
            .map(|(k, _)| k.into_owned())
            .next()?;
        (k == key).then(|| {
            form_urlencoded::parse(format!("x={}", v).as_bytes())
                .map(|(_, v)| v.into_owned())
                .next()
                .unwrap_or_default()
        })
    })
}

/// A list-endpoint body with a `meta.pagination` block.
pub fn list_body(items: Vec<Value>, page: u32, page_size: u32, page_count: u32, total: u64) -> String {
    json!({
        "data": items,
        "meta": {
            "pagination": {
                "page": page,
                "pageSize": page_size,
                "pageCount": page_count,
                "total": total
            }
        }
    })
    .to_string()
}
