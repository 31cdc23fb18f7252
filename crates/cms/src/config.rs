// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! CMS connection settings, built once and handed to every component.

use serde::{Deserialize, Serialize};

pub const STRAPI_URL_ENV: &str = "STRAPI_URL";
pub const STRAPI_TOKEN_ENV: &str = "STRAPI_TOKEN";
pub const DEFAULT_STRAPI_URL: &str = "http://localhost:1337";

/// Where the CMS lives and how to authenticate against it.
///
/// `api_url` is the API root and always ends with `/api`; uploaded media is
/// served from the same origin without that segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmsConfig {
    api_url: String,
    #[serde(default)]
    token: Option<String>,
}

impl CmsConfig {
    /// Accepts either the server origin (`https://cms.example`) or the API
    /// root (`https://cms.example/api`), with or without trailing slashes.
    pub fn new(url: impl AsRef<str>) -> Self {
        let trimmed = url.as_ref().trim().trim_end_matches('/');
        let base = if trimmed.is_empty() {
            DEFAULT_STRAPI_URL
        } else {
            trimmed
        };
        let api_url = if base.ends_with("/api") {
            base.to_string()
        } else {
            format!("{}/api", base)
        };
        Self {
            api_url,
            token: None,
        }
    }

    /// Attach a bearer token. Blank tokens mean anonymous access.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into().trim().to_string();
        self.token = if token.is_empty() { None } else { Some(token) };
        self
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source (the process environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(STRAPI_URL_ENV).unwrap_or_else(|| DEFAULT_STRAPI_URL.to_string());
        let token = lookup(STRAPI_TOKEN_ENV).unwrap_or_default();
        Self::new(url).with_token(token)
    }

    pub fn api_base(&self) -> &str {
        &self.api_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Origin serving `/uploads/...` assets.
    pub fn assets_base(&self) -> &str {
        self.api_url.strip_suffix("/api").unwrap_or(&self.api_url)
    }

    /// Absolute API URL for `path` (`/products?...` or `products?...`).
    pub fn api_url(&self, path: &str) -> String {
        join_path(&self.api_url, path)
    }

    /// Absolute URL for an uploaded asset. Absolute inputs pass through and
    /// empty inputs stay empty.
    pub fn media_url(&self, path: &str) -> String {
        if path.is_empty() {
            return String::new();
        }
        if is_absolute_url(path) {
            return path.to_string();
        }
        join_path(self.assets_base(), path)
    }
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_STRAPI_URL)
    }
}

/// True for `http://` and `https://` URLs, in any letter case.
pub fn is_absolute_url(url: &str) -> bool {
    let lower = url
        .get(..8)
        .map(|p| p.to_ascii_lowercase())
        .unwrap_or_else(|| url.to_ascii_lowercase());
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn join_path(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}
