// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Sitemap configuration, read from YAML.
//!
//! ```yaml
//! site_url: "https://www.example.fr"
//! output: "public/sitemap.xml"
//! changefreq: weekly
//! static_routes:
//!   - path: "/"
//!   - path: "/products"
//! sections:
//!   - name: products
//!     resource: products
//!     route: "/products/{slug}"
//!   - name: services
//!     resource: services
//!     route: "/services/{category}/{slug}"
//! ```
//!
//! Every field is optional; an empty document yields the defaults.

use crate::error::{Result, SitemapError};
use cms::EntityKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SITE_URL_ENV: &str = "SITE_URL";
pub const DEFAULT_SITE_URL: &str = "https://laflammelimouxine.fr";
pub const DEFAULT_OUTPUT: &str = "public/sitemap.xml";

/// Placeholder for the entity slug in a section route.
pub const SLUG_PLACEHOLDER: &str = "{slug}";
/// Placeholder for the entity's category slug in a section route.
pub const CATEGORY_PLACEHOLDER: &str = "{category}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Public origin every `<loc>` starts with.
    pub site_url: String,
    pub output: PathBuf,
    pub changefreq: String,
    pub default_priority: f64,
    pub homepage_priority: f64,
    /// Items per CMS request while enumerating sections.
    pub page_size: u32,
    pub static_routes: Vec<StaticRoute>,
    pub sections: Vec<SectionConfig>,
}

/// A fixed page of the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticRoute {
    pub path: String,
    #[serde(default)]
    pub priority: Option<f64>,
}

impl StaticRoute {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            priority: None,
        }
    }
}

/// One CMS collection published as pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub name: String,
    /// Collection path under the API root.
    pub resource: String,
    /// Page path with `{slug}` and optionally `{category}` placeholders.
    pub route: String,
    #[serde(default)]
    pub priority: Option<f64>,
}

impl SectionConfig {
    pub fn new(name: &str, resource: &str, route: &str) -> Self {
        Self {
            name: name.to_string(),
            resource: resource.to_string(),
            route: route.to_string(),
            priority: None,
        }
    }

    /// Entity kind the resource holds; unknown collections read as articles.
    pub fn kind(&self) -> EntityKind {
        self.resource.parse().unwrap_or(EntityKind::Article)
    }

    pub fn needs_category(&self) -> bool {
        self.route.contains(CATEGORY_PLACEHOLDER)
    }
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            changefreq: "weekly".to_string(),
            default_priority: 0.5,
            homepage_priority: 0.8,
            page_size: 100,
            static_routes: ["/", "/products", "/services", "/actualites", "/contact", "/legalnotice"]
                .into_iter()
                .map(StaticRoute::new)
                .collect(),
            sections: vec![
                SectionConfig::new("products", "products", "/products/{slug}"),
                SectionConfig::new("services", "services", "/services/{category}/{slug}"),
                SectionConfig::new("actualites", "actualites", "/actualites/{slug}"),
            ],
        }
    }
}

impl SitemapConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        Ok(config.normalized())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| SitemapError::io(path, e))?;
        Self::from_yaml(&yaml)
    }

    /// Apply `SITE_URL` from `lookup` when set and non-blank.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(SITE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.site_url = url;
        }
        self.normalized()
    }

    /// Site origin without trailing slashes; page size at least 1.
    fn normalized(mut self) -> Self {
        self.site_url = self.site_url.trim().trim_end_matches('/').to_string();
        if self.site_url.is_empty() {
            self.site_url = DEFAULT_SITE_URL.to_string();
        }
        self.page_size = self.page_size.max(1);
        self
    }

    /// Absolute URL for a site path.
    pub fn loc(&self, path: &str) -> String {
        if path.is_empty() || path == "/" {
            format!("{}/", self.site_url)
        } else if path.starts_with('/') {
            format!("{}{}", self.site_url, path)
        } else {
            format!("{}/{}", self.site_url, path)
        }
    }

    pub fn static_priority(&self, route: &StaticRoute) -> f64 {
        route.priority.unwrap_or(if route.path == "/" {
            self.homepage_priority
        } else {
            self.default_priority
        })
    }
}
