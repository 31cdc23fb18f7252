// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Shared pieces of the command implementations.

use anyhow::{Context, Result};
use clap::ValueEnum;
use cms::{Client, CmsConfig, Content, ContentEntity, EntityKind, MediaResolver, ReqwestTransport};

/// Collections as named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Collection {
    Products,
    Services,
    Articles,
}

impl From<Collection> for EntityKind {
    fn from(collection: Collection) -> Self {
        match collection {
            Collection::Products => EntityKind::Product,
            Collection::Services => EntityKind::ServicePost,
            Collection::Articles => EntityKind::Article,
        }
    }
}

/// Single entity kinds as named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Product,
    Service,
    Article,
}

impl From<Kind> for EntityKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Product => EntityKind::Product,
            Kind::Service => EntityKind::ServicePost,
            Kind::Article => EntityKind::Article,
        }
    }
}

/// HTTP client configured from `STRAPI_URL` / `STRAPI_TOKEN`.
pub fn cms_client() -> Result<Client<ReqwestTransport>> {
    let config = CmsConfig::from_env();
    diagnostics::debug!("Using CMS at {url}", url: config.api_base());
    Client::connect(config).with_context(|| "Failed to create CMS client")
}

/// `9.5 kW`, `12 kW`.
pub fn format_power(kw: f64) -> String {
    if kw.fract() == 0.0 {
        format!("{:.0} kW", kw)
    } else {
        format!("{} kW", kw)
    }
}

/// Cut `s` to `max_chars` characters, marking the cut with `...`.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Date part of an ISO-8601 timestamp.
pub fn format_date(raw: Option<&str>) -> String {
    raw.map(|r| r.get(..10).unwrap_or(r).to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// One tab-separated listing row.
pub fn entity_row(entity: &ContentEntity, resolver: &MediaResolver, width: u32) -> String {
    let image = resolver.resolve_or_placeholder(&entity.cover, width);
    let mut cols = vec![
        entity.id.as_ref().map_or_else(|| "-".to_string(), ToString::to_string),
        entity.slug.clone(),
        entity.title.clone(),
        entity.categories_label(),
    ];
    match entity.kind {
        EntityKind::Product => {
            cols.push(entity.type_label().unwrap_or_else(|| "-".to_string()));
            cols.push(entity.brand.clone().unwrap_or_else(|| "-".to_string()));
            cols.push(entity.power_kw.map_or_else(|| "-".to_string(), format_power));
        }
        EntityKind::Article => cols.push(format_date(entity.published_at.as_deref())),
        EntityKind::ServicePost => {}
    }
    cols.push(image.url);
    cols.join("\t")
}

/// Body text for terminal display.
pub fn content_text(content: &Content) -> String {
    match content {
        Content::Empty => String::new(),
        Content::Html(html) => html.clone(),
        Content::Blocks(blocks) => blocks.join("\n\n"),
    }
}
