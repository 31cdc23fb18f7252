// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! sitemaps.org 0.9 rendering.

use chrono::{DateTime, NaiveDate};
use std::collections::BTreeMap;

pub const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
pub const URLSET_OPEN: &str = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#;
pub const URLSET_CLOSE: &str = "</urlset>";

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
    pub changefreq: String,
    pub priority: f64,
}

/// Entries keyed by `loc`. A later insert for the same `loc` replaces the
/// earlier one; iteration is in ascending `loc` order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlSet {
    entries: BTreeMap<String, UrlEntry>,
}

impl UrlSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: UrlEntry) {
        self.entries.insert(entry.loc.clone(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, loc: &str) -> Option<&UrlEntry> {
        self.entries.get(loc)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UrlEntry> {
        self.entries.values()
    }

    pub fn render(&self) -> String {
        let mut lines = vec![XML_HEADER.to_string(), URLSET_OPEN.to_string()];
        lines.extend(self.iter().map(render_url));
        lines.push(format!("{}\n", URLSET_CLOSE));
        lines.join("\n")
    }
}

/// Escape the five XML special characters.
pub fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Calendar date of an upstream timestamp, or `today` when it is missing
/// or unreadable.
pub fn lastmod_date(raw: Option<&str>, today: NaiveDate) -> NaiveDate {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return today;
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.naive_utc().date();
    }
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").unwrap_or(today)
}

/// `0.5`, `0.8`, `1.0`: always at least one decimal.
pub fn format_priority(priority: f64) -> String {
    let clamped = priority.clamp(0.0, 1.0);
    if clamped.fract() == 0.0 {
        format!("{:.1}", clamped)
    } else {
        format!("{}", clamped)
    }
}

fn render_url(entry: &UrlEntry) -> String {
    format!(
        "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>",
        xml_escape(&entry.loc),
        entry.lastmod.format("%Y-%m-%d"),
        xml_escape(&entry.changefreq),
        format_priority(entry.priority)
    )
}
