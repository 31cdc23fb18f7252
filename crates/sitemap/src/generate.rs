// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Sitemap assembly: static routes plus one URL per published CMS entry.
//!
//! Sections are independent. A section whose fetch fails is logged, noted
//! in the [`SitemapReport`] and left out; the others are still written.

use crate::config::{CATEGORY_PLACEHOLDER, SLUG_PLACEHOLDER, SectionConfig, SitemapConfig};
use crate::error::{Result, SitemapError};
use crate::xml::{UrlEntry, UrlSet, lastmod_date};
use chrono::NaiveDate;
use cms::{Client, ContentEntity, QueryParams, QueryValue, Transport, normalize};
use diagnostics::*;
use std::path::{Path, PathBuf};

/// What happened to one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionOutcome {
    /// `fetched` items came back and `entries` of them had a usable route.
    Included { fetched: usize, entries: usize },
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    pub name: String,
    pub outcome: SectionOutcome,
}

/// Summary of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapReport {
    pub static_entries: usize,
    pub sections: Vec<SectionReport>,
    pub total_urls: usize,
    pub output: Option<PathBuf>,
}

impl SitemapReport {
    pub fn skipped(&self) -> impl Iterator<Item = &SectionReport> {
        self.sections
            .iter()
            .filter(|s| matches!(s.outcome, SectionOutcome::Skipped { .. }))
    }
}

/// Query for a section: slugs and update dates only, live entries only.
pub fn section_params(section: &SectionConfig) -> QueryParams {
    let mut params = QueryParams::new()
        .with("fields", QueryValue::map([("0", "slug"), ("1", "updatedAt")]))
        .with("publicationState", "live");
    if section.needs_category() {
        params.insert(
            "populate",
            QueryValue::map([(
                "category",
                QueryValue::map([("fields", QueryValue::map([("0", "slug")]))]),
            )]),
        );
    }
    params
}

/// Site path for `entity` under `section`, or `None` when a placeholder
/// cannot be filled.
pub fn section_path(section: &SectionConfig, entity: &ContentEntity) -> Option<String> {
    if entity.slug.is_empty() {
        return None;
    }
    let mut path = section.route.replace(SLUG_PLACEHOLDER, &entity.slug);
    if section.needs_category() {
        let category = entity.category_slug.as_deref().filter(|c| !c.is_empty())?;
        path = path.replace(CATEGORY_PLACEHOLDER, category);
    }
    Some(path)
}

/// Builds sitemaps from one configuration and one CMS client.
pub struct SitemapGenerator<'a, T: Transport> {
    config: &'a SitemapConfig,
    client: &'a Client<T>,
}

impl<'a, T: Transport> SitemapGenerator<'a, T> {
    pub fn new(config: &'a SitemapConfig, client: &'a Client<T>) -> Self {
        Self { config, client }
    }

    /// Collect every URL, dating undated entries `today`.
    pub async fn collect(&self, today: NaiveDate) -> (UrlSet, SitemapReport) {
        let mut urls = UrlSet::new();
        let mut report = SitemapReport::default();

        for route in &self.config.static_routes {
            urls.insert(UrlEntry {
                loc: self.config.loc(&route.path),
                lastmod: today,
                changefreq: self.config.changefreq.clone(),
                priority: self.config.static_priority(route),
            });
            report.static_entries += 1;
        }

        for section in &self.config.sections {
            let outcome = self.collect_section(section, today, &mut urls).await;
            report.sections.push(SectionReport {
                name: section.name.clone(),
                outcome,
            });
        }

        report.total_urls = urls.len();
        (urls, report)
    }

    async fn collect_section(
        &self,
        section: &SectionConfig,
        today: NaiveDate,
        urls: &mut UrlSet,
    ) -> SectionOutcome {
        let params = section_params(section);
        let raw = match self
            .client
            .fetch_all_pages(&section.resource, &params, self.config.page_size)
            .await
        {
            Ok(raw) => raw,
            Err(err) => {
                warn!(
                    "Sitemap section {section} skipped: {reason}",
                    section: section.name.as_str(),
                    reason: err.to_string()
                );
                return SectionOutcome::Skipped {
                    reason: err.to_string(),
                };
            }
        };

        let priority = section.priority.unwrap_or(self.config.default_priority);
        let kind = section.kind();
        let mut entries = 0;
        for item in &raw {
            let entity = normalize(kind, item);
            let Some(path) = section_path(section, &entity) else {
                continue;
            };
            urls.insert(UrlEntry {
                loc: self.config.loc(&path),
                lastmod: lastmod_date(entity.updated_at.as_deref(), today),
                changefreq: self.config.changefreq.clone(),
                priority,
            });
            entries += 1;
        }

        info!(
            "Sitemap section {section}: {count} entries",
            section: section.name.as_str(),
            count: raw.len()
        );
        SectionOutcome::Included {
            fetched: raw.len(),
            entries,
        }
    }

    /// Collect, render and write the sitemap to `output` (creating parent
    /// directories). Only a failed write is an error.
    pub async fn generate(&self, output: &Path, today: NaiveDate) -> Result<SitemapReport> {
        let (urls, mut report) = self.collect(today).await;
        write_output(output, &urls.render())?;
        info!(
            "Wrote {path} with {count} URLs",
            path: output.display().to_string(),
            count: urls.len()
        );
        report.output = Some(output.to_path_buf());
        Ok(report)
    }
}

fn write_output(path: &Path, xml: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SitemapError::io(parent, e))?;
    }
    std::fs::write(path, xml.as_bytes()).map_err(|e| SitemapError::io(path, e))
}
