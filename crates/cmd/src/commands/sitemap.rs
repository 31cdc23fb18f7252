// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Args;
use cms::{Client, Transport};
use sitemap::{SectionOutcome, SitemapConfig, SitemapGenerator, SitemapReport};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Args)]
pub struct SitemapArgs {
    /// YAML configuration; built-in defaults when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file, overriding the configured one
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl SitemapArgs {
    /// Configuration file (or defaults) with `SITE_URL` applied.
    pub fn load_config<F>(&self, lookup: F) -> Result<SitemapConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match &self.config {
            Some(path) => SitemapConfig::load(path)
                .with_context(|| format!("Failed to read sitemap config {}", path.display()))?,
            None => SitemapConfig::default(),
        };
        let mut config = config.with_env_overrides(lookup);
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        Ok(config)
    }
}

pub async fn sitemap_command<T: Transport>(
    client: &Client<T>,
    args: &SitemapArgs,
    out: &mut impl Write,
) -> Result<()> {
    let config = args.load_config(|name| std::env::var(name).ok())?;
    let today = Utc::now().date_naive();
    let report = generate(client, &config, today).await?;
    write_report(out, &report)
}

/// Generate and write the file. Only a failed write is an error.
pub async fn generate<T: Transport>(
    client: &Client<T>,
    config: &SitemapConfig,
    today: NaiveDate,
) -> Result<SitemapReport> {
    SitemapGenerator::new(config, client)
        .generate(&config.output, today)
        .await
        .with_context(|| format!("Failed to write sitemap to {}", config.output.display()))
}

pub fn write_report(out: &mut impl Write, report: &SitemapReport) -> Result<()> {
    writeln!(out, "Static routes: {}", report.static_entries)?;
    for section in &report.sections {
        match &section.outcome {
            SectionOutcome::Included { fetched, entries } => {
                writeln!(out, "{}: {} entries ({} fetched)", section.name, entries, fetched)?
            }
            SectionOutcome::Skipped { reason } => {
                writeln!(out, "{}: skipped ({})", section.name, reason)?
            }
        }
    }
    if let Some(path) = &report.output {
        writeln!(out, "Wrote {} with {} URLs", path.display(), report.total_urls)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms::CmsConfig;
    use cms::testing::{MemoryTransport, list_body};
    use serde_json::json;

    #[test]
    fn test_output_override_and_site_url() {
        let args = SitemapArgs {
            config: None,
            output: Some(PathBuf::from("dist/sitemap.xml")),
        };
        let config = args
            .load_config(|name| (name == "SITE_URL").then(|| "https://www.example.fr/".to_string()))
            .unwrap();
        assert_eq!(config.output, PathBuf::from("dist/sitemap.xml"));
        assert_eq!(config.site_url, "https://www.example.fr");
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitemap.yaml");
        std::fs::write(&path, "site_url: https://a.example\nchangefreq: daily\n").unwrap();
        let args = SitemapArgs {
            config: Some(path),
            output: None,
        };
        let config = args.load_config(|_| None).unwrap();
        assert_eq!(config.site_url, "https://a.example");
        assert_eq!(config.changefreq, "daily");

        let missing = SitemapArgs {
            config: Some(dir.path().join("absent.yaml")),
            output: None,
        };
        assert!(missing.load_config(|_| None).is_err());
    }

    #[tokio::test]
    async fn test_generate_and_report() {
        let transport = MemoryTransport::new()
            .route(
                "/api/products?",
                200,
                list_body(vec![json!({ "id": 1, "attributes": { "slug": "ego" } })], 1, 100, 1, 1),
            )
            .route("/api/actualites?", 200, list_body(vec![], 1, 100, 0, 0))
            .route("/api/services?", 403, "forbidden");
        let client = Client::new(CmsConfig::new("http://cms.test"), transport);

        let dir = tempfile::tempdir().unwrap();
        let config = SitemapConfig {
            output: dir.path().join("sitemap.xml"),
            ..SitemapConfig::default()
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let report = generate(&client, &config, today).await.unwrap();

        let mut out = Vec::new();
        write_report(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Static routes: 6\nproducts: 1 entries (1 fetched)\nservices: skipped (CMS request failed with HTTP 403"));
        assert!(text.contains("actualites: 0 entries (0 fetched)\n"));
        assert!(text.ends_with("with 7 URLs\n"));
        assert!(config.output.exists());
    }
}
