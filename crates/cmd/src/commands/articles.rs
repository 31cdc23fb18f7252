// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::{format_date, truncate};
use anyhow::{Context, Result};
use clap::Args;
use cms::articles::DEFAULT_ARTICLE_PAGE_SIZE;
use cms::{ArticleQuery, Client, Transport};
use std::io::Write;

const EXCERPT_CHARS: usize = 80;

#[derive(Debug, Clone, Args)]
pub struct ArticlesArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long, default_value_t = DEFAULT_ARTICLE_PAGE_SIZE)]
    pub page_size: u32,

    /// Text to look for in title, excerpt or content
    #[arg(long)]
    pub search: Option<String>,

    /// Tag filter, repeatable
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

impl ArticlesArgs {
    pub fn query(&self) -> ArticleQuery {
        let mut query = ArticleQuery::default()
            .page(self.page)
            .page_size(self.page_size)
            .tags(self.tags.iter().cloned());
        if let Some(search) = &self.search {
            query = query.search(search.as_str());
        }
        query
    }
}

/// Print one server-side page of news.
pub async fn articles_command<T: Transport>(
    client: &Client<T>,
    args: &ArticlesArgs,
    out: &mut impl Write,
) -> Result<()> {
    let page = client
        .fetch_articles(&args.query())
        .await
        .with_context(|| "Failed to load articles")?;

    for article in &page.items {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            format_date(article.published_at.as_deref()),
            article.slug,
            article.title,
            truncate(&article.excerpt, EXCERPT_CHARS)
        )?;
    }

    let p = page.pagination;
    writeln!(
        out,
        "Page {}/{} ({} articles)",
        p.page,
        p.page_count.max(1),
        p.total
    )?;
    if p.has_previous() {
        writeln!(out, "Previous: --page {}", p.page - 1)?;
    }
    if p.has_next() {
        writeln!(out, "Next: --page {}", p.page + 1)?;
    }
    Ok(())
}
