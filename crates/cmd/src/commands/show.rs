// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::{Kind, content_text, format_date, format_power};
use anyhow::{Result, bail};
use clap::Args;
use cms::media::DEFAULT_TARGET_WIDTH;
use cms::{Client, ContentEntity, EntityKind, MediaResolver, Transport, ViewState};
use std::io::Write;

#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    #[arg(value_enum)]
    pub kind: Kind,

    /// URL slug of the entry
    pub slug: String,

    /// Legacy numeric id, tried when the slug matches nothing (services)
    #[arg(long)]
    pub id: Option<String>,

    /// Image width the page is rendered at
    #[arg(long, default_value_t = DEFAULT_TARGET_WIDTH)]
    pub width: u32,
}

/// Look up one entry and print its detail view.
pub async fn show_command<T: Transport>(
    client: &Client<T>,
    args: &ShowArgs,
    out: &mut impl Write,
) -> Result<()> {
    let kind = EntityKind::from(args.kind);
    let view: ViewState<ContentEntity> = client
        .find(kind, &args.slug, args.id.as_deref())
        .await
        .into();

    match view {
        ViewState::Loaded(entity) => {
            let resolver = MediaResolver::new(client.config().clone());
            write_detail(out, &entity, &resolver, args.width)
        }
        ViewState::NotFound => bail!("No {} matches '{}'", kind, args.slug),
        ViewState::Failed(message) => bail!("Could not load {} '{}': {}", kind, args.slug, message),
    }
}

fn write_detail(
    out: &mut impl Write,
    entity: &ContentEntity,
    resolver: &MediaResolver,
    width: u32,
) -> Result<()> {
    writeln!(out, "{}", entity.title)?;
    if let Some(subtitle) = &entity.subtitle {
        writeln!(out, "{}", subtitle)?;
    }
    writeln!(out)?;
    writeln!(out, "slug:       {}", entity.slug)?;
    if let Some(id) = &entity.id {
        writeln!(out, "id:         {}", id)?;
    }
    if entity.kind == EntityKind::Article {
        writeln!(out, "published:  {}", format_date(entity.published_at.as_deref()))?;
        if !entity.tags.is_empty() {
            writeln!(out, "tags:       {}", entity.tags.join(", "))?;
        }
    }
    writeln!(out, "categories: {}", entity.categories_label())?;
    if entity.kind == EntityKind::Product {
        if let Some(label) = entity.type_label() {
            writeln!(out, "type:       {}", label)?;
        }
        if let Some(brand) = &entity.brand {
            writeln!(out, "brand:      {}", brand)?;
        }
        if let Some(kw) = entity.power_kw {
            writeln!(out, "power:      {}", format_power(kw))?;
        }
    }

    let image = resolver.resolve_or_placeholder(&entity.cover, width);
    writeln!(out, "image:      {}", image.url)?;
    if let Some(src_set) = &image.src_set {
        writeln!(out, "srcset:     {}", src_set)?;
    }
    if let Some(asset) = entity.cover.asset() {
        writeln!(out, "alt:        {}", asset.alt_text(&entity.title))?;
    }

    if !entity.excerpt.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", entity.excerpt)?;
    }
    let body = content_text(&entity.content);
    if !body.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", body)?;
    }
    Ok(())
}
