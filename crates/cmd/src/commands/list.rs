// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::{Collection, entity_row};
use anyhow::{Context, Result};
use clap::Args;
use cms::{
    ALL_CATEGORIES, Client, DEFAULT_PAGE_SIZE, EntityKind, FilterState, MediaResolver, QueryParams,
    Transport, filter_and_sort,
};
use std::io::Write;

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Collection to list
    #[arg(value_enum)]
    pub collection: Collection,

    /// Only entries in this category ("all" for every category)
    #[arg(long, default_value = ALL_CATEGORIES)]
    pub category: String,

    /// Product type, repeatable (air, canalisable, etanche, hydro)
    #[arg(long = "type")]
    pub types: Vec<String>,

    /// Brand, repeatable
    #[arg(long = "brand")]
    pub brands: Vec<String>,

    /// Minimum power in kW
    #[arg(long)]
    pub power_min: Option<f64>,

    /// Maximum power in kW
    #[arg(long)]
    pub power_max: Option<f64>,

    /// Items per CMS request
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Image width the listing is rendered at
    #[arg(long, default_value_t = 600)]
    pub width: u32,
}

impl ListArgs {
    pub fn filters(&self) -> FilterState {
        FilterState {
            category: None,
            types: self.types.clone(),
            brands: self.brands.clone(),
            power_min: self.power_min,
            power_max: self.power_max,
        }
    }
}

/// Fetch a whole collection, filter and order it, and print one row per
/// entry.
pub async fn list_command<T: Transport>(
    client: &Client<T>,
    args: &ListArgs,
    out: &mut impl Write,
) -> Result<()> {
    let kind = EntityKind::from(args.collection);
    let params = QueryParams::new().with("populate", "*");

    let entities = client
        .fetch_entities(kind, &params, args.page_size)
        .await
        .with_context(|| format!("Failed to load {}", kind.resource()))?;
    let shown = filter_and_sort(&entities, &args.filters(), &args.category);

    diagnostics::info!(
        "Showing {shown} of {total} {resource}",
        shown: shown.len(),
        total: entities.len(),
        resource: kind.resource()
    );

    let resolver = MediaResolver::new(client.config().clone());
    for entity in &shown {
        writeln!(out, "{}", entity_row(entity, &resolver, args.width))?;
    }
    if shown.is_empty() {
        writeln!(out, "No {} match these filters.", kind.resource())?;
    }
    Ok(())
}
