// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{Parser, Subcommand};
use cmd::commands::{
    ArticlesArgs, ContactArgs, ListArgs, ShowArgs, SitemapArgs, articles_command, contact_command,
    list_command, show_command, sitemap_command,
};
use cmd::common::cms_client;
use cms::ContactConfig;
use diagnostics::Verbosity;
use std::io::Write;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "vitrine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Log debug diagnostics to stderr when VITRINE_LOG is unset
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List products, services or news with catalog filters
    List(ListArgs),
    /// Browse the news listing page by page
    Articles(ArticlesArgs),
    /// Show one entry by slug
    Show(ShowArgs),
    /// Generate sitemap.xml from the CMS
    Sitemap(SitemapArgs),
    /// Validate a contact message and print its mail payload
    Contact(ContactArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    diagnostics::init_with_default(if cli.verbose {
        Verbosity::Debug
    } else {
        Verbosity::Off
    });

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::List(args) => list_command(&cms_client()?, args, &mut out).await?,
        Commands::Articles(args) => articles_command(&cms_client()?, args, &mut out).await?,
        Commands::Show(args) => show_command(&cms_client()?, args, &mut out).await?,
        Commands::Sitemap(args) => sitemap_command(&cms_client()?, args, &mut out).await?,
        Commands::Contact(args) => contact_command(&ContactConfig::from_env(), args, &mut out)?,
    }
    out.flush()?;
    Ok(())
}
