// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod articles;
pub mod contact;
pub mod list;
pub mod show;
pub mod sitemap;

pub use articles::{ArticlesArgs, articles_command};
pub use contact::{ContactArgs, contact_command};
pub use list::{ListArgs, list_command};
pub use show::{ShowArgs, show_command};
pub use sitemap::{SitemapArgs, sitemap_command};
