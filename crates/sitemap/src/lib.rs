// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Static `sitemap.xml` generation from the CMS.
//!
//! Fixed routes come from [`SitemapConfig`]; every published entry of each
//! configured section adds one more URL. See [`SitemapGenerator`].

pub mod config;
pub mod error;
pub mod generate;
pub mod xml;

pub use config::{SectionConfig, SitemapConfig, StaticRoute};
pub use error::{Result, SitemapError};
pub use generate::{SectionOutcome, SectionReport, SitemapGenerator, SitemapReport};
pub use xml::{UrlEntry, UrlSet};
