// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Headless-CMS access for the showroom site.
//!
//! The CMS schema has changed several times, so the same entity or image can
//! arrive in several JSON shapes. This crate decodes all of them into one
//! stable record ([`ContentEntity`]), picks image renditions
//! ([`MediaResolver`]), builds nested-filter query strings ([`QueryParams`]),
//! pages through collections ([`Client::fetch_all_pages`]) and filters and
//! orders catalog lists in memory ([`filter_and_sort`]).

pub mod articles;
pub mod client;
pub mod config;
pub mod contact;
pub mod entity;
pub mod error;
pub mod fields;
pub mod filter;
pub mod lookup;
pub mod media;
pub mod query;
pub mod testing;
pub mod text;
pub mod view;

pub use articles::{ArticlePage, ArticleQuery};
pub use client::{Client, DEFAULT_PAGE_SIZE, HttpResponse, Page, PaginationState, ReqwestTransport, Transport};
pub use config::CmsConfig;
pub use contact::{ContactConfig, ContactMessage, TemplateParams};
pub use entity::{Content, ContentEntity, EntityId, EntityKind, normalize, normalize_all};
pub use error::{CmsError, Result};
pub use filter::{ALL_CATEGORIES, FilterState, filter_and_sort};
pub use media::{CdnTransform, MediaAsset, MediaReference, MediaResolver, ResolvedImage, with_cdn_transform};
pub use query::{QueryParams, QueryValue, build_query_string};
pub use text::{make_slug, normalize_text};
pub use view::ViewState;
