// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SitemapError>;

#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid sitemap configuration: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error(transparent)]
    Cms(#[from] cms::CmsError),
}

impl SitemapError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SitemapError::Io {
            path: path.into(),
            source,
        }
    }
}
