// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for CMS access.
//!
//! Only the network boundary and configuration checks produce errors.
//! Media resolution, normalization, filtering and query building are total.

use thiserror::Error;

/// Response bodies quoted in errors are cut to this many characters.
pub const BODY_EXCERPT_CHARS: usize = 200;

pub type Result<T> = std::result::Result<T, CmsError>;

#[derive(Error, Debug)]
pub enum CmsError {
    /// The CMS answered with a non-2xx status.
    #[error("CMS request failed with HTTP {status} on {url} -> {body}")]
    Fetch { status: u16, url: String, body: String },

    #[error("Failed to send request to {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse JSON response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Every lookup strategy came back empty.
    #[error("{kind} not found: {key}")]
    NotFound { kind: String, key: String },

    #[error("Missing configuration: {}", .0.join(", "))]
    ConfigurationMissing(Vec<String>),

    /// Contact form submitted with blank required fields.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CmsError {
    /// Build a fetch failure, keeping only the start of the response body.
    pub fn fetch(status: u16, url: impl Into<String>, body: &str) -> Self {
        CmsError::Fetch {
            status,
            url: url.into(),
            body: excerpt(body),
        }
    }

    pub fn not_found(kind: impl Into<String>, key: impl Into<String>) -> Self {
        CmsError::NotFound {
            kind: kind.into(),
            key: key.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CmsError::NotFound { .. })
    }

    /// HTTP status of a fetch failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            CmsError::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn excerpt(body: &str) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(BODY_EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
