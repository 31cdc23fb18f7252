// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Ordered fallbacks for every logical entity field.
//!
//! Each [`Field`] lists the upstream keys that have carried it, oldest schema
//! last. The first key holding a present value wins, where null, missing and
//! `""` are not present.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub candidates: &'static [&'static str],
}

pub const ID: Field = Field { name: "id", candidates: &["id", "documentId"] };
pub const DOCUMENT_ID: Field = Field { name: "documentId", candidates: &["documentId"] };
pub const SLUG: Field = Field { name: "slug", candidates: &["slug"] };
pub const TITLE: Field = Field { name: "title", candidates: &["title", "titre", "name"] };
pub const SUBTITLE: Field = Field { name: "subtitle", candidates: &["subtitle", "sousTitre"] };
pub const EXCERPT: Field = Field {
    name: "excerpt",
    candidates: &["excerpt", "descriptionCourte", "summary"],
};
pub const CONTENT: Field = Field {
    name: "content",
    candidates: &["content", "description", "body"],
};
pub const PUBLISHED_AT: Field = Field {
    name: "publishedAt",
    candidates: &["publishedAt", "date", "updatedAt", "createdAt"],
};
pub const UPDATED_AT: Field = Field { name: "updatedAt", candidates: &["updatedAt"] };
pub const COVER: Field = Field {
    name: "cover",
    candidates: &["cover", "image", "images", "thumbnail"],
};
pub const HREF: Field = Field { name: "href", candidates: &["href"] };
pub const TYPE: Field = Field { name: "type", candidates: &["type", "Type", "productType"] };
pub const BRAND: Field = Field { name: "brand", candidates: &["brand", "Brand", "marque"] };
pub const POWER: Field = Field {
    name: "power",
    candidates: &["power_kw", "powerKw", "puissance", "puissance_kw"],
};
pub const SOURCE: Field = Field { name: "source", candidates: &["source"] };
pub const SOURCE_ID: Field = Field { name: "sourceId", candidates: &["sourceId"] };
pub const SOURCE_URL: Field = Field { name: "sourceUrl", candidates: &["sourceUrl"] };

impl Field {
    /// First present value among the candidate keys.
    pub fn resolve<'a>(&self, obj: &'a Map<String, Value>) -> Option<&'a Value> {
        self.candidates
            .iter()
            .filter_map(|key| obj.get(*key))
            .find(|v| is_present(v))
    }

    /// First present value rendered as text. Numbers and booleans are
    /// stringified; arrays and objects do not count as text and are skipped.
    pub fn text(&self, obj: &Map<String, Value>) -> Option<String> {
        self.candidates
            .iter()
            .filter_map(|key| obj.get(*key))
            .find_map(scalar_text)
    }
}

/// Absent, null and empty strings are "not present".
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Scalar JSON rendered as trimmed text.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
