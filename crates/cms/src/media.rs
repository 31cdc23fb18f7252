// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Media references and image URL selection.
//!
//! The CMS has shipped four shapes for the same media field over time: a bare
//! URL string, a flattened `{url, formats}` object, a `{data: {attributes}}`
//! wrapper, and arrays of any of those. [`MediaReference::from_value`] decodes
//! all of them once so that selection only ever sees a [`MediaAsset`].

use crate::config::{CmsConfig, is_absolute_url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const DEFAULT_PLACEHOLDER: &str = "/images/placeholder.jpg";
pub const DEFAULT_TARGET_WIDTH: u32 = 1200;

/// Nominal pixel width of a named upload format.
pub fn nominal_width(format: &str) -> Option<u32> {
    match format {
        "large" => Some(1600),
        "xlarge" => Some(1200),
        "medium" => Some(1000),
        "small" => Some(600),
        "thumbnail" => Some(245),
        _ => None,
    }
}

/// One resized variant of an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFormat {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A single uploaded asset with its size variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub url: Option<String>,
    pub formats: BTreeMap<String, MediaFormat>,
    pub alternative_text: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub mime: Option<String>,
}

impl MediaAsset {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    fn from_object(obj: &serde_json::Map<String, Value>) -> Self {
        let formats = obj
            .get("formats")
            .and_then(Value::as_object)
            .map(|formats| {
                formats
                    .iter()
                    .filter_map(|(name, f)| {
                        let url = non_empty_str(f.get("url")?)?;
                        Some((
                            name.clone(),
                            MediaFormat {
                                url,
                                width: f.get("width").and_then(as_u32),
                                height: f.get("height").and_then(as_u32),
                            },
                        ))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            url: obj.get("url").and_then(non_empty_str),
            formats,
            alternative_text: obj.get("alternativeText").and_then(non_empty_str),
            width: obj.get("width").and_then(as_u32),
            height: obj.get("height").and_then(as_u32),
            mime: obj.get("mime").and_then(non_empty_str),
        }
    }

    /// Alternative text, or `fallback` when the upload has none.
    pub fn alt_text<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.alternative_text.as_deref().unwrap_or(fallback)
    }
}

/// Every media shape the CMS has been observed to return.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MediaReference {
    #[default]
    Missing,
    /// A bare URL string.
    Url(String),
    /// `{url, formats, ...}` at the top level.
    Flat(MediaAsset),
    /// `{data: {attributes: {...}}}`, `{data: [...]}` or `{attributes: {...}}`.
    Nested(MediaAsset),
    /// An array; only the first element is significant.
    Many(Vec<MediaReference>),
}

impl MediaReference {
    /// Decode any JSON value. Unrecognized input is [`MediaReference::Missing`].
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) if !s.trim().is_empty() => MediaReference::Url(s.trim().to_string()),
            Value::Array(items) => {
                let decoded: Vec<_> = items.iter().map(Self::from_value).collect();
                if decoded.is_empty() {
                    MediaReference::Missing
                } else {
                    MediaReference::Many(decoded)
                }
            }
            Value::Object(obj) => {
                if let Some(data) = obj.get("data") {
                    let node = match data {
                        Value::Array(items) => items.first(),
                        Value::Null => None,
                        other => Some(other),
                    };
                    return match node.and_then(Value::as_object) {
                        Some(node) => {
                            let attrs = node
                                .get("attributes")
                                .and_then(Value::as_object)
                                .unwrap_or(node);
                            MediaReference::Nested(MediaAsset::from_object(attrs))
                        }
                        None => MediaReference::Missing,
                    };
                }
                if let Some(attrs) = obj.get("attributes").and_then(Value::as_object) {
                    return MediaReference::Nested(MediaAsset::from_object(attrs));
                }
                MediaReference::Flat(MediaAsset::from_object(obj))
            }
            _ => MediaReference::Missing,
        }
    }

    /// The single asset this reference points at.
    pub fn asset(&self) -> Option<MediaAsset> {
        match self {
            MediaReference::Missing => None,
            MediaReference::Url(url) => Some(MediaAsset::from_url(url.clone())),
            MediaReference::Flat(asset) | MediaReference::Nested(asset) => Some(asset.clone()),
            MediaReference::Many(items) => items.first().and_then(Self::asset),
        }
    }

    pub fn is_missing(&self) -> bool {
        self.asset().is_none()
    }
}

/// Outcome of image selection. An empty `url` means nothing usable was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedImage {
    pub url: String,
    pub src_set: Option<String>,
}

impl ResolvedImage {
    pub fn is_empty(&self) -> bool {
        self.url.is_empty()
    }
}

/// Picks appropriately sized, absolute image URLs.
#[derive(Debug, Clone)]
pub struct MediaResolver {
    config: CmsConfig,
    placeholder: String,
}

impl MediaResolver {
    pub fn new(config: CmsConfig) -> Self {
        Self {
            config,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }

    /// Asset served when a reference resolves to nothing. Site-relative
    /// paths are left relative.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Choose the smallest named format at least `target_width` wide, else
    /// the widest format, else the original upload. Never fails.
    pub fn resolve_best_image(&self, reference: &MediaReference, target_width: u32) -> ResolvedImage {
        let Some(asset) = reference.asset() else {
            return ResolvedImage::default();
        };

        let mut candidates: Vec<(u32, &str)> = asset
            .formats
            .iter()
            .filter_map(|(name, f)| nominal_width(name).map(|w| (w, f.url.as_str())))
            .collect();
        candidates.sort_by_key(|(w, _)| *w);

        let picked = candidates
            .iter()
            .find(|(w, _)| *w >= target_width)
            .or_else(|| candidates.last())
            .map(|(_, url)| *url)
            .or(asset.url.as_deref())
            .unwrap_or_default();

        let src_set = if candidates.is_empty() {
            None
        } else {
            Some(
                candidates
                    .iter()
                    .map(|(w, url)| format!("{} {}w", self.config.media_url(url), w))
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        };

        ResolvedImage {
            url: self.config.media_url(picked),
            src_set,
        }
    }

    /// Like [`MediaResolver::resolve_best_image`] but substitutes the
    /// placeholder for unusable media.
    pub fn resolve_or_placeholder(&self, reference: &MediaReference, target_width: u32) -> ResolvedImage {
        let resolved = self.resolve_best_image(reference, target_width);
        if resolved.is_empty() {
            diagnostics::debug!("media reference unusable, serving placeholder");
            ResolvedImage {
                url: self.placeholder.clone(),
                src_set: None,
            }
        } else {
            resolved
        }
    }
}

/// Cloudinary delivery directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdnTransform {
    pub width: Option<u32>,
    pub format: Option<String>,
    pub quality: Option<String>,
}

impl Default for CdnTransform {
    fn default() -> Self {
        Self {
            width: None,
            format: Some("auto".to_string()),
            quality: Some("auto".to_string()),
        }
    }
}

impl CdnTransform {
    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            ..Default::default()
        }
    }
}

const CLOUDINARY_HOST: &str = "res.cloudinary.com/";
const UPLOAD_MARKER: &str = "/upload/";

/// Insert `w_…,f_…,q_…` after `/upload/` in Cloudinary URLs. Other URLs are
/// returned unchanged.
pub fn with_cdn_transform(url: &str, transform: &CdnTransform) -> String {
    if !url.contains(CLOUDINARY_HOST) {
        return url.to_string();
    }
    let Some(idx) = url.find(UPLOAD_MARKER) else {
        return url.to_string();
    };

    let mut parts = Vec::new();
    if let Some(w) = transform.width {
        parts.push(format!("w_{}", w));
    }
    if let Some(f) = transform.format.as_deref().filter(|f| !f.is_empty()) {
        parts.push(format!("f_{}", f));
    }
    if let Some(q) = transform.quality.as_deref().filter(|q| !q.is_empty()) {
        parts.push(format!("q_{}", q));
    }
    if parts.is_empty() {
        return url.to_string();
    }

    let split = idx + UPLOAD_MARKER.len();
    format!("{}{}/{}", &url[..split], parts.join(","), &url[split..])
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn as_u32(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolver() -> MediaResolver {
        MediaResolver::new(CmsConfig::new("https://cms.example.fr/api"))
    }

    fn flat() -> Value {
        json!({
            "url": "/uploads/poele.jpg",
            "alternativeText": "Poêle MCZ",
            "formats": {
                "thumbnail": { "url": "/uploads/thumbnail_poele.jpg", "width": 245, "height": 160 },
                "small": { "url": "/uploads/small_poele.jpg", "width": 600, "height": 400 },
                "medium": { "url": "/uploads/medium_poele.jpg", "width": 1000, "height": 667 },
                "large": { "url": "/uploads/large_poele.jpg", "width": 1600, "height": 1067 }
            }
        })
    }

    #[test]
    fn test_decodes_every_shape() {
        assert!(matches!(MediaReference::from_value(&flat()), MediaReference::Flat(_)));
        assert!(matches!(
            MediaReference::from_value(&json!({ "data": { "id": 1, "attributes": flat() } })),
            MediaReference::Nested(_)
        ));
        assert!(matches!(
            MediaReference::from_value(&json!({ "data": [{ "id": 1, "attributes": flat() }] })),
            MediaReference::Nested(_)
        ));
        assert!(matches!(
            MediaReference::from_value(&json!([flat()])),
            MediaReference::Many(_)
        ));
        assert_eq!(
            MediaReference::from_value(&json!("/uploads/a.jpg")),
            MediaReference::Url("/uploads/a.jpg".to_string())
        );
        assert_eq!(MediaReference::from_value(&json!({ "data": null })), MediaReference::Missing);
        assert_eq!(MediaReference::from_value(&json!(null)), MediaReference::Missing);
        assert_eq!(MediaReference::from_value(&json!([])), MediaReference::Missing);
        assert_eq!(MediaReference::from_value(&json!(42)), MediaReference::Missing);
    }

    #[test]
    fn test_same_asset_same_choice_across_shapes() {
        let shapes = [
            flat(),
            json!({ "data": { "attributes": flat() } }),
            json!({ "data": [{ "attributes": flat() }] }),
            json!([flat()]),
            json!([{ "data": { "attributes": flat() } }]),
        ];
        let r = resolver();
        for width in [1, 245, 246, 600, 800, 1000, 1200, 1600, 4000] {
            let expected = r.resolve_best_image(&MediaReference::from_value(&shapes[0]), width);
            for shape in &shapes[1..] {
                let got = r.resolve_best_image(&MediaReference::from_value(shape), width);
                assert_eq!(got, expected, "width {width}");
            }
        }
    }

    #[test]
    fn test_padded_url_resolves_alike_in_every_shape() {
        let padded = " /uploads/a.jpg ";
        let shapes = [
            json!(padded),
            json!({ "url": padded }),
            json!({ "data": { "attributes": { "url": padded } } }),
            json!([padded]),
        ];
        let r = resolver();
        for shape in &shapes {
            let got = r.resolve_best_image(&MediaReference::from_value(shape), 500);
            assert_eq!(got.url, "https://cms.example.fr/uploads/a.jpg", "{shape}");
            assert_eq!(got.src_set, None);
        }
    }

    #[test]
    fn test_smallest_format_at_least_target() {
        let r = resolver();
        let media = MediaReference::from_value(&flat());
        let pick = |w| r.resolve_best_image(&media, w).url;
        assert_eq!(pick(200), "https://cms.example.fr/uploads/thumbnail_poele.jpg");
        assert_eq!(pick(245), "https://cms.example.fr/uploads/thumbnail_poele.jpg");
        assert_eq!(pick(246), "https://cms.example.fr/uploads/small_poele.jpg");
        assert_eq!(pick(1200), "https://cms.example.fr/uploads/large_poele.jpg");
        // Nothing wide enough: widest available
        assert_eq!(pick(3000), "https://cms.example.fr/uploads/large_poele.jpg");
    }

    #[test]
    fn test_widest_when_only_small_formats() {
        let media = MediaReference::from_value(&json!({
            "url": "/uploads/orig.png",
            "formats": {
                "thumbnail": { "url": "/uploads/t.png" },
                "small": { "url": "/uploads/s.png" }
            }
        }));
        assert_eq!(
            resolver().resolve_best_image(&media, 1200).url,
            "https://cms.example.fr/uploads/s.png"
        );
    }

    #[test]
    fn test_base_url_is_last_resort() {
        let media = MediaReference::from_value(&json!({ "url": "https://cdn.example/a.jpg", "formats": {} }));
        let resolved = resolver().resolve_best_image(&media, 1200);
        assert_eq!(resolved.url, "https://cdn.example/a.jpg");
        assert_eq!(resolved.src_set, None);
    }

    #[test]
    fn test_src_set_lists_formats_ascending() {
        let resolved = resolver().resolve_best_image(&MediaReference::from_value(&flat()), 600);
        assert_eq!(
            resolved.src_set.as_deref(),
            Some(
                "https://cms.example.fr/uploads/thumbnail_poele.jpg 245w, \
                 https://cms.example.fr/uploads/small_poele.jpg 600w, \
                 https://cms.example.fr/uploads/medium_poele.jpg 1000w, \
                 https://cms.example.fr/uploads/large_poele.jpg 1600w"
            )
        );
    }

    #[test]
    fn test_missing_media_is_empty_not_error() {
        let r = resolver();
        assert!(r.resolve_best_image(&MediaReference::Missing, 800).is_empty());
        let no_url = MediaReference::from_value(&json!({ "name": "x" }));
        assert!(r.resolve_best_image(&no_url, 800).is_empty());
        assert_eq!(
            r.resolve_or_placeholder(&no_url, 800).url,
            DEFAULT_PLACEHOLDER
        );
        assert_eq!(
            r.clone()
                .with_placeholder("/images/none.png")
                .resolve_or_placeholder(&MediaReference::Missing, 800)
                .url,
            "/images/none.png"
        );
    }

    #[test]
    fn test_metadata_is_kept() {
        let asset = MediaReference::from_value(&json!({ "data": { "attributes": flat() } }))
            .asset()
            .expect("asset");
        assert_eq!(asset.alt_text("fallback"), "Poêle MCZ");
        assert_eq!(asset.formats["small"].width, Some(600));
        assert_eq!(MediaAsset::default().alt_text("fallback"), "fallback");
    }

    #[test]
    fn test_cloudinary_transform() {
        let url = "https://res.cloudinary.com/demo/image/upload/v1712/poele.jpg";
        assert_eq!(
            with_cdn_transform(url, &CdnTransform::width(1200)),
            "https://res.cloudinary.com/demo/image/upload/w_1200,f_auto,q_auto/v1712/poele.jpg"
        );
        assert_eq!(
            with_cdn_transform(url, &CdnTransform::default()),
            "https://res.cloudinary.com/demo/image/upload/f_auto,q_auto/v1712/poele.jpg"
        );
        let bare = CdnTransform {
            width: None,
            format: None,
            quality: None,
        };
        assert_eq!(with_cdn_transform(url, &bare), url);
        assert_eq!(
            with_cdn_transform("https://cms.example.fr/uploads/a.jpg", &CdnTransform::width(600)),
            "https://cms.example.fr/uploads/a.jpg"
        );
        assert_eq!(
            with_cdn_transform("https://res.cloudinary.com/demo/raw/x.pdf", &CdnTransform::width(600)),
            "https://res.cloudinary.com/demo/raw/x.pdf"
        );
    }
}
