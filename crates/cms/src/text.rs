// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! String folding shared by filters, slugs and the service ordering.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold a label for comparison: lowercase, strip diacritics, collapse
/// whitespace. Both sides of every comparison go through this.
pub fn normalize_text(value: &str) -> String {
    let folded: String = value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// URL-safe identifier: folded text with every run of non `[a-z0-9]`
/// characters turned into a single `-`, no leading or trailing `-`.
pub fn make_slug(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut prev_hyphen = true; // suppress leading hyphen
    for ch in normalize_text(value).chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            slug.push(ch);
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Parse a loosely formatted number such as `"7,5 kW"`.
///
/// A comma is read as the decimal separator and everything except digits,
/// `.` and `-` is dropped. Non-finite results are rejected.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .replace(',', ".")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}
