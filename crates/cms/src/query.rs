// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Query strings in the CMS's nested-filter convention.
//!
//! Nested maps become bracketed keys (`filters[slug][$eq]=x`) and lists become
//! repeated keys (`tags=a&tags=b`), which is what `$in` filters expect.
//! Null and empty-string values are dropped at any depth.

use url::form_urlencoded;

/// One value in a query parameter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Null,
    Scalar(String),
    List(Vec<QueryValue>),
    Map(Vec<(String, QueryValue)>),
}

impl QueryValue {
    pub fn map<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<QueryValue>,
    {
        QueryValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    fn append_to(&self, key: &str, out: &mut Vec<(String, String)>) {
        match self {
            QueryValue::Null => {}
            QueryValue::Scalar(s) if s.is_empty() => {}
            QueryValue::Scalar(s) => out.push((key.to_string(), s.clone())),
            QueryValue::List(items) => {
                for item in items {
                    item.append_to(key, out);
                }
            }
            QueryValue::Map(entries) => {
                for (child, value) in entries {
                    value.append_to(&format!("{}[{}]", key, child), out);
                }
            }
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Scalar(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Scalar(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        QueryValue::Scalar(value.clone())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Scalar(value.to_string())
    }
}

macro_rules! scalar_from_number {
    ($($t:ty),*) => {
        $(impl From<$t> for QueryValue {
            fn from(value: $t) -> Self {
                QueryValue::Scalar(value.to_string())
            }
        })*
    };
}

scalar_from_number!(i32, i64, u32, u64, usize, f64);

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(QueryValue::Null, Into::into)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        QueryValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for QueryValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => QueryValue::Null,
            Value::Bool(b) => b.into(),
            Value::Number(n) => QueryValue::Scalar(n.to_string()),
            Value::String(s) => QueryValue::Scalar(s),
            Value::Array(items) => QueryValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => QueryValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

/// Top-level query parameters, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, QueryValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`QueryParams::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`, replacing an earlier value for the same key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Append every entry of `other`, overriding duplicate keys.
    pub fn merge(mut self, other: QueryParams) -> Self {
        for (k, v) in other.entries {
            self.insert(k, v);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }

    /// Flattened `(key, value)` pairs in output order.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for (key, value) in &self.entries {
            value.append_to(key, &mut out);
        }
        out
    }

    /// Encoded query without the leading `?`.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in self.pairs() {
            serializer.append_pair(&k, &v);
        }
        serializer.finish()
    }
}

impl From<serde_json::Value> for QueryParams {
    /// Objects become top-level entries; any other JSON value yields no
    /// parameters.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => QueryParams {
                entries: map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            },
            _ => QueryParams::new(),
        }
    }
}

/// `?`-prefixed query string, or the empty string when nothing survives.
pub fn build_query_string(params: &QueryParams) -> String {
    let encoded = params.encode();
    if encoded.is_empty() {
        encoded
    } else {
        format!("?{}", encoded)
    }
}

/// Percent-encode one URL path segment. Reserved characters such as `/`,
/// `?` and `#` cannot escape the segment.
pub fn encode_path_segment(segment: &str) -> String {
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Append `params` to a path that may already carry a query string.
pub fn with_query(path: &str, params: &QueryParams) -> String {
    let encoded = params.encode();
    if encoded.is_empty() {
        path.to_string()
    } else if path.contains('?') {
        format!("{}&{}", path, encoded)
    } else {
        format!("{}?{}", path, encoded)
    }
}
