//! Case-insensitive header collection.
//!
//! Header names are ASCII and case-insensitive as per
//! [RFC 9110 Section 5.1](https://www.rfc-editor.org/rfc/rfc9110#section-5.1),
//! and collaborators may hand them over with a trailing colon or whitespace
//! left from header-line splitting. Names are normalized once at the write
//! boundary and every lookup normalizes its probe, so the map holds at most
//! one entry per logical header and the raw casing is never stored.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::ensure;
use crate::error::HeaderError;

/// A header name in its normalized form.
///
/// Normalization folds the name to ASCII lowercase and strips any trailing
/// colon and whitespace. Construction always goes through
/// [`HeaderName::normalize`], which makes normalization idempotent: feeding
/// a normalized name back in yields the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeaderName(String);

impl HeaderName {
    /// Normalizes a raw header name.
    pub fn normalize(name: &str) -> Self {
        let trimmed = name.trim_end_matches(|c: char| c == ':' || c.is_ascii_whitespace());
        Self(trimmed.to_ascii_lowercase())
    }

    /// Returns the normalized name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for HeaderName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HeaderName {
    fn from(name: &str) -> Self {
        Self::normalize(name)
    }
}

/// A collection of unique headers keyed by normalized name.
///
/// Values are opaque strings. Two names that normalize to the same form
/// refer to the same entry, and the last write for a normalized name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: HashMap<HeaderName, String>,
}

impl HeaderMap {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under the normalized form of `name`, overwriting any
    /// previous value held under the same normalized name.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.entries.insert(HeaderName::normalize(name), value.into());
    }

    /// Returns the value stored under the normalized form of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(HeaderName::normalize(name).as_str()).map(String::as_str)
    }

    /// Returns whether an entry exists under the normalized form of `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(HeaderName::normalize(name).as_str())
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &str)> {
        self.entries.iter().map(|(name, value)| (name, value.as_str()))
    }

    /// Returns an owned snapshot of the full mapping, keyed by normalized
    /// name.
    ///
    /// The snapshot is detached from the map: mutating it has no effect on
    /// subsequent lookups here.
    pub fn to_map(&self) -> HashMap<String, String> {
        self.entries.iter().map(|(name, value)| (name.as_str().to_owned(), value.clone())).collect()
    }

    /// Applies the key-value pairs found in a loosely typed JSON value.
    ///
    /// Accepts a string-keyed object, or an array of two-element
    /// `[name, value]` arrays applied in order. Scalar values (string,
    /// number, boolean) are coerced to their text form. Any other shape
    /// fails with [`HeaderError::InvalidSource`] and leaves the map
    /// untouched.
    pub fn try_extend_from_value(&mut self, source: &Value) -> Result<(), HeaderError> {
        let pairs = pairs_from_value(source)?;
        self.entries.extend(pairs.into_iter().map(|(name, value)| (HeaderName::normalize(&name), value)));
        Ok(())
    }
}

impl<K: AsRef<str>, V: Into<String>> Extend<(K, V)> for HeaderMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name.as_ref(), value);
        }
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        headers.extend(iter);
        headers
    }
}

fn pairs_from_value(source: &Value) -> Result<Vec<(String, String)>, HeaderError> {
    match source {
        Value::Object(fields) => {
            fields.iter().map(|(name, value)| Ok((name.clone(), scalar_to_string(name, value)?))).collect()
        }
        Value::Array(items) => items.iter().map(pair_from_item).collect(),
        other => Err(HeaderError::invalid_source(format!(
            "expected an object or an array of [name, value] pairs, got {}",
            json_kind(other)
        ))),
    }
}

fn pair_from_item(item: &Value) -> Result<(String, String), HeaderError> {
    let Value::Array(pair) = item else {
        return Err(HeaderError::invalid_source(format!(
            "array items must be [name, value] pairs, got {}",
            json_kind(item)
        )));
    };

    ensure!(
        pair.len() == 2,
        HeaderError::invalid_source(format!("expected a [name, value] pair, got {} elements", pair.len()))
    );

    let Value::String(name) = &pair[0] else {
        return Err(HeaderError::invalid_source(format!(
            "header name must be a string, got {}",
            json_kind(&pair[0])
        )));
    };

    Ok((name.clone(), scalar_to_string(name, &pair[1])?))
}

fn scalar_to_string(name: &str, value: &Value) -> Result<String, HeaderError> {
    match value {
        Value::String(value) => Ok(value.clone()),
        Value::Number(value) => Ok(value.to_string()),
        Value::Bool(value) => Ok(value.to_string()),
        other => {
            Err(HeaderError::invalid_source(format!("value for {name:?} must be a scalar, got {}", json_kind(other))))
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
