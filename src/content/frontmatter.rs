//! Front-matter parsing
//!
//! The front-matter format is a deliberately small subset of YAML: one
//! `key: value` pair per line, where a value wrapped in brackets
//! (`[a, b, c]`) becomes a list of strings. There is no quoting, escaping or
//! nesting, and parsing never fails.

use indexmap::IndexMap;
use serde::Serialize;

/// A single front-matter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Plain scalar text
    Text(String),
    /// Bracketed list, e.g. `[go, rust]`
    List(Vec<String>),
}

impl FieldValue {
    /// Parse a raw (already trimmed) value
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            Some(inner) if inner.trim().is_empty() => FieldValue::List(Vec::new()),
            Some(inner) => {
                FieldValue::List(inner.split(',').map(|item| item.trim().to_string()).collect())
            }
            None => FieldValue::Text(raw.to_string()),
        }
    }

    /// The value as text, if it is a scalar
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    /// The value as a list, if it was bracketed
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            FieldValue::Text(_) => None,
        }
    }
}

/// Parsed front-matter fields
///
/// Unknown keys are kept as-is so callers can inspect them; lookups are by
/// exact key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrontMatter {
    fields: IndexMap<String, FieldValue>,
}

impl FrontMatter {
    /// Parse the lines between the two `---` delimiters.
    ///
    /// Blank lines and lines without a `:` are skipped. A repeated key
    /// overwrites the earlier value.
    pub fn parse(block: &str) -> Self {
        let mut fields = IndexMap::new();

        for line in block.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };

            fields.insert(key.trim().to_string(), FieldValue::parse(value.trim()));
        }

        Self { fields }
    }

    /// Look up a raw field
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Look up a scalar field, treating empty text as absent
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(FieldValue::as_text)
            .filter(|s| !s.is_empty())
    }

    /// Look up a list field; scalars are not coerced
    pub fn list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(FieldValue::as_list)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
