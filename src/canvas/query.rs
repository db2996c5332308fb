//! Query-string builder for Canvas requests.
//!
//! Canvas expects array parameters in bracket form (`include[]=syllabus_body`),
//! which a plain serde struct cannot express, so tools build an ordered list of
//! pairs instead. Values are rendered through `serde_json`, which lets enums,
//! numbers and booleans be passed directly.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Ordered query parameters for a single Canvas request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key=value`. Values that render to nothing (`null`) are skipped.
    pub fn push<V: Serialize>(mut self, key: &str, value: V) -> Self {
        if let Some(value) = wire_value(&value) {
            self.pairs.push((key.to_string(), value));
        }
        self
    }

    /// Append `key=value` when a value is present.
    pub fn push_opt<V: Serialize>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    /// Append one `key[]=value` pair per element.
    pub fn push_list<V: Serialize>(mut self, key: &str, values: Option<&[V]>) -> Self {
        let key = format!("{key}[]");
        for value in values.unwrap_or_default() {
            if let Some(value) = wire_value(value) {
                self.pairs.push((key.clone(), value));
            }
        }
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for Query {
    /// URL-encoded form, as it appears after `?`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = serde_urlencoded::to_string(&self.pairs).map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

fn wire_value<V: Serialize + ?Sized>(value: &V) -> Option<String> {
    match serde_json::to_value(value).ok()? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
