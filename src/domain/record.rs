//! Record - Opaque Row Data
//!
//! Rows handed to the grid are plain JSON objects. The grid never assumes a
//! schema beyond the fields the column descriptors reference.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{Error, Result};

/// A single row: field name -> JSON value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap an existing JSON object
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Convert any serializable struct into a record
    ///
    /// Fails when the value does not serialize to a JSON object.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::Invalid {
                message: format!("record must be a JSON object, got {other}"),
            }),
        }
    }

    /// Builder-style field insertion
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Insert or replace a field
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Look up a field by name or dotted path (`applicant.name`)
    ///
    /// An exact top-level match wins over path traversal, so field names
    /// containing dots still resolve.
    pub fn get(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.0.get(path) {
            return Some(value);
        }
        let mut parts = path.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Non-null value at `path`
    pub fn value(&self, path: &str) -> Option<&Value> {
        self.get(path).filter(|v| !v.is_null())
    }

    /// Stringified value at `path` ("" for missing or null)
    pub fn text(&self, path: &str) -> String {
        stringify(self.get(path))
    }

    /// Raw field map
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Stringify a cell value the way search and lexical sort see it
pub fn stringify(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Stable row identity used for selection and re-keying
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RowKey {
    /// Value of the identity field
    Id(String),
    /// Position in the record set, used when the identity field is missing
    Position(usize),
}

impl RowKey {
    /// Derive the key for a record at `position`
    pub fn for_record(record: &Record, id_field: &str, position: usize) -> Self {
        match record.get(id_field) {
            Some(Value::String(s)) if !s.is_empty() => RowKey::Id(s.clone()),
            Some(Value::Number(n)) => RowKey::Id(n.to_string()),
            _ => RowKey::Position(position),
        }
    }

    /// Whether this key came from the positional fallback
    pub fn is_positional(&self) -> bool {
        matches!(self, RowKey::Position(_))
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Id(id) => f.write_str(id),
            RowKey::Position(pos) => write!(f, "#{pos}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dotted_path_lookup() {
        let record = Record::new()
            .with("applicant", json!({ "name": "Ana Cruz", "phones": ["0917", "0918"] }))
            .with("fee.total", 150);

        assert_eq!(record.text("applicant.name"), "Ana Cruz");
        assert_eq!(record.text("applicant.phones.1"), "0918");
        assert_eq!(record.text("fee.total"), "150");
        assert!(record.get("applicant.missing").is_none());
    }

    #[test]
    fn test_stringify_null_and_missing_are_empty() {
        let record = Record::new().with("remarks", Value::Null).with("paid", true);
        assert_eq!(record.text("remarks"), "");
        assert_eq!(record.text("nope"), "");
        assert_eq!(record.text("paid"), "true");
        assert!(record.value("remarks").is_none());
    }

    #[test]
    fn test_row_key_falls_back_to_position() {
        let with_id = Record::new().with("id", 42);
        let with_str = Record::new().with("id", "REQ-7");
        let blank = Record::new().with("id", "");
        let missing = Record::new();

        assert_eq!(RowKey::for_record(&with_id, "id", 0), RowKey::Id("42".into()));
        assert_eq!(RowKey::for_record(&with_str, "id", 1), RowKey::Id("REQ-7".into()));
        assert_eq!(RowKey::for_record(&blank, "id", 2), RowKey::Position(2));
        assert!(RowKey::for_record(&missing, "id", 3).is_positional());
    }

    #[test]
    fn test_from_serialize_rejects_non_objects() {
        assert!(Record::from_serialize(&vec![1, 2, 3]).is_err());
        let record = Record::from_serialize(&json!({ "id": 1 })).expect("object");
        assert_eq!(record.text("id"), "1");
    }
}
