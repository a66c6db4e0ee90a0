use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// A backend record: an opaque JSON object that carries an `id` field.
pub type Record = Map<String, Value>;

/// Identifier used to key records in an [`AggregatedResult`](super::AggregatedResult).
///
/// The backend uses integer ids for most entities, but string ids are
/// accepted as-is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl RecordId {
    /// Extracts a usable id from a JSON value. Floats, booleans, nulls,
    /// arrays and objects are not usable as keys.
    pub fn from_value(value: &Value) -> Option<RecordId> {
        match value {
            Value::Number(n) => n.as_i64().map(RecordId::Int),
            Value::String(s) => Some(RecordId::Str(s.clone())),
            _ => None,
        }
    }

    /// Reads the `id` field of a record.
    pub fn of(record: &Record) -> Option<RecordId> {
        record.get("id").and_then(RecordId::from_value)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Str(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId::Str(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Str(id) => f.write_str(id),
        }
    }
}
