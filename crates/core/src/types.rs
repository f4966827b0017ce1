use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A row returned by the collaborator API.
///
/// The shape is collection-specific and not statically typed by the
/// client; records are treated as read-only snapshots once cached.
pub type Record = serde_json::Map<String, Value>;

/// Field that identifies a record within its collection.
pub const ID_FIELD: &str = "id";

/// Conventional status flag toggled from list screens.
pub const IS_ACTIVE_FIELD: &str = "is_active";

/// Server-assigned record identifier.
///
/// The client never invents ids. Most collections use integers, but the
/// collaborator is free to return strings, so both are accepted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Read an id out of a JSON value. Returns `None` for anything that is
    /// not an integer or a string.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RecordId::Int),
            Value::String(s) => Some(RecordId::Text(s.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            RecordId::Int(n) => Value::from(*n),
            RecordId::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Int(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        match value.parse::<i64>() {
            Ok(n) => RecordId::Int(n),
            Err(_) => RecordId::Text(value.to_string()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// The id of a record, if it carries one.
pub fn record_id(record: &Record) -> Option<RecordId> {
    record.get(ID_FIELD).and_then(RecordId::from_value)
}

/// Interpret a field as a boolean flag.
///
/// The collaborator stores flags as `0`/`1`, but booleans and the strings
/// `"1"`/`"true"` show up on some collections too.
pub fn flag(record: &Record, field: &str) -> bool {
    match record.get(field) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => matches!(s.trim(), "1" | "true"),
        _ => false,
    }
}

/// Whether a record is active. Always derived from `is_active` on read,
/// never stored alongside it.
pub fn is_active(record: &Record) -> bool {
    flag(record, IS_ACTIVE_FIELD)
}

/// Encode a boolean the way the collaborator stores flags.
pub fn flag_value(on: bool) -> Value {
    Value::from(if on { 1 } else { 0 })
}

/// Read a string field, treating anything else as absent.
pub fn text<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn record_id_accepts_integers_and_strings() {
        assert_eq!(
            record_id(&record(json!({"id": 7}))),
            Some(RecordId::Int(7))
        );
        assert_eq!(
            record_id(&record(json!({"id": "a-1"}))),
            Some(RecordId::Text("a-1".into()))
        );
        assert_eq!(record_id(&record(json!({"id": null}))), None);
        assert_eq!(record_id(&record(json!({"name": "x"}))), None);
    }

    #[test]
    fn record_id_from_str_prefers_integers() {
        assert_eq!(RecordId::from("42"), RecordId::Int(42));
        assert_eq!(RecordId::from("abc"), RecordId::Text("abc".into()));
    }

    #[test]
    fn record_id_serializes_untagged() {
        assert_eq!(serde_json::to_value(RecordId::Int(3)).unwrap(), json!(3));
        assert_eq!(
            serde_json::to_value(RecordId::Text("x".into())).unwrap(),
            json!("x")
        );
    }

    #[test]
    fn is_active_reads_numeric_and_boolean_flags() {
        assert!(is_active(&record(json!({"is_active": 1}))));
        assert!(is_active(&record(json!({"is_active": true}))));
        assert!(is_active(&record(json!({"is_active": "1"}))));
        assert!(!is_active(&record(json!({"is_active": 0}))));
        assert!(!is_active(&record(json!({"is_active": false}))));
        assert!(!is_active(&record(json!({}))));
    }

    #[test]
    fn flag_value_encodes_as_integer() {
        assert_eq!(flag_value(true), json!(1));
        assert_eq!(flag_value(false), json!(0));
    }
}
