//! Decoded message representation
//!
//! A [`MessageRecord`] is what the external FIT decoder hands over: a message
//! kind name plus a loosely-typed field map. Nothing here is validated yet.

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::MessageKind;

/// Key of a decoded field.
///
/// Decoders report profile fields by name and undocumented fields by their
/// raw field number, either as an integer or as its decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    Name(String),
    Number(u32),
}

impl From<&str> for FieldKey {
    fn from(name: &str) -> Self {
        FieldKey::Name(name.to_string())
    }
}

impl From<String> for FieldKey {
    fn from(name: String) -> Self {
        FieldKey::Name(name)
    }
}

impl From<u32> for FieldKey {
    fn from(number: u32) -> Self {
        FieldKey::Number(number)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Name(name) => f.write_str(name),
            FieldKey::Number(number) => write!(f, "{number}"),
        }
    }
}

impl Serialize for FieldKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldKey::Name(name) => serializer.serialize_str(name),
            FieldKey::Number(number) => serializer.collect_str(number),
        }
    }
}

impl<'de> Deserialize<'de> for FieldKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl<'de> Visitor<'de> for KeyVisitor {
            type Value = FieldKey;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a field name or field number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<FieldKey, E> {
                Ok(FieldKey::Name(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<FieldKey, E> {
                u32::try_from(v)
                    .map(FieldKey::Number)
                    .map_err(|_| E::custom(format!("field number {v} out of range")))
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}

/// Reference to a field key usable in static lookup tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRef {
    Name(&'static str),
    Number(u32),
}

impl KeyRef {
    pub fn to_key(self) -> FieldKey {
        match self {
            KeyRef::Name(name) => FieldKey::Name(name.to_string()),
            KeyRef::Number(number) => FieldKey::Number(number),
        }
    }
}

/// Loosely-typed field value as produced by the decoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Number(f64),
    Timestamp(DateTime<Utc>),
    Text(String),
    Boolean(bool),
    Array(Vec<FieldValue>),
    Object(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            FieldValue::Number(n) if n.is_finite() => Some(*n as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Timestamps arrive already parsed, or as RFC 3339 text when the map was
    /// built by hand.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            FieldValue::Text(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|ts| ts.with_timezone(&Utc)),
            _ => None,
        }
    }

    /// Enum-like fields come as a profile label or as the raw code.
    pub fn as_label(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Integer(i) => Some(i.to_string()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Integer(v as i64)
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::Integer(v as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(v)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(v: Vec<T>) -> Self {
        FieldValue::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

/// Field map of one decoded message
pub type FieldMap = HashMap<FieldKey, FieldValue>;

/// Return the first non-null value among `candidates`, in priority order
pub fn resolve<'a>(fields: &'a FieldMap, candidates: &[KeyRef]) -> Option<&'a FieldValue> {
    candidates
        .iter()
        .filter_map(|key| fields.get(&key.to_key()))
        .find(|value| !value.is_null())
}

/// One decoded message: kind name plus raw fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Profile name of the message kind (e.g. "session", "MONITORING")
    pub kind: String,
    #[serde(default)]
    pub fields: FieldMap,
}

impl MessageRecord {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: FieldMap::new(),
        }
    }

    /// Builder-style field insertion
    pub fn with(mut self, key: impl Into<FieldKey>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Known kind of this message, `None` for kinds the assembler ignores
    pub fn message_kind(&self) -> Option<MessageKind> {
        MessageKind::from_name(&self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_deserialize_field_values() {
        let json = r#"{
            "kind": "record",
            "fields": {
                "timestamp": "2024-01-15T08:30:00Z",
                "heart_rate": 142,
                "enhanced_speed": 3.25,
                "category": ["squat"],
                "position_lat": null,
                "15": 120
            }
        }"#;

        let record: MessageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.message_kind(), Some(MessageKind::Record));
        assert_eq!(
            record.fields[&FieldKey::from("timestamp")],
            FieldValue::Timestamp(Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap())
        );
        assert_eq!(record.fields[&FieldKey::from("heart_rate")], FieldValue::Integer(142));
        assert_eq!(record.fields[&FieldKey::from("enhanced_speed")], FieldValue::Number(3.25));
        assert!(record.fields[&FieldKey::from("position_lat")].is_null());
        assert_eq!(record.fields[&FieldKey::from("15")].as_i64(), Some(120));
    }

    #[test]
    fn test_plain_text_is_not_a_timestamp() {
        let value: FieldValue = serde_json::from_str(r#""running""#).unwrap();
        assert_eq!(value, FieldValue::Text("running".to_string()));
        assert_eq!(value.as_timestamp(), None);
    }

    #[test]
    fn test_resolve_prefers_first_candidate() {
        let record = MessageRecord::new("split")
            .with("15", 130)
            .with(15u32, 99);
        let value = resolve(&record.fields, &[KeyRef::Name("15"), KeyRef::Number(15)]);
        assert_eq!(value, Some(&FieldValue::Integer(130)));

        let record = MessageRecord::new("split").with(15u32, 99);
        let value = resolve(&record.fields, &[KeyRef::Name("15"), KeyRef::Number(15)]);
        assert_eq!(value, Some(&FieldValue::Integer(99)));
    }

    #[test]
    fn test_resolve_skips_nulls() {
        let record = MessageRecord::new("split")
            .with("15", FieldValue::Null)
            .with(15u32, 101);
        let value = resolve(&record.fields, &[KeyRef::Name("15"), KeyRef::Number(15)]);
        assert_eq!(value.and_then(FieldValue::as_i64), Some(101));
    }

    #[test]
    fn test_numeric_key_serializes_as_string() {
        let record = MessageRecord::new("split").with(71u32, 3);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["fields"]["71"], 3);
    }
}
