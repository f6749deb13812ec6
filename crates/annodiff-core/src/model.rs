//! Input record model
//!
//! One `Record` per JSONL line. Records are built by the loader and never
//! mutated afterwards.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One annotated document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub metadata: RecordMetadata,
    pub text: String,
    pub subjects: Vec<Subject>,
}

impl Record {
    /// The join key between the two datasets
    pub fn data_id(&self) -> &str {
        &self.metadata.data_id
    }
}

/// Record metadata: the mandatory `data_id` plus every other key verbatim
///
/// `data_id` is also kept in `fields` so metadata comparison sees exactly
/// what the input contained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct RecordMetadata {
    data_id: String,
    fields: Map<String, Value>,
}

impl RecordMetadata {
    /// Keys accepted for the record identifier, in lookup order
    pub const ID_KEYS: [&'static str; 2] = ["data_id", "dataId"];

    pub fn data_id(&self) -> &str {
        &self.data_id
    }

    /// All metadata keys, including the identifier
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl TryFrom<Map<String, Value>> for RecordMetadata {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let data_id = Self::ID_KEYS
            .iter()
            .find_map(|k| fields.get(*k))
            .and_then(Value::as_str)
            .ok_or_else(|| "metadata.data_id must be a string".to_string())?
            .to_string();
        Ok(Self { data_id, fields })
    }
}

impl From<RecordMetadata> for Map<String, Value> {
    fn from(meta: RecordMetadata) -> Self {
        meta.fields
    }
}

/// Subject identifier: any JSON scalar found in the input
///
/// `1` and `"1"` are different ids. Numbers compare by value, so `1`, `1.0`
/// and `true` are the same id; integral floats and booleans load as `Int`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum SubjectId {
    Null,
    Int(i64),
    /// Only for integers above `i64::MAX`
    UInt(u64),
    Float(FloatId),
    Text(String),
}

impl SubjectId {
    fn from_number(n: &Number) -> Self {
        if let Some(i) = n.as_i64() {
            return SubjectId::Int(i);
        }
        if let Some(u) = n.as_u64() {
            return SubjectId::UInt(u);
        }
        match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                SubjectId::Int(f as i64)
            }
            Some(f) => SubjectId::Float(FloatId(f)),
            // arbitrary-precision numbers outside f64
            None => SubjectId::Text(n.to_string()),
        }
    }
}

impl TryFrom<Value> for SubjectId {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(SubjectId::Null),
            Value::Bool(b) => Ok(SubjectId::Int(i64::from(b))),
            Value::Number(n) => Ok(SubjectId::from_number(&n)),
            Value::String(s) => Ok(SubjectId::Text(s)),
            other => Err(format!("subject id must be a JSON scalar, got {}", other)),
        }
    }
}

impl From<SubjectId> for Value {
    fn from(id: SubjectId) -> Self {
        match id {
            SubjectId::Null => Value::Null,
            SubjectId::Int(n) => Value::from(n),
            SubjectId::UInt(n) => Value::from(n),
            SubjectId::Float(FloatId(f)) => Number::from_f64(f).map_or(Value::Null, Value::Number),
            SubjectId::Text(s) => Value::String(s),
        }
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectId::Null => write!(f, "null"),
            SubjectId::Int(n) => write!(f, "{}", n),
            SubjectId::UInt(n) => write!(f, "{}", n),
            SubjectId::Float(FloatId(x)) => write!(f, "{}", x),
            SubjectId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Non-integral numeric subject id, ordered with `f64::total_cmp`
#[derive(Debug, Clone, Copy)]
pub struct FloatId(pub f64);

impl PartialEq for FloatId {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatId {}

impl PartialOrd for FloatId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for FloatId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl From<i64> for SubjectId {
    fn from(n: i64) -> Self {
        SubjectId::Int(n)
    }
}

impl From<&str> for SubjectId {
    fn from(s: &str) -> Self {
        SubjectId::Text(s.to_string())
    }
}

/// An entity described within a record's text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub description: String,
    #[serde(rename = "PIIs")]
    pub piis: Vec<Pii>,
}

/// One PII annotation attached to a subject
///
/// Unknown keys are kept in `extra` and written back out, so a PII echoed
/// into a report looks exactly like its input object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pii {
    pub tag: String,
    pub keyword: Value,
    pub certainty: Value,
    pub hardness: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Pii {
    /// Names of the fields compared for a matched tag
    pub const COMPARED_FIELDS: [&'static str; 3] = ["keyword", "certainty", "hardness"];

    /// Look up one of the compared fields by name
    pub fn field(&self, name: &str) -> Option<&Value> {
        match name {
            "keyword" => Some(&self.keyword),
            "certainty" => Some(&self.certainty),
            "hardness" => Some(&self.hardness),
            _ => self.extra.get(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_metadata_keeps_all_fields() {
        let meta: RecordMetadata =
            serde_json::from_value(json!({"data_id": "d1", "provenance": "x"})).unwrap();
        assert_eq!(meta.data_id(), "d1");
        assert_eq!(meta.fields().len(), 2);
        assert_eq!(meta.fields()["provenance"], json!("x"));
    }

    #[test]
    fn test_record_metadata_accepts_camel_case_alias() {
        let meta: RecordMetadata = serde_json::from_value(json!({"dataId": "d2"})).unwrap();
        assert_eq!(meta.data_id(), "d2");
    }

    #[test]
    fn test_record_metadata_rejects_numeric_id() {
        let meta: Result<RecordMetadata, _> = serde_json::from_value(json!({"data_id": 5}));
        assert!(meta.is_err());
    }

    #[test]
    fn test_subject_id_int_and_text_are_distinct() {
        let a: SubjectId = serde_json::from_value(json!(1)).unwrap();
        let b: SubjectId = serde_json::from_value(json!("1")).unwrap();
        assert_eq!(a, SubjectId::Int(1));
        assert_eq!(b, SubjectId::Text("1".into()));
        assert_ne!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_subject_id_accepts_every_scalar() {
        let id = |v: Value| serde_json::from_value::<SubjectId>(v).unwrap();

        assert_eq!(id(json!(1.0)), SubjectId::Int(1));
        assert_eq!(id(json!(true)), SubjectId::Int(1));
        assert_eq!(id(json!(u64::MAX)), SubjectId::UInt(u64::MAX));
        assert_eq!(id(json!(2.5)), SubjectId::Float(FloatId(2.5)));
        assert_eq!(id(json!(null)), SubjectId::Null);
        assert!(serde_json::from_value::<SubjectId>(json!([1])).is_err());
    }

    #[test]
    fn test_subject_id_serializes_as_plain_json() {
        let ids = vec![
            SubjectId::Int(-3),
            SubjectId::UInt(u64::MAX),
            SubjectId::Float(FloatId(2.5)),
            SubjectId::Text("s1".into()),
        ];
        let v = serde_json::to_value(&ids).unwrap();
        assert_eq!(v, json!([-3, u64::MAX, 2.5, "s1"]));
    }

    #[test]
    fn test_pii_preserves_extra_fields() {
        let input = json!({
            "tag": "NAME",
            "keyword": "Jane",
            "certainty": 5,
            "hardness": 1,
            "span": [0, 4]
        });
        let pii: Pii = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(pii.extra["span"], json!([0, 4]));
        assert_eq!(serde_json::to_value(&pii).unwrap(), input);
    }

    #[test]
    fn test_pii_requires_compared_fields() {
        let missing = json!({"tag": "NAME", "keyword": "Jane", "certainty": 5});
        assert!(serde_json::from_value::<Pii>(missing).is_err());
    }

    #[test]
    fn test_pii_null_keyword_is_present() {
        let pii: Pii = serde_json::from_value(
            json!({"tag": "AGE", "keyword": null, "certainty": 0, "hardness": 0}),
        )
        .unwrap();
        assert_eq!(pii.field("keyword"), Some(&Value::Null));
    }
}
