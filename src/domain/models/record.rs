use std::collections::BTreeMap;

/// A dynamically-typed value inside a log record.
///
/// Byte sequences are kept apart from text so the encoder can turn them
/// into readable strings instead of an opaque array or base64 blob.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Array(Vec<RecordValue>),
    Map(LogRecord),
}

/// One decoded log event: field name to value, nested to any depth.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogRecord {
    fields: BTreeMap<String, RecordValue>,
}

impl LogRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RecordValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RecordValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        self.fields.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RecordValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, RecordValue)> for LogRecord {
    fn from_iter<T: IntoIterator<Item = (String, RecordValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for LogRecord {
    type Item = (String, RecordValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, RecordValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for LogRecord {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter()
            .map(|(key, value)| (key, RecordValue::from(value)))
            .collect()
    }
}

impl From<serde_json::Value> for RecordValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => RecordValue::Null,
            Value::Bool(b) => RecordValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    RecordValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    RecordValue::UInt(u)
                } else {
                    RecordValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => RecordValue::Text(s),
            Value::Array(items) => {
                RecordValue::Array(items.into_iter().map(RecordValue::from).collect())
            }
            Value::Object(map) => RecordValue::Map(LogRecord::from(map)),
        }
    }
}

impl From<bool> for RecordValue {
    fn from(value: bool) -> Self {
        RecordValue::Bool(value)
    }
}

impl From<i64> for RecordValue {
    fn from(value: i64) -> Self {
        RecordValue::Int(value)
    }
}

impl From<u64> for RecordValue {
    fn from(value: u64) -> Self {
        RecordValue::UInt(value)
    }
}

impl From<f64> for RecordValue {
    fn from(value: f64) -> Self {
        RecordValue::Float(value)
    }
}

impl From<&str> for RecordValue {
    fn from(value: &str) -> Self {
        RecordValue::Text(value.to_string())
    }
}

impl From<String> for RecordValue {
    fn from(value: String) -> Self {
        RecordValue::Text(value)
    }
}

impl From<Vec<u8>> for RecordValue {
    fn from(value: Vec<u8>) -> Self {
        RecordValue::Bytes(value)
    }
}

impl From<&[u8]> for RecordValue {
    fn from(value: &[u8]) -> Self {
        RecordValue::Bytes(value.to_vec())
    }
}

impl From<LogRecord> for RecordValue {
    fn from(value: LogRecord) -> Self {
        RecordValue::Map(value)
    }
}

impl From<Vec<RecordValue>> for RecordValue {
    fn from(value: Vec<RecordValue>) -> Self {
        RecordValue::Array(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_object() {
        let value = json!({
            "log": "hello",
            "count": 3,
            "big": u64::MAX,
            "ratio": 0.5,
            "kubernetes": { "pod": "web-1", "labels": ["a", "b"] },
            "missing": null
        });

        let serde_json::Value::Object(map) = value else {
            panic!("expected object");
        };
        let record = LogRecord::from(map);

        assert_eq!(record.len(), 6);
        assert_eq!(record.get("log"), Some(&RecordValue::Text("hello".into())));
        assert_eq!(record.get("count"), Some(&RecordValue::Int(3)));
        assert_eq!(record.get("big"), Some(&RecordValue::UInt(u64::MAX)));
        assert_eq!(record.get("ratio"), Some(&RecordValue::Float(0.5)));
        assert_eq!(record.get("missing"), Some(&RecordValue::Null));

        let Some(RecordValue::Map(nested)) = record.get("kubernetes") else {
            panic!("expected nested map");
        };
        assert_eq!(nested.get("pod"), Some(&RecordValue::Text("web-1".into())));
        assert_eq!(
            nested.get("labels"),
            Some(&RecordValue::Array(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn test_builder_insert() {
        let record = LogRecord::new()
            .with("raw", b"bytes".as_slice())
            .with("level", "info");

        assert_eq!(record.get("raw"), Some(&RecordValue::Bytes(b"bytes".to_vec())));
        assert!(!record.is_empty());
    }
}
