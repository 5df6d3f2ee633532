use serde_json::{Map, Number, Value};

use crate::domain::{
    errors::EncodeError,
    models::{LogRecord, RecordValue},
};

/// Placeholder line handed back when a record cannot be encoded
pub const EMPTY_OBJECT: &str = "{}";

/// Converts decoded log records into single-line JSON objects.
///
/// Byte sequences become text at every depth so log content stays readable
/// in the stored batch; other scalars keep their JSON type.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordEncoder;

impl RecordEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode one record as a JSON object on a single line
    pub fn encode(&self, record: &LogRecord) -> Result<String, EncodeError> {
        let value = Value::Object(normalize_record(record, "")?);
        Ok(serde_json::to_string(&value)?)
    }

    /// Like `encode`, but always yields a line: `{}` plus the error when the
    /// record cannot be represented.
    pub fn encode_or_placeholder(&self, record: &LogRecord) -> (String, Option<EncodeError>) {
        match self.encode(record) {
            Ok(line) => (line, None),
            Err(err) => (EMPTY_OBJECT.to_string(), Some(err)),
        }
    }
}

fn field_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn normalize_record(record: &LogRecord, path: &str) -> Result<Map<String, Value>, EncodeError> {
    record
        .iter()
        .map(|(key, value)| {
            let path = field_path(path, key);
            normalize_value(value, &path).map(|v| (key.clone(), v))
        })
        .collect()
}

fn normalize_value(value: &RecordValue, path: &str) -> Result<Value, EncodeError> {
    Ok(match value {
        RecordValue::Null => Value::Null,
        RecordValue::Bool(b) => Value::Bool(*b),
        RecordValue::Int(i) => Value::from(*i),
        RecordValue::UInt(u) => Value::from(*u),
        RecordValue::Float(f) => Number::from_f64(*f).map(Value::Number).ok_or_else(|| {
            EncodeError::NonFiniteFloat {
                field: path.to_string(),
                value: *f,
            }
        })?,
        RecordValue::Text(s) => Value::String(s.clone()),
        RecordValue::Bytes(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        RecordValue::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(idx, item)| normalize_value(item, &format!("{}[{}]", path, idx)))
                .collect::<Result<_, _>>()?,
        ),
        RecordValue::Map(nested) => Value::Object(normalize_record(nested, path)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(line: &str) -> Value {
        serde_json::from_str(line).unwrap()
    }

    #[test]
    fn test_bytes_become_text_at_every_depth() {
        let record = LogRecord::new()
            .with("log", b"GET /index.html 200".as_slice())
            .with(
                "kubernetes",
                LogRecord::new()
                    .with("pod_name", b"web-1".as_slice())
                    .with("labels", LogRecord::new().with("app", b"web".as_slice())),
            );

        let line = RecordEncoder::new().encode(&record).unwrap();
        assert_eq!(
            parse(&line),
            json!({
                "log": "GET /index.html 200",
                "kubernetes": { "pod_name": "web-1", "labels": { "app": "web" } }
            })
        );
    }

    #[test]
    fn test_scalars_pass_through() {
        let record = LogRecord::new()
            .with("int", -7i64)
            .with("uint", u64::MAX)
            .with("float", 1.25f64)
            .with("flag", true)
            .with("text", "plain")
            .with("none", RecordValue::Null)
            .with("list", vec![RecordValue::Int(1), RecordValue::Bytes(b"x".to_vec())]);

        let line = RecordEncoder::new().encode(&record).unwrap();
        assert_eq!(
            parse(&line),
            json!({
                "int": -7,
                "uint": u64::MAX,
                "float": 1.25,
                "flag": true,
                "text": "plain",
                "none": null,
                "list": [1, "x"]
            })
        );
    }

    #[test]
    fn test_single_line_output() {
        let record = LogRecord::new().with("log", b"line one\nline two".as_slice());
        let line = RecordEncoder::new().encode(&record).unwrap();

        assert!(!line.contains('\n'));
        assert_eq!(parse(&line), json!({ "log": "line one\nline two" }));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let record = LogRecord::new().with("raw", vec![b'o', b'k', 0xff]);
        let line = RecordEncoder::new().encode(&record).unwrap();
        assert_eq!(parse(&line), json!({ "raw": "ok\u{fffd}" }));
    }

    #[test]
    fn test_non_finite_float_fails_with_placeholder() {
        let record = LogRecord::new().with(
            "metrics",
            LogRecord::new().with("ratio", f64::INFINITY),
        );

        let (line, err) = RecordEncoder::new().encode_or_placeholder(&record);
        assert_eq!(line, EMPTY_OBJECT);
        assert!(matches!(
            err,
            Some(EncodeError::NonFiniteFloat { ref field, .. }) if field == "metrics.ratio"
        ));
    }

    #[test]
    fn test_empty_record() {
        assert_eq!(RecordEncoder::new().encode(&LogRecord::new()).unwrap(), "{}");
    }
}
