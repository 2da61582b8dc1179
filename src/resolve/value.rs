use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde_json::Value as Json;

use super::{Record, ResolutionWarning, WarningKind};

/// A date-time with or without a UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// Local time without an offset
    Naive(NaiveDateTime),
    /// Time with an explicit offset
    Zoned(DateTime<FixedOffset>),
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
];

impl Timestamp {
    /// Parse an ISO-8601 string.
    ///
    /// Accepts an optional offset (`Z`, `+hh:mm`, `+hhmm`), optional
    /// sub-second precision, `T` or space as separator, and a bare date
    /// (taken as midnight).
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(Timestamp::Zoned(dt));
        }
        for format in ZONED_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(text, format) {
                return Some(Timestamp::Zoned(dt));
            }
        }
        for format in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
                return Some(Timestamp::Naive(dt));
            }
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Timestamp::Naive)
    }

    /// ISO-8601 text, with the offset when one is known
    pub fn to_iso(&self) -> String {
        match self {
            Timestamp::Naive(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            Timestamp::Zoned(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f%:z").to_string(),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso())
    }
}

/// A value resolved against its declared type
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent optional value
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// String, also used for enumeration members
    Str(String),
    /// Date-time
    Timestamp(Timestamp),
    /// List or tuple
    List(Vec<Value>),
    /// Typed mapping, in input order
    Map(Vec<(Value, Value)>),
    /// Nested record
    Record(Record),
    /// Raw value kept unresolved
    Raw(Json),
}

impl Value {
    /// Whether this is [`Value::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Float view; integers are widened
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Integer view
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// String view
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Record view
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Sequence view
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Plain JSON projection used by the codecs.
    ///
    /// Non-finite floats have no JSON form; they become null and a warning
    /// is pushed to `warnings`.
    pub fn to_plain(&self, path: &str, warnings: &mut Vec<ResolutionWarning>) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Float(v) => match serde_json::Number::from_f64(*v) {
                Some(n) => Json::Number(n),
                None => {
                    let warning = ResolutionWarning::new(
                        path,
                        WarningKind::Unrepresentable {
                            reason: format!("non-finite float {}", v),
                        },
                    );
                    log::warn!("{}", warning);
                    warnings.push(warning);
                    Json::Null
                }
            },
            Value::Str(s) => Json::String(s.clone()),
            Value::Timestamp(ts) => Json::String(ts.to_iso()),
            Value::List(items) => Json::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| v.to_plain(&format!("{}[{}]", path, i), warnings))
                    .collect(),
            ),
            Value::Map(entries) => {
                let mut map = serde_json::Map::new();
                for (key, value) in entries {
                    let key = match key {
                        Value::Str(s) => s.clone(),
                        other => plain_key(other),
                    };
                    let child = super::join_path(path, &key);
                    map.insert(key, value.to_plain(&child, warnings));
                }
                Json::Object(map)
            }
            Value::Record(record) => record.to_plain_at(path, warnings),
            Value::Raw(raw) => raw.clone(),
        }
    }
}

fn plain_key(key: &Value) -> String {
    match key {
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Timestamp(ts) => ts.to_iso(),
        Value::Raw(Json::String(s)) => s.clone(),
        Value::Raw(other) => other.to_string(),
        _ => String::new(),
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Timestamp> for Value {
    fn from(v: Timestamp) -> Self {
        Value::Timestamp(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
