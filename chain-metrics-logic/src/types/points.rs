use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Time indicator of an upstream record, in whatever shape it arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Other(Value),
}

impl RawValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Number(value) => Some(*value),
            RawValue::Text(text) => text.trim().parse().ok().filter(|v: &f64| v.is_finite()),
            RawValue::Other(_) => None,
        }
    }
}

/// Untrusted `{timestamp, value}` record as returned by the metrics API.
/// Fields other than `timestamp` and `value` are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub timestamp: Option<RawTimestamp>,
    pub value: Option<RawValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawRecord {
    pub fn new(timestamp: Option<RawTimestamp>, value: Option<f64>) -> Self {
        Self {
            timestamp,
            value: value.map(RawValue::Number),
            extra: Map::new(),
        }
    }

    /// Anything that is not an object carrying the expected fields becomes an
    /// empty record.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value.clone()).unwrap_or_else(|err| {
                tracing::debug!(err = %err, "record does not match expected shape");
                Self::default()
            }),
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub timestamp: i64,
    pub value: f64,
}

impl NormalizedPoint {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

impl From<NormalizedPoint> for RawRecord {
    fn from(point: NormalizedPoint) -> Self {
        RawRecord::new(
            Some(RawTimestamp::Integer(point.timestamp)),
            Some(point.value),
        )
    }
}

pub type NormalizedSeries = Vec<NormalizedPoint>;
