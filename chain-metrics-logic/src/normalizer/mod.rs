//! Turns untrusted `{timestamp, value}` records into a validated series of
//! unix-seconds points.
//!
//! Individual bad records never abort a batch unless a `Reject` policy is
//! configured: their timestamps are substituted or the records are dropped,
//! and every such decision is counted in the returned [`NormalizationSummary`].

mod settings;
pub mod timestamp;

pub use settings::{
    ImplausibleTimestampPolicy, MissingValuePolicy, NormalizerSettings, SeriesOrder,
    DEFAULT_MAX_YEAR, DEFAULT_MIN_YEAR,
};

use crate::{
    error::NormalizeError,
    types::points::{NormalizedPoint, NormalizedSeries, RawRecord},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use timestamp::Resolution;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationSummary {
    pub total: usize,
    pub converted: usize,
    pub substituted: usize,
    pub dropped: usize,
    pub defaulted_values: usize,
}

impl NormalizationSummary {
    /// Every record of a non-empty batch had to be repaired or removed.
    pub fn is_degraded(&self) -> bool {
        self.total > 0 && self.substituted + self.dropped == self.total
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalized {
    pub points: NormalizedSeries,
    pub summary: NormalizationSummary,
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    settings: NormalizerSettings,
}

impl Normalizer {
    pub fn new(settings: NormalizerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &NormalizerSettings {
        &self.settings
    }

    pub fn normalize(&self, records: &[RawRecord]) -> Result<Normalized, NormalizeError> {
        self.normalize_at(records, Utc::now())
    }

    /// Same as [`Normalizer::normalize_json_at`] with the wall clock.
    pub fn normalize_json(&self, records: &Value) -> Result<Normalized, NormalizeError> {
        self.normalize_json_at(records, Utc::now())
    }

    /// Accepts an already flattened JSON array of records. Anything else is a
    /// contract violation of the caller.
    pub fn normalize_json_at(
        &self,
        records: &Value,
        now: DateTime<Utc>,
    ) -> Result<Normalized, NormalizeError> {
        let Value::Array(items) = records else {
            return Err(NormalizeError::Input(format!(
                "expected an array of records, got {}",
                json_kind(records)
            )));
        };
        let records: Vec<RawRecord> = items.iter().map(RawRecord::from_json).collect();
        self.normalize_at(&records, now)
    }

    pub fn normalize_at(
        &self,
        records: &[RawRecord],
        now: DateTime<Utc>,
    ) -> Result<Normalized, NormalizeError> {
        let now_ts = now.timestamp();
        let mut summary = NormalizationSummary {
            total: records.len(),
            ..Default::default()
        };
        let mut points = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let resolution = timestamp::resolve(record.timestamp.as_ref());
            let plausible = resolution.seconds().filter(|ts| {
                timestamp::is_plausible(*ts, self.settings.min_year, self.settings.max_year)
            });

            // settle both fields before counting, so a record lands in one bucket only
            let timestamp = match (plausible, self.settings.on_implausible_timestamp) {
                (Some(ts), _) => ts,
                (None, ImplausibleTimestampPolicy::SubstituteNow) => now_ts,
                (None, ImplausibleTimestampPolicy::Drop) => {
                    tracing::debug!(
                        index,
                        resolved = ?resolution.seconds(),
                        "dropping record with implausible timestamp"
                    );
                    summary.dropped += 1;
                    continue;
                }
                (None, ImplausibleTimestampPolicy::Reject) => {
                    return Err(NormalizeError::ImplausibleTimestamp {
                        index,
                        timestamp: resolution.seconds(),
                    })
                }
            };

            let resolved_value = record.value.as_ref().and_then(|value| value.as_f64());
            let value = match (resolved_value, self.settings.on_missing_value) {
                (Some(value), _) => value,
                (None, MissingValuePolicy::Zero) => 0.0,
                (None, MissingValuePolicy::Drop) => {
                    tracing::debug!(index, "dropping record without value");
                    summary.dropped += 1;
                    continue;
                }
                (None, MissingValuePolicy::Reject) => {
                    return Err(NormalizeError::MissingValue { index })
                }
            };

            if plausible.is_none() {
                tracing::debug!(
                    index,
                    resolved = ?resolution.seconds(),
                    "substituting implausible timestamp with current time"
                );
                summary.substituted += 1;
            } else if matches!(resolution, Resolution::Converted(_)) {
                summary.converted += 1;
            }
            if resolved_value.is_none() {
                summary.defaulted_values += 1;
            }
            points.push(NormalizedPoint::new(timestamp, value));
        }

        match self.settings.order {
            SeriesOrder::Ascending => points.sort_by_key(|point| point.timestamp),
            SeriesOrder::Descending => {
                points.sort_by_key(|point| std::cmp::Reverse(point.timestamp))
            }
            SeriesOrder::Preserve => {}
        }

        if summary.is_degraded() {
            tracing::warn!(
                total = summary.total,
                substituted = summary.substituted,
                dropped = summary.dropped,
                "every record of the batch was substituted or dropped"
            );
        }

        Ok(Normalized { points, summary })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
