use crate::dates;
use chrono::{DateTime, Utc};
use entity::api_metrics;
use serde::{Deserialize, Serialize};

/// One append-only observation of a named count series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    pub series_name: String,
    pub timestamp: i64,
    pub count: i64,
    pub recorded_at: String,
}

impl SnapshotRecord {
    pub fn new(series_name: impl Into<String>, count: i64, at: DateTime<Utc>) -> Self {
        Self {
            series_name: series_name.into(),
            timestamp: at.timestamp(),
            count,
            recorded_at: dates::format_recorded_at(at),
        }
    }
}

impl From<api_metrics::Model> for SnapshotRecord {
    fn from(model: api_metrics::Model) -> Self {
        Self {
            series_name: model.series_name,
            timestamp: model.timestamp,
            count: model.count,
            recorded_at: model.recorded_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResult {
    pub current: i64,
    pub previous: i64,
    pub absolute_change: i64,
    pub percent_change: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_recorded_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_recorded_at: Option<String>,
}

impl TrendResult {
    /// Compares the latest snapshot against the one found at the start of the
    /// lookback window. Missing history yields a zero change; a zero baseline
    /// yields a zero percentage.
    pub fn between(latest: Option<&SnapshotRecord>, previous: Option<&SnapshotRecord>) -> Self {
        let Some(latest) = latest else {
            return Self::default();
        };

        match previous {
            Some(previous) if previous != latest => {
                let absolute_change = latest.count - previous.count;
                Self {
                    current: latest.count,
                    previous: previous.count,
                    absolute_change,
                    percent_change: percent_change(absolute_change, previous.count),
                    current_recorded_at: Some(latest.recorded_at.clone()),
                    previous_recorded_at: Some(previous.recorded_at.clone()),
                }
            }
            _ => Self {
                current: latest.count,
                previous: latest.count,
                absolute_change: 0,
                percent_change: 0.0,
                current_recorded_at: Some(latest.recorded_at.clone()),
                previous_recorded_at: previous.map(|previous| previous.recorded_at.clone()),
            },
        }
    }
}

fn percent_change(change: i64, baseline: i64) -> f64 {
    if baseline == 0 {
        return 0.0;
    }
    let percent = change as f64 / baseline as f64 * 100.0;
    (percent * 100.0).round() / 100.0
}
