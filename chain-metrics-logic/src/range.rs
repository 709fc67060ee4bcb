use crate::{
    dates,
    error::RangeError,
    trend::SECONDS_PER_DAY,
    types::points::NormalizedPoint,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 2020-09-23 00:00:00 UTC, the first day the metrics API has data for.
pub const EARLIEST_TIMESTAMP: i64 = 1_600_819_200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookbackPreset {
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "14d")]
    TwoWeeks,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "365d")]
    Year,
}

impl LookbackPreset {
    pub const ALL: [LookbackPreset; 5] = [
        Self::Week,
        Self::TwoWeeks,
        Self::Month,
        Self::Quarter,
        Self::Year,
    ];

    pub fn days(self) -> u32 {
        match self {
            Self::Week => 7,
            Self::TwoWeeks => 14,
            Self::Month => 30,
            Self::Quarter => 90,
            Self::Year => 365,
        }
    }
}

/// Inclusive range of unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: i64,
    end: i64,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: i64,
    end: i64,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = RangeError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: i64, end: i64) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// The last `days` days up to today's midnight (UTC), never reaching
    /// before [`EARLIEST_TIMESTAMP`].
    pub fn last_days(days: u32, today: NaiveDate) -> Self {
        let end = dates::midnight(today).timestamp();
        let start = (end - i64::from(days) * SECONDS_PER_DAY)
            .max(EARLIEST_TIMESTAMP)
            .min(end);
        Self { start, end }
    }

    pub fn from_preset(preset: LookbackPreset, today: NaiveDate) -> Self {
        Self::last_days(preset.days(), today)
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        (self.start..=self.end).contains(&timestamp)
    }

    pub fn requested_day_count(&self) -> usize {
        ((self.end - self.start) / SECONDS_PER_DAY + 1) as usize
    }
}

/// How much of a requested range a fetched series actually covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesCoverage {
    pub requested_days: usize,
    pub received_points: usize,
    pub first_timestamp: Option<i64>,
    pub last_timestamp: Option<i64>,
    pub first_day: Option<String>,
    pub last_day: Option<String>,
    pub is_partial: bool,
}

impl SeriesCoverage {
    pub fn of(points: &[NormalizedPoint], range: &DateRange) -> Self {
        let requested_days = range.requested_day_count();
        let first_timestamp = points.iter().map(|point| point.timestamp).min();
        let last_timestamp = points.iter().map(|point| point.timestamp).max();
        let coverage = Self {
            requested_days,
            received_points: points.len(),
            first_timestamp,
            last_timestamp,
            first_day: first_timestamp.map(dates::format_day),
            last_day: last_timestamp.map(dates::format_day),
            is_partial: points.len() < requested_days,
        };
        if coverage.is_partial {
            tracing::info!(
                requested_days,
                received_points = coverage.received_points,
                "series covers only part of the requested range"
            );
        }
        coverage
    }
}
