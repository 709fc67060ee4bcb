use crate::{
    dates::{self, MILLISECONDS_THRESHOLD},
    types::points::RawTimestamp,
};
use chrono::{DateTime, Datelike};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Already unix seconds.
    Seconds(i64),
    /// Milliseconds or a date string turned into unix seconds.
    Converted(i64),
    Unresolved,
}

impl Resolution {
    pub fn seconds(&self) -> Option<i64> {
        match self {
            Resolution::Seconds(ts) | Resolution::Converted(ts) => Some(*ts),
            Resolution::Unresolved => None,
        }
    }
}

pub fn resolve(raw: Option<&RawTimestamp>) -> Resolution {
    match raw {
        Some(RawTimestamp::Integer(value)) => {
            if *value > MILLISECONDS_THRESHOLD {
                Resolution::Converted(value.div_euclid(1000))
            } else {
                Resolution::Seconds(*value)
            }
        }
        Some(RawTimestamp::Float(value)) if value.is_finite() => {
            let seconds = dates::seconds_from_number(*value);
            if *value > MILLISECONDS_THRESHOLD as f64 || value.fract() != 0.0 {
                Resolution::Converted(seconds)
            } else {
                Resolution::Seconds(seconds)
            }
        }
        Some(RawTimestamp::Text(text)) => match dates::parse_date(text) {
            Some(parsed) => Resolution::Converted(parsed.timestamp()),
            None => Resolution::Unresolved,
        },
        Some(RawTimestamp::Float(_)) | Some(RawTimestamp::Other(_)) | None => {
            Resolution::Unresolved
        }
    }
}

pub fn year_of(timestamp: i64) -> Option<i32> {
    DateTime::from_timestamp(timestamp, 0).map(|datetime| datetime.year())
}

pub fn is_plausible(timestamp: i64, min_year: i32, max_year: i32) -> bool {
    year_of(timestamp)
        .map(|year| (min_year..=max_year).contains(&year))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(RawTimestamp::Integer(1_700_000_000), Resolution::Seconds(1_700_000_000))]
    #[case(RawTimestamp::Integer(10_000_000_000), Resolution::Seconds(10_000_000_000))]
    #[case(RawTimestamp::Integer(10_000_000_001), Resolution::Converted(10_000_000))]
    #[case(RawTimestamp::Integer(1_700_000_000_999), Resolution::Converted(1_700_000_000))]
    #[case(RawTimestamp::Float(1_700_000_000.0), Resolution::Seconds(1_700_000_000))]
    #[case(RawTimestamp::Float(1_700_000_000.5), Resolution::Converted(1_700_000_000))]
    #[case(RawTimestamp::Float(1.7e12), Resolution::Converted(1_700_000_000))]
    #[case(RawTimestamp::Text("2023-11-14".into()), Resolution::Converted(1_699_920_000))]
    #[case(RawTimestamp::Text("1700000000".into()), Resolution::Converted(1_700_000_000))]
    #[case(RawTimestamp::Text("soon".into()), Resolution::Unresolved)]
    #[case(RawTimestamp::Other(json!(true)), Resolution::Unresolved)]
    #[case(RawTimestamp::Float(f64::NAN), Resolution::Unresolved)]
    fn resolves_timestamps(#[case] raw: RawTimestamp, #[case] expected: Resolution) {
        assert_eq!(resolve(Some(&raw)), expected);
    }

    #[test]
    fn missing_timestamp_is_unresolved() {
        assert_eq!(resolve(None), Resolution::Unresolved);
    }

    #[rstest]
    #[case(1_262_304_000, true)] // 2010-01-01
    #[case(1_262_303_999, false)] // 2009-12-31 23:59:59
    #[case(2_556_143_999, true)] // 2050-12-31 23:59:59
    #[case(2_556_144_000, false)] // 2051-01-01
    #[case(0, false)]
    #[case(-86_400, false)]
    #[case(i64::MAX, false)]
    fn plausibility_bounds(#[case] timestamp: i64, #[case] plausible: bool) {
        assert_eq!(is_plausible(timestamp, 2010, 2050), plausible);
    }
}
