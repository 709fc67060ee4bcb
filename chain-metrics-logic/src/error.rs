use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("invalid input: {0}")]
    Input(String),
    #[error("record {index} has implausible timestamp {timestamp:?}")]
    ImplausibleTimestamp {
        index: usize,
        timestamp: Option<i64>,
    },
    #[error("record {index} has no value")]
    MissingValue { index: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("payload contains no array of records")]
    NoRecords,
    #[error("invalid chain listing: {0}")]
    InvalidChain(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("range start {start} is after its end {end}")]
    Inverted { start: i64, end: i64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid plausible years: min_year {min_year} is greater than max_year {max_year}")]
    InvertedYears { min_year: i32, max_year: i32 },
}
