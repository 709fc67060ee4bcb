pub mod dates;
pub mod envelope;
pub mod error;
pub mod normalizer;
pub mod range;
pub mod repository;
pub mod snapshot_log;
pub mod trend;
mod types;

pub use envelope::ListedChain;
pub use error::{EnvelopeError, NormalizeError, RangeError, SettingsError};
pub use normalizer::{
    ImplausibleTimestampPolicy, MissingValuePolicy, NormalizationSummary, Normalized, Normalizer,
    NormalizerSettings, SeriesOrder,
};
pub use range::{DateRange, LookbackPreset, SeriesCoverage};
pub use snapshot_log::InMemorySnapshotLog;
pub use trend::{SnapshotHistory, TableScan, TrendCalculator};
pub use types::{
    points::{NormalizedPoint, NormalizedSeries, RawRecord, RawTimestamp, RawValue},
    snapshots::{SnapshotRecord, TrendResult},
};
