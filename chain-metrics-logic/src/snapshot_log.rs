use crate::{
    normalizer::SeriesOrder,
    trend::{lookback_cutoff, SnapshotHistory},
    types::snapshots::SnapshotRecord,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::convert::Infallible;

/// Append-only snapshot log kept in memory.
///
/// Records are only ever pushed; readers take a shared lock and therefore
/// never see a record that is still being written.
#[derive(Debug, Default)]
pub struct InMemorySnapshotLog {
    records: RwLock<Vec<SnapshotRecord>>,
}

impl InMemorySnapshotLog {
    pub fn from_records(records: impl IntoIterator<Item = SnapshotRecord>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().collect()),
        }
    }

    pub fn record(&self, series_name: &str, count: i64) -> SnapshotRecord {
        self.record_at(series_name, count, Utc::now())
    }

    pub fn record_at(&self, series_name: &str, count: i64, at: DateTime<Utc>) -> SnapshotRecord {
        let record = SnapshotRecord::new(series_name, count, at);
        self.records.write().push(record.clone());
        tracing::debug!(
            series_name,
            count,
            recorded_at = %record.recorded_at,
            "recorded snapshot"
        );
        record
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// All snapshots of one series, ordered by time.
    pub fn records(&self, series_name: &str, order: SeriesOrder) -> Vec<SnapshotRecord> {
        let mut records: Vec<_> = self
            .records
            .read()
            .iter()
            .filter(|record| record.series_name == series_name)
            .cloned()
            .collect();
        match order {
            SeriesOrder::Ascending => records.sort_by_key(|record| record.timestamp),
            SeriesOrder::Descending => {
                records.sort_by_key(|record| std::cmp::Reverse(record.timestamp))
            }
            SeriesOrder::Preserve => {}
        }
        records
    }

    /// Snapshots of the last `days` days, oldest first.
    pub fn for_period(&self, series_name: &str, days: u32, now: DateTime<Utc>) -> Vec<SnapshotRecord> {
        let since = lookback_cutoff(now, days);
        self.records(series_name, SeriesOrder::Ascending)
            .into_iter()
            .filter(|record| record.timestamp >= since)
            .collect()
    }

    fn find_latest(
        &self,
        series_name: &str,
        filter: impl Fn(&SnapshotRecord) -> bool,
    ) -> Option<SnapshotRecord> {
        let records = self.records.read();
        // later appends win among equal timestamps
        records
            .iter()
            .filter(|record| record.series_name == series_name && filter(record))
            .fold(None, |best: Option<&SnapshotRecord>, record| match best {
                Some(best) if best.timestamp > record.timestamp => Some(best),
                _ => Some(record),
            })
            .cloned()
    }
}

#[async_trait]
impl SnapshotHistory for InMemorySnapshotLog {
    type Error = Infallible;

    async fn latest(&self, series_name: &str) -> Result<Option<SnapshotRecord>, Self::Error> {
        Ok(self.find_latest(series_name, |_| true))
    }

    async fn most_recent_at_or_before(
        &self,
        series_name: &str,
        timestamp: i64,
    ) -> Result<Option<SnapshotRecord>, Self::Error> {
        Ok(self.find_latest(series_name, |record| record.timestamp <= timestamp))
    }
}
