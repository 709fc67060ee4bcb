mod table_scan;

pub use table_scan::{CreationDated, ScanCount, TableScan, UnparsedDate};

use crate::types::snapshots::{SnapshotRecord, TrendResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Read side of a snapshot log.
///
/// Implemented by the in-memory append-only log, the table scan and the
/// database repository, so one trend computation serves every storage.
#[async_trait]
pub trait SnapshotHistory: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn latest(&self, series_name: &str) -> Result<Option<SnapshotRecord>, Self::Error>;

    async fn most_recent_at_or_before(
        &self,
        series_name: &str,
        timestamp: i64,
    ) -> Result<Option<SnapshotRecord>, Self::Error>;
}

#[async_trait]
impl<H: SnapshotHistory + ?Sized> SnapshotHistory for &H {
    type Error = H::Error;

    async fn latest(&self, series_name: &str) -> Result<Option<SnapshotRecord>, Self::Error> {
        (**self).latest(series_name).await
    }

    async fn most_recent_at_or_before(
        &self,
        series_name: &str,
        timestamp: i64,
    ) -> Result<Option<SnapshotRecord>, Self::Error> {
        (**self).most_recent_at_or_before(series_name, timestamp).await
    }
}

#[async_trait]
impl<H: SnapshotHistory + ?Sized> SnapshotHistory for Arc<H> {
    type Error = H::Error;

    async fn latest(&self, series_name: &str) -> Result<Option<SnapshotRecord>, Self::Error> {
        (**self).latest(series_name).await
    }

    async fn most_recent_at_or_before(
        &self,
        series_name: &str,
        timestamp: i64,
    ) -> Result<Option<SnapshotRecord>, Self::Error> {
        (**self).most_recent_at_or_before(series_name, timestamp).await
    }
}

/// Start of a lookback window of `days` ending at `now`.
pub fn lookback_cutoff(now: DateTime<Utc>, days: u32) -> i64 {
    now.timestamp() - i64::from(days) * SECONDS_PER_DAY
}

#[derive(Debug, Clone)]
pub struct TrendCalculator<H> {
    history: H,
}

impl<H: SnapshotHistory> TrendCalculator<H> {
    pub fn new(history: H) -> Self {
        Self { history }
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub async fn latest(&self, series_name: &str) -> Result<Option<SnapshotRecord>, H::Error> {
        self.history.latest(series_name).await
    }

    pub async fn as_of(
        &self,
        series_name: &str,
        days_ago: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<SnapshotRecord>, H::Error> {
        self.history
            .most_recent_at_or_before(series_name, lookback_cutoff(now, days_ago))
            .await
    }

    pub async fn change(&self, series_name: &str, days_ago: u32) -> Result<TrendResult, H::Error> {
        self.change_at(series_name, days_ago, Utc::now()).await
    }

    pub async fn change_at(
        &self,
        series_name: &str,
        days_ago: u32,
        now: DateTime<Utc>,
    ) -> Result<TrendResult, H::Error> {
        let Some(latest) = self.latest(series_name).await? else {
            tracing::debug!(series_name, "no snapshots recorded");
            return Ok(TrendResult::default());
        };
        let previous = self.as_of(series_name, days_ago, now).await?;
        if previous.is_none() {
            tracing::debug!(
                series_name,
                days_ago,
                "history does not reach back to the start of the window"
            );
        }
        Ok(TrendResult::between(Some(&latest), previous.as_ref()))
    }
}
