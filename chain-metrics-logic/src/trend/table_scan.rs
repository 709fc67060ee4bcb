use super::SnapshotHistory;
use crate::{dates, envelope::ListedChain, types::snapshots::SnapshotRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::convert::Infallible;

/// A table row carrying an optional creation-date string.
pub trait CreationDated {
    fn creation_date(&self) -> Option<&str>;
}

impl CreationDated for ListedChain {
    fn creation_date(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

impl CreationDated for Option<String> {
    fn creation_date(&self) -> Option<&str> {
        self.as_deref()
    }
}

impl CreationDated for &str {
    fn creation_date(&self) -> Option<&str> {
        Some(*self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnparsedDate {
    pub row: usize,
    pub raw: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanCount {
    pub count: i64,
    /// Rows without any creation date.
    pub missing: usize,
    /// Rows whose creation date no parser accepted.
    pub unparsed: Vec<UnparsedDate>,
}

/// Derives counts of a series from a live table instead of a persisted log:
/// the count at a moment is the number of rows created at or before it.
#[derive(Debug, Clone)]
pub struct TableScan<R> {
    series_name: String,
    rows: Vec<R>,
    now: DateTime<Utc>,
}

impl<R: CreationDated> TableScan<R> {
    pub fn new(series_name: impl Into<String>, rows: Vec<R>) -> Self {
        Self {
            series_name: series_name.into(),
            rows,
            now: Utc::now(),
        }
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn count_before(&self, at: DateTime<Utc>) -> ScanCount {
        let mut scan = ScanCount::default();
        for (row, item) in self.rows.iter().enumerate() {
            let Some(raw) = item.creation_date() else {
                scan.missing += 1;
                continue;
            };
            match dates::parse_date(raw) {
                Some(parsed) if parsed.datetime <= at => scan.count += 1,
                Some(_) => {}
                None => scan.unparsed.push(UnparsedDate {
                    row,
                    raw: raw.to_string(),
                }),
            }
        }

        if !scan.unparsed.is_empty() {
            tracing::warn!(
                series_name = %self.series_name,
                unparsed = scan.unparsed.len(),
                examples = ?scan
                    .unparsed
                    .iter()
                    .take(3)
                    .map(|u| u.raw.as_str())
                    .collect::<Vec<_>>(),
                "creation dates could not be parsed, rows are not counted"
            );
        }
        scan
    }

    fn snapshot_at(&self, series_name: &str, at: DateTime<Utc>) -> Option<SnapshotRecord> {
        if series_name != self.series_name || self.rows.is_empty() {
            return None;
        }
        let scan = self.count_before(at);
        Some(SnapshotRecord::new(series_name, scan.count, at))
    }
}

#[async_trait]
impl<R: CreationDated + Send + Sync> SnapshotHistory for TableScan<R> {
    type Error = Infallible;

    async fn latest(&self, series_name: &str) -> Result<Option<SnapshotRecord>, Self::Error> {
        Ok(self.snapshot_at(series_name, self.now))
    }

    async fn most_recent_at_or_before(
        &self,
        series_name: &str,
        timestamp: i64,
    ) -> Result<Option<SnapshotRecord>, Self::Error> {
        Ok(DateTime::from_timestamp(timestamp, 0).and_then(|at| self.snapshot_at(series_name, at)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::TrendCalculator;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        dates::midnight(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn counts_rows_created_before_date() {
        let scan = TableScan::new("chains", vec!["23.09.2020", "2020-09-23", "N/A"]);
        let result = scan.count_before(date(2021, 1, 1));
        assert_eq!(result.count, 2);
        assert_eq!(
            result.unparsed,
            vec![UnparsedDate {
                row: 2,
                raw: "N/A".to_string()
            }]
        );
    }

    #[test]
    fn boundary_is_inclusive() {
        let scan = TableScan::new("chains", vec!["2020-09-23", "2020-09-24"]);
        assert_eq!(scan.count_before(date(2020, 9, 23)).count, 1);
        assert_eq!(scan.count_before(date(2020, 9, 22)).count, 0);
    }

    #[test]
    fn absent_dates_are_never_counted() {
        let scan = TableScan::new(
            "chains",
            vec![Some("01.01.2021".to_string()), None, Some("1609459200".to_string())],
        );
        let result = scan.count_before(date(2022, 1, 1));
        assert_eq!(result.count, 2);
        assert_eq!(result.missing, 1);
        assert!(result.unparsed.is_empty());
    }

    #[tokio::test]
    async fn serves_as_history_for_trends() {
        let rows = vec![
            "01.01.2024",
            "2024-02-01",
            "2024-05-20T10:00:00Z",
            "2024-06-01",
            "garbage",
        ];
        let now = date(2024, 6, 10);
        let scan = TableScan::new("chains", rows).with_now(now);

        assert_eq!(scan.latest("validators").await.unwrap(), None);
        assert_eq!(
            scan.latest("chains").await.unwrap().map(|s| s.count),
            Some(4)
        );

        let result = TrendCalculator::new(&scan)
            .change_at("chains", 30, now)
            .await
            .unwrap();
        assert_eq!(result.current, 4);
        assert_eq!(result.previous, 2);
        assert_eq!(result.absolute_change, 2);
        assert_eq!(result.percent_change, 100.0);
    }

    #[tokio::test]
    async fn empty_table_has_no_history() {
        let scan: TableScan<&str> = TableScan::new("chains", vec![]);
        assert_eq!(scan.latest("chains").await.unwrap(), None);
        let result = TrendCalculator::new(&scan)
            .change_at("chains", 30, Utc::now())
            .await
            .unwrap();
        assert_eq!(result.current, 0);
        assert_eq!(result.percent_change, 0.0);
    }
}
