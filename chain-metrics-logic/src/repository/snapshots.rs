use crate::{trend::SnapshotHistory, types::snapshots::SnapshotRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entity::api_metrics::{ActiveModel, Column, Entity};
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

pub async fn record<C>(
    db: &C,
    series_name: &str,
    count: i64,
    at: DateTime<Utc>,
) -> Result<SnapshotRecord, DbErr>
where
    C: ConnectionTrait,
{
    let record = SnapshotRecord::new(series_name, count, at);
    let active = ActiveModel {
        id: NotSet,
        series_name: Set(record.series_name.clone()),
        timestamp: Set(record.timestamp),
        count: Set(record.count),
        recorded_at: Set(record.recorded_at.clone()),
    };
    Entity::insert(active).exec_without_returning(db).await?;
    tracing::debug!(series_name, count, timestamp = record.timestamp, "stored snapshot");
    Ok(record)
}

pub async fn latest<C>(db: &C, series_name: &str) -> Result<Option<SnapshotRecord>, DbErr>
where
    C: ConnectionTrait,
{
    let model = Entity::find()
        .filter(Column::SeriesName.eq(series_name))
        .order_by_desc(Column::Timestamp)
        .order_by_desc(Column::Id)
        .one(db)
        .await?;
    Ok(model.map(Into::into))
}

pub async fn most_recent_at_or_before<C>(
    db: &C,
    series_name: &str,
    timestamp: i64,
) -> Result<Option<SnapshotRecord>, DbErr>
where
    C: ConnectionTrait,
{
    let model = Entity::find()
        .filter(Column::SeriesName.eq(series_name))
        .filter(Column::Timestamp.lte(timestamp))
        .order_by_desc(Column::Timestamp)
        .order_by_desc(Column::Id)
        .one(db)
        .await?;
    Ok(model.map(Into::into))
}

/// Snapshots taken at or after `since`, oldest first.
pub async fn for_period<C>(
    db: &C,
    series_name: &str,
    since: i64,
) -> Result<Vec<SnapshotRecord>, DbErr>
where
    C: ConnectionTrait,
{
    let models = Entity::find()
        .filter(Column::SeriesName.eq(series_name))
        .filter(Column::Timestamp.gte(since))
        .order_by_asc(Column::Timestamp)
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    Ok(models.into_iter().map(Into::into).collect())
}

/// Snapshot history stored in the `api_metrics` table.
#[derive(Debug, Clone)]
pub struct DbSnapshotHistory<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DbSnapshotHistory<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<C> SnapshotHistory for DbSnapshotHistory<'_, C>
where
    C: ConnectionTrait + Send + Sync,
{
    type Error = DbErr;

    async fn latest(&self, series_name: &str) -> Result<Option<SnapshotRecord>, Self::Error> {
        latest(self.db, series_name).await
    }

    async fn most_recent_at_or_before(
        &self,
        series_name: &str,
        timestamp: i64,
    ) -> Result<Option<SnapshotRecord>, Self::Error> {
        most_recent_at_or_before(self.db, series_name, timestamp).await
    }
}
