use crate::{error::ApiError, server::AppState};
use actix_web::{
    web::{Data, Json, Path, Query},
    HttpResponse,
};
use chain_metrics_logic::{
    repository::snapshots::{self, DbSnapshotHistory},
    trend::lookback_cutoff,
    SnapshotRecord, TrendCalculator, TrendResult,
};
use chrono::Utc;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RecordSnapshotRequest {
    pub count: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct LookbackQuery {
    pub days: Option<u32>,
}

impl LookbackQuery {
    fn days_or(&self, default: u32) -> Result<u32, ApiError> {
        match self.days {
            Some(0) => Err(ApiError::InvalidArgument(
                "days must be positive".to_string(),
            )),
            Some(days) => Ok(days),
            None => Ok(default),
        }
    }
}

pub async fn record(
    state: Data<AppState>,
    series_name: Path<String>,
    request: Json<RecordSnapshotRequest>,
) -> Result<HttpResponse, ApiError> {
    if request.count < 0 {
        return Err(ApiError::InvalidArgument(
            "count must not be negative".to_string(),
        ));
    }
    let record = snapshots::record(&state.db, &series_name, request.count, Utc::now()).await?;
    tracing::info!(series_name = %record.series_name, count = record.count, "snapshot recorded");
    Ok(HttpResponse::Created().json(record))
}

pub async fn list(
    state: Data<AppState>,
    series_name: Path<String>,
    query: Query<LookbackQuery>,
) -> Result<Json<Vec<SnapshotRecord>>, ApiError> {
    let days = query.days_or(state.default_lookback_days)?;
    let since = lookback_cutoff(Utc::now(), days);
    let records = snapshots::for_period(&state.db, &series_name, since).await?;
    Ok(Json(records))
}

pub async fn trend(
    state: Data<AppState>,
    series_name: Path<String>,
    query: Query<LookbackQuery>,
) -> Result<Json<TrendResult>, ApiError> {
    let days = query.days_or(state.default_lookback_days)?;
    let result = TrendCalculator::new(DbSnapshotHistory::new(&state.db))
        .change(&series_name, days)
        .await?;
    Ok(Json(result))
}
