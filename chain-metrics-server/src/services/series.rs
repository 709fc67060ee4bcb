use crate::{error::ApiError, server::AppState};
use actix_web::web::{Data, Json, Query};
use chain_metrics_logic::{
    envelope, DateRange, LookbackPreset, NormalizationSummary, NormalizedPoint, SeriesCoverage,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub struct NormalizeQuery {
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub preset: Option<LookbackPreset>,
}

impl NormalizeQuery {
    /// Explicit bounds win over a preset; a half-open pair is an error.
    fn requested_range(&self) -> Result<Option<DateRange>, ApiError> {
        match (self.from, self.to, self.preset) {
            (Some(from), Some(to), _) => Ok(Some(DateRange::new(from, to)?)),
            (None, None, Some(preset)) => Ok(Some(DateRange::from_preset(
                preset,
                Utc::now().date_naive(),
            ))),
            (None, None, None) => Ok(None),
            _ => Err(ApiError::InvalidArgument(
                "both `from` and `to` must be provided".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub points: Vec<NormalizedPoint>,
    pub summary: NormalizationSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<SeriesCoverage>,
}

pub async fn normalize(
    state: Data<AppState>,
    query: Query<NormalizeQuery>,
    payload: Json<Value>,
) -> Result<Json<NormalizeResponse>, ApiError> {
    let range = query.requested_range()?;
    let records = envelope::flatten(&payload)?;
    let normalized = state.normalizer.normalize_json(&records)?;
    tracing::debug!(
        total = normalized.summary.total,
        points = normalized.points.len(),
        "normalized series"
    );

    let coverage = range.map(|range| SeriesCoverage::of(&normalized.points, &range));
    Ok(Json(NormalizeResponse {
        points: normalized.points,
        summary: normalized.summary,
        coverage,
    }))
}
