use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use services::services::dashboard::{DashboardMetrics, DashboardService};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    pub year: Option<i32>,
}

pub async fn get_metrics(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Query(query): Query<MetricsQuery>,
) -> Result<ResponseJson<ApiResponse<DashboardMetrics>>, ApiError> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let metrics = DashboardService::metrics_for_year(&state.db.pool, company_id, year).await?;
    Ok(ResponseJson(ApiResponse::success(metrics)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/companies/{company_id}/dashboard", get(get_metrics))
}
