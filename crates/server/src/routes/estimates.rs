use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{delete, get, post},
};
use db::models::estimate::{
    CreateEstimate, CreateEstimateLine, Estimate, EstimateLine, UpdateEstimate,
};
use serde::Serialize;
use services::services::estimates::EstimateService;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// An estimate bundled with its lines, as the detail view consumes it.
#[derive(Debug, Serialize, TS)]
pub struct EstimateDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub estimate: Estimate,
    pub lines: Vec<EstimateLine>,
}

pub async fn create_estimate(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateEstimate>,
) -> Result<ResponseJson<ApiResponse<Estimate>>, ApiError> {
    let estimate = Estimate::create(&state.db.pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(estimate)))
}

pub async fn get_estimate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<EstimateDetail>>, ApiError> {
    let estimate = Estimate::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let lines = EstimateLine::find_by_estimate_id(&state.db.pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(EstimateDetail {
        estimate,
        lines,
    })))
}

/// Update status or discount configuration. Discount changes affect totals,
/// so the estimate is recomputed before returning.
pub async fn update_estimate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateEstimate>,
) -> Result<ResponseJson<ApiResponse<Estimate>>, ApiError> {
    Estimate::update(&state.db.pool, id, &payload).await?;
    let estimate = EstimateService::recompute(&state.db.pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(estimate)))
}

pub async fn delete_estimate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Estimate::delete(&state.db.pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn list_lines(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<EstimateLine>>>, ApiError> {
    let lines = EstimateLine::find_by_estimate_id(&state.db.pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(lines)))
}

/// Add a line and return the estimate with refreshed totals.
pub async fn add_line(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateEstimateLine>,
) -> Result<ResponseJson<ApiResponse<Estimate>>, ApiError> {
    EstimateLine::create(&state.db.pool, id, &payload).await?;
    let estimate = EstimateService::recompute(&state.db.pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(estimate)))
}

/// Remove a line and return the estimate with refreshed totals.
pub async fn remove_line(
    State(state): State<AppState>,
    Path((id, line_id)): Path<(Uuid, Uuid)>,
) -> Result<ResponseJson<ApiResponse<Estimate>>, ApiError> {
    let deleted = EstimateLine::delete(&state.db.pool, line_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    let estimate = EstimateService::recompute(&state.db.pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(estimate)))
}

pub async fn recompute_estimate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Estimate>>, ApiError> {
    let estimate = EstimateService::recompute(&state.db.pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(estimate)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/estimates", post(create_estimate))
        .route(
            "/estimates/{id}",
            get(get_estimate)
                .put(update_estimate)
                .delete(delete_estimate),
        )
        .route("/estimates/{id}/lines", get(list_lines).post(add_line))
        .route("/estimates/{id}/lines/{line_id}", delete(remove_line))
        .route("/estimates/{id}/recompute", post(recompute_estimate))
}
