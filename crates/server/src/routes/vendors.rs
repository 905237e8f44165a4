use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::vendor::{CreateVendor, UpdateVendor, Vendor};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn list_vendors(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Vendor>>>, ApiError> {
    let vendors = Vendor::find_by_company_id(&state.db.pool, company_id).await?;
    Ok(ResponseJson(ApiResponse::success(vendors)))
}

pub async fn create_vendor(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateVendor>,
) -> Result<ResponseJson<ApiResponse<Vendor>>, ApiError> {
    let vendor = Vendor::create(&state.db.pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(vendor)))
}

pub async fn get_vendor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vendor>>, ApiError> {
    let vendor = Vendor::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(vendor)))
}

pub async fn update_vendor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateVendor>,
) -> Result<ResponseJson<ApiResponse<Vendor>>, ApiError> {
    let vendor = Vendor::update(&state.db.pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(vendor)))
}

pub async fn delete_vendor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Vendor::delete(&state.db.pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/companies/{company_id}/vendors", get(list_vendors))
        .route("/vendors", post(create_vendor))
        .route(
            "/vendors/{id}",
            get(get_vendor).put(update_vendor).delete(delete_vendor),
        )
}
