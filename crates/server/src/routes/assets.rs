use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::asset::{Asset, CreateAsset, UpdateAsset};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn list_assets(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Asset>>>, ApiError> {
    let assets = Asset::find_by_company_id(&state.db.pool, company_id).await?;
    Ok(ResponseJson(ApiResponse::success(assets)))
}

pub async fn create_asset(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateAsset>,
) -> Result<ResponseJson<ApiResponse<Asset>>, ApiError> {
    let asset = Asset::create(&state.db.pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(asset)))
}

pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Asset>>, ApiError> {
    let asset = Asset::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(asset)))
}

pub async fn update_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateAsset>,
) -> Result<ResponseJson<ApiResponse<Asset>>, ApiError> {
    let asset = Asset::update(&state.db.pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(asset)))
}

pub async fn delete_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Asset::delete(&state.db.pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/companies/{company_id}/assets", get(list_assets))
        .route("/assets", post(create_asset))
        .route(
            "/assets/{id}",
            get(get_asset).put(update_asset).delete(delete_asset),
        )
}
