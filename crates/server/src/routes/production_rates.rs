use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{delete, get, post},
};
use db::models::production_rate::{
    CreateProductionRate, ProductionRate, RateTemplate, RateWithMaterials, UpdateProductionRate,
};
use serde::Deserialize;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct CreateRateTemplate {
    pub name: String,
}

pub async fn list_rates(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<RateWithMaterials>>>, ApiError> {
    let rates =
        ProductionRate::find_with_materials_by_company_id(&state.db.pool, company_id).await?;
    Ok(ResponseJson(ApiResponse::success(rates)))
}

pub async fn create_rate(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateProductionRate>,
) -> Result<ResponseJson<ApiResponse<RateWithMaterials>>, ApiError> {
    let rate = ProductionRate::create(&state.db.pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(rate)))
}

pub async fn get_rate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<ProductionRate>>, ApiError> {
    let rate = ProductionRate::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(rate)))
}

pub async fn update_rate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateProductionRate>,
) -> Result<ResponseJson<ApiResponse<ProductionRate>>, ApiError> {
    let rate = ProductionRate::update(&state.db.pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(rate)))
}

pub async fn delete_rate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = ProductionRate::delete(&state.db.pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn list_templates(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<RateTemplate>>>, ApiError> {
    let templates = RateTemplate::find_by_company_id(&state.db.pool, company_id).await?;
    Ok(ResponseJson(ApiResponse::success(templates)))
}

pub async fn create_template(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateRateTemplate>,
) -> Result<ResponseJson<ApiResponse<RateTemplate>>, ApiError> {
    let template = RateTemplate::create(&state.db.pool, company_id, &payload.name).await?;
    Ok(ResponseJson(ApiResponse::success(template)))
}

pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = RateTemplate::delete(&state.db.pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/companies/{company_id}/production-rates", get(list_rates))
        .route("/production-rates", post(create_rate))
        .route(
            "/production-rates/{id}",
            get(get_rate).put(update_rate).delete(delete_rate),
        )
        .route(
            "/companies/{company_id}/rate-templates",
            get(list_templates).post(create_template),
        )
        .route("/rate-templates/{id}", delete(delete_template))
}
