use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::company::{Company, CreateCompany};
use serde::Deserialize;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct RenameCompany {
    pub name: String,
}

pub async fn create_company(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateCompany>,
) -> Result<ResponseJson<ApiResponse<Company>>, ApiError> {
    let company = Company::create(&state.db.pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(company)))
}

pub async fn list_companies(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Company>>>, ApiError> {
    let companies = Company::find_all(&state.db.pool).await?;
    Ok(ResponseJson(ApiResponse::success(companies)))
}

pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Company>>, ApiError> {
    let company = Company::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(company)))
}

pub async fn rename_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<RenameCompany>,
) -> Result<ResponseJson<ApiResponse<Company>>, ApiError> {
    let company = Company::rename(&state.db.pool, id, &payload.name).await?;
    Ok(ResponseJson(ApiResponse::success(company)))
}

pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Company::delete(&state.db.pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/companies", get(list_companies).post(create_company))
        .route(
            "/companies/{company_id}",
            get(get_company).put(rename_company).delete(delete_company),
        )
}
