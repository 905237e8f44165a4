use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::{
    models::receipt::{CreateReceipt, Receipt},
    query::ListParams,
};
use services::services::receipts::ReceiptService;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn list_receipts(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> Result<ResponseJson<ApiResponse<Vec<Receipt>>>, ApiError> {
    let receipts = Receipt::find_by_company_id(&state.db.pool, company_id, &params).await?;
    Ok(ResponseJson(ApiResponse::success(receipts)))
}

pub async fn create_receipt(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateReceipt>,
) -> Result<ResponseJson<ApiResponse<Receipt>>, ApiError> {
    let receipt = ReceiptService::record(&state.db.pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(receipt)))
}

pub async fn get_receipt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Receipt>>, ApiError> {
    let receipt = Receipt::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(receipt)))
}

pub async fn delete_receipt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Receipt::delete(&state.db.pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/companies/{company_id}/receipts", get(list_receipts))
        .route("/receipts", post(create_receipt))
        .route("/receipts/{id}", get(get_receipt).delete(delete_receipt))
}
