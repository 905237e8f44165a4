use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::{
    models::{
        invoice::{CreateInvoice, Invoice, UpdateInvoice},
        receipt::Receipt,
    },
    query::ListParams,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn list_invoices(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> Result<ResponseJson<ApiResponse<Vec<Invoice>>>, ApiError> {
    let invoices = Invoice::find_by_company_id(&state.db.pool, company_id, &params).await?;
    Ok(ResponseJson(ApiResponse::success(invoices)))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateInvoice>,
) -> Result<ResponseJson<ApiResponse<Invoice>>, ApiError> {
    let invoice = Invoice::create(&state.db.pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(invoice)))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Invoice>>, ApiError> {
    let invoice = Invoice::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(invoice)))
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateInvoice>,
) -> Result<ResponseJson<ApiResponse<Invoice>>, ApiError> {
    let invoice = Invoice::update(&state.db.pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(invoice)))
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Invoice::delete(&state.db.pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn list_invoice_receipts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Receipt>>>, ApiError> {
    let receipts = Receipt::find_by_invoice_id(&state.db.pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(receipts)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/companies/{company_id}/invoices", get(list_invoices))
        .route("/invoices", post(create_invoice))
        .route(
            "/invoices/{id}",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
        .route("/invoices/{id}/receipts", get(list_invoice_receipts))
}
