use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{delete, get, post},
};
use db::models::account::{Account, CreateAccount, CreateLedgerEntry, LedgerEntry};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn list_accounts(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Account>>>, ApiError> {
    let accounts = Account::find_by_company_id(&state.db.pool, company_id).await?;
    Ok(ResponseJson(ApiResponse::success(accounts)))
}

pub async fn create_account(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateAccount>,
) -> Result<ResponseJson<ApiResponse<Account>>, ApiError> {
    let account = Account::create(&state.db.pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(account)))
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Account>>, ApiError> {
    let account = Account::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(account)))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Account::delete(&state.db.pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<LedgerEntry>>>, ApiError> {
    let entries = LedgerEntry::find_by_account_id(&state.db.pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(entries)))
}

/// Post an entry to an account. The account's stored balance is refreshed
/// as part of the insert.
pub async fn create_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateLedgerEntry>,
) -> Result<ResponseJson<ApiResponse<LedgerEntry>>, ApiError> {
    let account = Account::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let entry = LedgerEntry::create(&state.db.pool, account.company_id, account.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(entry)))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = LedgerEntry::delete(&state.db.pool, entry_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/companies/{company_id}/accounts", get(list_accounts))
        .route("/accounts", post(create_account))
        .route("/accounts/{id}", get(get_account).delete(delete_account))
        .route("/accounts/{id}/entries", get(list_entries).post(create_entry))
        .route("/ledger-entries/{entry_id}", delete(delete_entry))
}
