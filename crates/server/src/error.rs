use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::{
    dashboard::DashboardError, estimates::EstimateError, labor::LaborError,
    receipts::ReceiptError, storage::StorageError,
};
use thiserror::Error;
use tracing::error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Estimate(#[from] EstimateError),
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
    #[error(transparent)]
    Labor(#[from] LaborError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Dashboard(#[from] DashboardError),
    #[error("{0}")]
    BadRequest(String),
    #[error("not found")]
    NotFound,
}

fn sqlx_status(e: &sqlx::Error) -> StatusCode {
    match e {
        sqlx::Error::RowNotFound => StatusCode::NOT_FOUND,
        sqlx::Error::Database(db) if db.is_unique_violation() || db.is_foreign_key_violation() => {
            StatusCode::CONFLICT
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Database(e) => sqlx_status(e),
            ApiError::Estimate(EstimateError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Estimate(EstimateError::Database(e)) => sqlx_status(e),
            ApiError::Receipt(ReceiptError::InvoiceNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Receipt(ReceiptError::CompanyMismatch) => StatusCode::CONFLICT,
            ApiError::Receipt(ReceiptError::NonPositiveAmount) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Receipt(ReceiptError::Database(e)) => sqlx_status(e),
            ApiError::Labor(LaborError::UnknownRateCode(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Storage(StorageError::InvalidExtension(_)) => StatusCode::BAD_REQUEST,
            ApiError::Storage(StorageError::InvalidToken) => StatusCode::FORBIDDEN,
            ApiError::Storage(StorageError::TokenExpired) => StatusCode::GONE,
            ApiError::Storage(StorageError::Database(e)) => sqlx_status(e),
            ApiError::Storage(StorageError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Dashboard(DashboardError::Database(e)) => sqlx_status(e),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Internal error handling request");
        }
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}
