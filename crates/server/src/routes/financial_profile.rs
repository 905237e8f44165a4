use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{delete, get},
};
use db::models::financial_profile::{
    CreateOperatingFee, FinancialProfile, OperatingFee, UpdateFinancialProfile,
};
use serde::Serialize;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Profile plus its operating fees, as the settings screen consumes it.
#[derive(Debug, Serialize, TS)]
pub struct ProfileWithFees {
    #[serde(flatten)]
    #[ts(flatten)]
    pub profile: FinancialProfile,
    pub operating_fees: Vec<OperatingFee>,
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<ProfileWithFees>>, ApiError> {
    let profile = FinancialProfile::find_or_create(&state.db.pool, company_id).await?;
    let operating_fees = profile.operating_fees(&state.db.pool).await?;
    Ok(ResponseJson(ApiResponse::success(ProfileWithFees {
        profile,
        operating_fees,
    })))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateFinancialProfile>,
) -> Result<ResponseJson<ApiResponse<FinancialProfile>>, ApiError> {
    let profile = FinancialProfile::update(&state.db.pool, company_id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(profile)))
}

pub async fn add_operating_fee(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateOperatingFee>,
) -> Result<ResponseJson<ApiResponse<OperatingFee>>, ApiError> {
    let profile = FinancialProfile::find_or_create(&state.db.pool, company_id).await?;
    let fee = OperatingFee::create(&state.db.pool, profile.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(fee)))
}

pub async fn delete_operating_fee(
    State(state): State<AppState>,
    Path(fee_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = OperatingFee::delete(&state.db.pool, fee_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/companies/{company_id}/financial-profile",
            get(get_profile).put(update_profile),
        )
        .route(
            "/companies/{company_id}/operating-fees",
            axum::routing::post(add_operating_fee),
        )
        .route("/operating-fees/{fee_id}", delete(delete_operating_fee))
}
