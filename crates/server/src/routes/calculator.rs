use axum::{
    Router,
    extract::State,
    response::Json as ResponseJson,
    routing::post,
};
use db::models::production_rate::ProductionRate;
use serde::Deserialize;
use services::services::{
    labor::{self, LaborTotals, RateBook, TaskSelection},
    pricing::{self, Discount, PricingBreakdown, PricingConstants},
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct LaborRequest {
    pub company_id: Uuid,
    pub selections: Vec<TaskSelection>,
    #[serde(default)]
    pub include_materials: bool,
}

#[derive(Debug, Deserialize)]
pub struct PricingRequest {
    pub company_id: Uuid,
    pub line_costs: Vec<f64>,
    pub discount: Option<Discount>,
}

/// Cost out a selection of tasks against the company's rate book.
pub async fn calculate_labor(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<LaborRequest>,
) -> Result<ResponseJson<ApiResponse<LaborTotals>>, ApiError> {
    let rates =
        ProductionRate::find_with_materials_by_company_id(&state.db.pool, payload.company_id)
            .await?;
    let book = RateBook::new(rates);
    let totals = labor::aggregate(&book, &payload.selections, payload.include_materials)?;
    Ok(ResponseJson(ApiResponse::success(totals)))
}

/// Price a list of line costs under the company's financial profile.
pub async fn calculate_pricing(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<PricingRequest>,
) -> Result<ResponseJson<ApiResponse<PricingBreakdown>>, ApiError> {
    let constants = PricingConstants::load(&state.db.pool, payload.company_id).await?;
    let discount = payload.discount.unwrap_or(Discount::None);
    let breakdown = pricing::price_lines(&payload.line_costs, discount, &constants);
    Ok(ResponseJson(ApiResponse::success(breakdown)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calculator/labor", post(calculate_labor))
        .route("/calculator/pricing", post(calculate_pricing))
}
