use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::property::{CreateProperty, Property, UpdateProperty};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn create_property(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateProperty>,
) -> Result<ResponseJson<ApiResponse<Property>>, ApiError> {
    let property = Property::create(&state.db.pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(property)))
}

pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Property>>, ApiError> {
    let property = Property::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(property)))
}

pub async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateProperty>,
) -> Result<ResponseJson<ApiResponse<Property>>, ApiError> {
    let property = Property::update(&state.db.pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(property)))
}

pub async fn delete_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Property::delete(&state.db.pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/properties", post(create_property))
        .route(
            "/properties/{id}",
            get(get_property)
                .put(update_property)
                .delete(delete_property),
        )
}
