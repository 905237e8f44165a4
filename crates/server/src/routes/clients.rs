use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::{
    models::{
        client::{Client, CreateClient, UpdateClient},
        project::Project,
        property::Property,
    },
    query::ListParams,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn create_client(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateClient>,
) -> Result<ResponseJson<ApiResponse<Client>>, ApiError> {
    let client = Client::create(&state.db.pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(client)))
}

pub async fn list_clients(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> Result<ResponseJson<ApiResponse<Vec<Client>>>, ApiError> {
    let clients = Client::find_by_company_id(&state.db.pool, company_id, &params).await?;
    Ok(ResponseJson(ApiResponse::success(clients)))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Client>>, ApiError> {
    let client = Client::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(client)))
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateClient>,
) -> Result<ResponseJson<ApiResponse<Client>>, ApiError> {
    let client = Client::update(&state.db.pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(client)))
}

pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Client::delete(&state.db.pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn list_client_properties(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Property>>>, ApiError> {
    let properties = Property::find_by_client_id(&state.db.pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(properties)))
}

pub async fn list_client_projects(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Project>>>, ApiError> {
    let projects = Project::find_by_client_id(&state.db.pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(projects)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/companies/{company_id}/clients", get(list_clients))
        .route("/clients", post(create_client))
        .route(
            "/clients/{id}",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route("/clients/{id}/properties", get(list_client_properties))
        .route("/clients/{id}/projects", get(list_client_projects))
}
