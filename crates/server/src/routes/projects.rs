use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::{
    models::{
        estimate::Estimate,
        invoice::Invoice,
        project::{CreateProject, Project, UpdateProject},
    },
    query::ListParams,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn create_project(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateProject>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let project = Project::create(&state.db.pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn list_projects(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> Result<ResponseJson<ApiResponse<Vec<Project>>>, ApiError> {
    let projects = Project::find_by_company_id(&state.db.pool, company_id, &params).await?;
    Ok(ResponseJson(ApiResponse::success(projects)))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let project = Project::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateProject>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let project = Project::update(&state.db.pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Project::delete(&state.db.pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn list_project_estimates(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Estimate>>>, ApiError> {
    let estimates = Estimate::find_by_project_id(&state.db.pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(estimates)))
}

pub async fn list_project_invoices(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Invoice>>>, ApiError> {
    let invoices = Invoice::find_by_project_id(&state.db.pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(invoices)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/companies/{company_id}/projects", get(list_projects))
        .route("/projects", post(create_project))
        .route(
            "/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/projects/{id}/estimates", get(list_project_estimates))
        .route("/projects/{id}/invoices", get(list_project_invoices))
}
