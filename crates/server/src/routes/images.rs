use axum::{
    Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Json as ResponseJson, Response},
    routing::get,
};
use chrono::Utc;
use db::models::project_image::{ImageKind, ProjectImage};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    pub kind: ImageKind,
    pub ext: String,
}

/// An image with a signed, time-limited download URL.
#[derive(Debug, Serialize, TS)]
pub struct SignedImage {
    #[serde(flatten)]
    #[ts(flatten)]
    pub image: ProjectImage,
    pub url: String,
}

pub async fn list_project_images(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<SignedImage>>>, ApiError> {
    let images = ProjectImage::find_by_project_id(&state.db.pool, project_id).await?;
    let now = Utc::now();
    let signed = images
        .into_iter()
        .map(|image| {
            let url = format!("/api/blobs/{}", state.images.token_for(&image, now));
            SignedImage { image, url }
        })
        .collect();
    Ok(ResponseJson(ApiResponse::success(signed)))
}

/// Upload raw image bytes for a project. The kind and extension ride in the
/// query string; the body is the blob itself.
pub async fn upload_project_image(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<ResponseJson<ApiResponse<SignedImage>>, ApiError> {
    let project = db::models::project::Project::find_by_id(&state.db.pool, project_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let image = state
        .images
        .save(
            &state.db.pool,
            project.company_id,
            project.id,
            query.kind,
            &query.ext,
            &body,
        )
        .await?;
    let url = format!(
        "/api/blobs/{}",
        state.images.token_for(&image, Utc::now())
    );
    Ok(ResponseJson(ApiResponse::success(SignedImage {
        image,
        url,
    })))
}

/// Mint a fresh signed URL for an existing image.
pub async fn get_image_url(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<String>>, ApiError> {
    let image = ProjectImage::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let url = format!(
        "/api/blobs/{}",
        state.images.token_for(&image, Utc::now())
    );
    Ok(ResponseJson(ApiResponse::success(url)))
}

pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let image = ProjectImage::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    state.images.delete(&state.db.pool, &image).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// Serve a blob for a valid, unexpired token.
pub async fn download_blob(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let relative = state.images.verify(&token, Utc::now())?;
    let bytes = state.images.read(&relative).await?;
    let content_type = match relative.rsplit('.').next() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/{id}/images",
            get(list_project_images).post(upload_project_image),
        )
        .route("/images/{id}/url", get(get_image_url))
        .route("/images/{id}", axum::routing::delete(delete_image))
        .route("/blobs/{token}", get(download_blob))
}
