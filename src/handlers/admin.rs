use axum::{Json, extract::State};

use super::ApiJson;
use crate::{
    AppState,
    auth::{Role, Session, authorize},
    error::AppError,
    models::{AdminDashboardStats, PresignedUrlRequest, PresignedUrlResponse},
    storage::{image_upload_key, is_image_type},
};

/// get_admin_stats
///
/// [Admin Route] Counters for the dashboard and analytics pages.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Stats", body = AdminDashboardStats),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_admin_stats(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<AdminDashboardStats>, AppError> {
    authorize(Some(&session), Role::Admin)?;
    let stats = state
        .stats
        .stats()
        .await
        .map_err(|e| AppError::from_store("stats", e))?;
    Ok(Json(stats))
}

/// get_presigned_url
///
/// [Admin Route] Issues a 10-minute upload URL for a cover or event image.
/// The server picks the object key; the client stores it in `coverImage` or
/// `image` once the upload has finished.
#[utoipa::path(
    post,
    path = "/api/admin/uploads/presigned",
    request_body = PresignedUrlRequest,
    responses(
        (status = 200, description = "URL", body = PresignedUrlResponse),
        (status = 400, description = "Not an image"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_presigned_url(
    State(state): State<AppState>,
    session: Session,
    ApiJson(payload): ApiJson<PresignedUrlRequest>,
) -> Result<Json<PresignedUrlResponse>, AppError> {
    authorize(Some(&session), Role::Admin)?;

    if !is_image_type(&payload.file_type) {
        return Err(AppError::Validation(
            "only image uploads are accepted".to_string(),
        ));
    }

    let object_key = image_upload_key(&payload.filename);

    let upload_url = state
        .storage
        .presign_upload(&object_key, &payload.file_type)
        .await
        .map_err(|e| AppError::OperationFailed(e.to_string()))?;

    Ok(Json(PresignedUrlResponse {
        upload_url,
        resource_key: object_key,
    }))
}
