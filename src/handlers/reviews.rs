use axum::{Json, extract::State, http::StatusCode};

use super::ApiJson;
use crate::{
    AppState,
    auth::Session,
    error::AppError,
    models::{DeleteResponse, ModerateReviewRequest, Review, ReviewDraft, ReviewIdRequest},
    resources::Scope,
};

/// list_reviews
///
/// [Public Route] Approved reviews only. Unapproved submissions never leave
/// the store through this route.
#[utoipa::path(
    get,
    path = "/api/reviews",
    responses((status = 200, description = "Approved reviews", body = [Review]))
)]
pub async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<Review>>, AppError> {
    Ok(Json(state.reviews.list(None, Scope::Public).await?))
}

/// submit_review
///
/// [Public Route] Anyone may submit. The review is stored unapproved and stays
/// invisible until an administrator approves it.
#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = ReviewDraft,
    responses(
        (status = 201, description = "Submitted for moderation", body = Review),
        (status = 400, description = "Missing fields or star rating out of range")
    )
)]
pub async fn submit_review(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<ReviewDraft>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let review = state.reviews.create(None, draft).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// admin_list_reviews
///
/// [Admin Route] Every review, approved or not, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/reviews",
    responses(
        (status = 200, description = "All reviews", body = [Review]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn admin_list_reviews(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<Review>>, AppError> {
    Ok(Json(state.reviews.list(Some(&session), Scope::All).await?))
}

/// moderate_review
///
/// [Admin Route] Approves or un-approves a review.
#[utoipa::path(
    put,
    path = "/api/admin/reviews",
    request_body = ModerateReviewRequest,
    responses(
        (status = 200, description = "Updated", body = Review),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn moderate_review(
    State(state): State<AppState>,
    session: Session,
    ApiJson(req): ApiJson<ModerateReviewRequest>,
) -> Result<Json<Review>, AppError> {
    Ok(Json(
        state
            .reviews
            .moderate(Some(&session), req.id, req.approved)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/admin/reviews",
    request_body = ReviewIdRequest,
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_review(
    State(state): State<AppState>,
    session: Session,
    ApiJson(req): ApiJson<ReviewIdRequest>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.reviews.delete(Some(&session), req.id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
