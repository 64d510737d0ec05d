use axum::{
    Json,
    extract::State,
};
use uuid::Uuid;

use super::{ApiJson, ApiPath};
use crate::{
    AppState,
    auth::Session,
    error::AppError,
    models::{DeleteResponse, News, NewsChanges, NewsDraft},
    resources::Scope,
};

#[utoipa::path(
    get,
    path = "/api/news",
    responses((status = 200, description = "News articles", body = [News]))
)]
pub async fn list_news(State(state): State<AppState>) -> Result<Json<Vec<News>>, AppError> {
    Ok(Json(state.news.list(None, Scope::Public).await?))
}

#[utoipa::path(
    get,
    path = "/api/news/{id}",
    params(("id" = Uuid, Path, description = "News ID")),
    responses(
        (status = 200, description = "Found", body = News),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_news(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<News>, AppError> {
    Ok(Json(state.news.get(&id.to_string()).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/news",
    responses(
        (status = 200, description = "All news articles", body = [News]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn admin_list_news(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<News>>, AppError> {
    Ok(Json(state.news.list(Some(&session), Scope::All).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/news",
    request_body = NewsDraft,
    responses(
        (status = 200, description = "Created", body = News),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_news(
    State(state): State<AppState>,
    session: Session,
    ApiJson(draft): ApiJson<NewsDraft>,
) -> Result<Json<News>, AppError> {
    Ok(Json(state.news.create(Some(&session), draft).await?))
}

/// update_news
///
/// [Admin Route] Partial update; `eventDate: null` clears the date.
#[utoipa::path(
    put,
    path = "/api/admin/news/{id}",
    params(("id" = Uuid, Path, description = "News ID")),
    request_body = NewsChanges,
    responses(
        (status = 200, description = "Updated", body = News),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_news(
    State(state): State<AppState>,
    session: Session,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(changes): ApiJson<NewsChanges>,
) -> Result<Json<News>, AppError> {
    Ok(Json(state.news.update(Some(&session), id, changes).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/news/{id}",
    params(("id" = Uuid, Path, description = "News ID")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_news(
    State(state): State<AppState>,
    session: Session,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.news.delete(Some(&session), id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
