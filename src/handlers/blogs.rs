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
    models::{Blog, BlogChanges, BlogDraft, DeleteResponse},
    resources::Scope,
};

/// list_blogs
///
/// [Public Route] Every blog post, newest first.
#[utoipa::path(
    get,
    path = "/api/blogs",
    responses((status = 200, description = "Blog posts", body = [Blog]))
)]
pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<Blog>>, AppError> {
    Ok(Json(state.blogs.list(None, Scope::Public).await?))
}

/// get_blog
///
/// [Public Route] A single post addressed by its slug.
#[utoipa::path(
    get,
    path = "/api/blogs/{slug}",
    params(("slug" = String, Path, description = "Blog slug")),
    responses(
        (status = 200, description = "Found", body = Blog),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_blog(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<Blog>, AppError> {
    Ok(Json(state.blogs.get(&slug).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/blogs",
    responses(
        (status = 200, description = "All blog posts", body = [Blog]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn admin_list_blogs(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<Blog>>, AppError> {
    Ok(Json(state.blogs.list(Some(&session), Scope::All).await?))
}

/// create_blog
///
/// [Admin Route] Publishes a new post. Invalidates the home page and blog index.
#[utoipa::path(
    post,
    path = "/api/admin/blogs",
    request_body = BlogDraft,
    responses(
        (status = 200, description = "Created", body = Blog),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Slug already taken")
    )
)]
pub async fn create_blog(
    State(state): State<AppState>,
    session: Session,
    ApiJson(draft): ApiJson<BlogDraft>,
) -> Result<Json<Blog>, AppError> {
    Ok(Json(state.blogs.create(Some(&session), draft).await?))
}

/// update_blog
///
/// [Admin Route] Partial update. Invalidates the home page, the blog index and
/// the post's own page.
#[utoipa::path(
    put,
    path = "/api/admin/blogs/{id}",
    params(("id" = Uuid, Path, description = "Blog ID")),
    request_body = BlogChanges,
    responses(
        (status = 200, description = "Updated", body = Blog),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_blog(
    State(state): State<AppState>,
    session: Session,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(changes): ApiJson<BlogChanges>,
) -> Result<Json<Blog>, AppError> {
    Ok(Json(state.blogs.update(Some(&session), id, changes).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/blogs/{id}",
    params(("id" = Uuid, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_blog(
    State(state): State<AppState>,
    session: Session,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.blogs.delete(Some(&session), id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
