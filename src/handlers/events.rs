use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use uuid::Uuid;

use super::{ApiJson, ApiPath};
use crate::{
    AppState,
    auth::Session,
    error::AppError,
    models::{DeleteResponse, Event, EventChanges, EventDraft},
    resources::Scope,
};

#[utoipa::path(
    get,
    path = "/api/events",
    responses((status = 200, description = "Events", body = [Event]))
)]
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(state.events.list(None, Scope::Public).await?))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Found", body = Event),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Event>, AppError> {
    Ok(Json(state.events.get(&id.to_string()).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/events",
    responses(
        (status = 200, description = "All events", body = [Event]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn admin_list_events(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(state.events.list(Some(&session), Scope::All).await?))
}

/// create_event
///
/// [Admin Route] Title, description, time and date are all required.
#[utoipa::path(
    post,
    path = "/api/admin/events",
    request_body = EventDraft,
    responses(
        (status = 201, description = "Created", body = Event),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    session: Session,
    ApiJson(draft): ApiJson<EventDraft>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let event = state.events.create(Some(&session), draft).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    put,
    path = "/api/admin/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = EventChanges,
    responses(
        (status = 200, description = "Updated", body = Event),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    session: Session,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(changes): ApiJson<EventChanges>,
) -> Result<Json<Event>, AppError> {
    Ok(Json(state.events.update(Some(&session), id, changes).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    session: Session,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.events.delete(Some(&session), id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
