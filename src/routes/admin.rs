use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Admin Router Module
///
/// Content management and moderation. Nested under `/api/admin` and wrapped
/// in the admin guard by `create_router`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /api/admin/stats
        // Dashboard counters, including reviews waiting for moderation.
        .route("/stats", get(handlers::admin::get_admin_stats))
        .route(
            "/uploads/presigned",
            post(handlers::admin::get_presigned_url),
        )
        .route(
            "/blogs",
            get(handlers::blogs::admin_list_blogs).post(handlers::blogs::create_blog),
        )
        .route(
            "/blogs/{id}",
            put(handlers::blogs::update_blog).delete(handlers::blogs::delete_blog),
        )
        .route(
            "/news",
            get(handlers::news::admin_list_news).post(handlers::news::create_news),
        )
        .route(
            "/news/{id}",
            put(handlers::news::update_news).delete(handlers::news::delete_news),
        )
        .route(
            "/events",
            get(handlers::events::admin_list_events).post(handlers::events::create_event),
        )
        .route(
            "/events/{id}",
            put(handlers::events::update_event).delete(handlers::events::delete_event),
        )
        // Moderation queue. The review id travels in the body.
        .route(
            "/reviews",
            get(handlers::reviews::admin_list_reviews)
                .put(handlers::reviews::moderate_review)
                .delete(handlers::reviews::delete_review),
        )
}
