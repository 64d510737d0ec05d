use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Read-only content for the site plus the review submission form.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        .route("/api/blogs", get(handlers::blogs::list_blogs))
        .route("/api/blogs/{slug}", get(handlers::blogs::get_blog))
        .route("/api/news", get(handlers::news::list_news))
        .route("/api/news/{id}", get(handlers::news::get_news))
        .route("/api/events", get(handlers::events::list_events))
        .route("/api/events/{id}", get(handlers::events::get_event))
        // GET lists approved reviews; POST submits one for moderation.
        .route(
            "/api/reviews",
            get(handlers::reviews::list_reviews).post(handlers::reviews::submit_review),
        )
}
