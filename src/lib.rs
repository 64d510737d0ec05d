use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod resources;
pub mod revalidate;
pub mod services;
pub mod storage;

pub mod routes;
use routes::{admin, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::AppError;
pub use repository::{ContentStore, MemoryRepository, PostgresRepository};
pub use revalidate::{HttpRevalidator, LogRevalidator, MockRevalidator, RevalidatorState};
pub use services::CrudService;
pub use storage::{MockMediaStorage, S3MediaStorage, StorageState};

use models::{Blog, Event, News, Review};
use repository::StatsState;

/// ApiDoc
///
/// OpenAPI document served at `/api-docs/openapi.json` and rendered by the
/// Swagger UI at `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::blogs::list_blogs, handlers::blogs::get_blog, handlers::blogs::admin_list_blogs,
        handlers::blogs::create_blog, handlers::blogs::update_blog, handlers::blogs::delete_blog,
        handlers::news::list_news, handlers::news::get_news, handlers::news::admin_list_news,
        handlers::news::create_news, handlers::news::update_news, handlers::news::delete_news,
        handlers::events::list_events, handlers::events::get_event,
        handlers::events::admin_list_events, handlers::events::create_event,
        handlers::events::update_event, handlers::events::delete_event,
        handlers::reviews::list_reviews, handlers::reviews::submit_review,
        handlers::reviews::admin_list_reviews, handlers::reviews::moderate_review,
        handlers::reviews::delete_review,
        handlers::admin::get_admin_stats, handlers::admin::get_presigned_url
    ),
    components(
        schemas(
            models::Blog, models::BlogDraft, models::BlogChanges,
            models::News, models::NewsDraft, models::NewsChanges,
            models::Event, models::EventDraft, models::EventChanges,
            models::Review, models::ReviewDraft, models::ModerateReviewRequest,
            models::ReviewIdRequest, models::DeleteResponse, models::AdminDashboardStats,
            models::PresignedUrlRequest, models::PresignedUrlResponse,
        )
    ),
    tags(
        (name = "culture-cms", description = "Cultural events CMS API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single shared container handed to every handler. Built once at
/// start-up; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub blogs: CrudService<Blog>,
    pub news: CrudService<News>,
    pub events: CrudService<Event>,
    pub reviews: CrudService<Review>,
    pub stats: StatsState,
    pub storage: StorageState,
    pub config: AppConfig,
}

impl AppState {
    /// Wires one store into the four resource services, sharing the same
    /// revalidator between them.
    pub fn new<S>(
        store: Arc<S>,
        storage: StorageState,
        revalidator: RevalidatorState,
        config: AppConfig,
    ) -> Self
    where
        S: ContentStore + 'static,
    {
        Self {
            blogs: CrudService::<Blog>::new(store.clone(), revalidator.clone()),
            news: CrudService::<News>::new(store.clone(), revalidator.clone()),
            events: CrudService::<Event>::new(store.clone(), revalidator.clone()),
            reviews: CrudService::<Review>::new(store.clone(), revalidator),
            stats: store,
            storage,
            config,
        }
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles routing, the two access guards, observability layers and the
/// static frontend fallback.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // API guard: rejects non-admin callers with 401 before any handler runs.
    let admin_api = admin::admin_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        guard::admin_api_guard,
    ));

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .nest("/api/admin", admin_api)
        // Everything else is the prebuilt frontend.
        .fallback_service(ServeDir::new(&state.config.static_dir))
        // Page guard: redirects browser navigations to admin pages.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::admin_page_guard,
        ))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// Opens the `http_request` span for every request, tagged with the request id
/// so all log lines of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
