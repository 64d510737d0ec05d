#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono::{DateTime, Duration, Utc};
use culture_cms::{
    AppConfig, AppState, MemoryRepository, MockRevalidator, MockMediaStorage, RevalidatorState,
    StorageState,
    auth::{ADMIN_CLAIM, Claims},
    create_router,
    models::Review,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::Value;
use std::{sync::Arc, time::SystemTime};
use tower::ServiceExt;
use uuid::Uuid;

// --- Test Context ---

/// One fully wired application over in-memory collaborators. The store and
/// revalidator are kept so tests can inspect side effects directly.
pub struct TestContext {
    pub store: Arc<MemoryRepository>,
    pub revalidator: Arc<MockRevalidator>,
    pub router: Router,
}

pub fn setup() -> TestContext {
    setup_with(MockMediaStorage::new(), MockRevalidator::new())
}

pub fn setup_with(storage: MockMediaStorage, revalidator: MockRevalidator) -> TestContext {
    let store = Arc::new(MemoryRepository::new());
    let revalidator = Arc::new(revalidator);

    let storage = Arc::new(storage) as StorageState;
    let revalidator_state: RevalidatorState = revalidator.clone();

    let state = AppState::new(
        store.clone(),
        storage,
        revalidator_state,
        AppConfig::default(),
    );

    TestContext {
        store,
        revalidator,
        router: create_router(state),
    }
}

// --- Tokens ---

pub fn create_token(role: Option<&str>, exp_offset: i64, secret: &str) -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: "user-42".to_string(),
        role: role.map(str::to_string),
        iat: now as usize,
        exp: (now + exp_offset) as usize,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

pub fn admin_token() -> String {
    create_token(Some(ADMIN_CLAIM), 3600, &AppConfig::default().jwt_secret)
}

/// A signed-in user without the admin role.
pub fn visitor_token() -> String {
    create_token(Some("USER"), 3600, &AppConfig::default().jwt_secret)
}

// --- Requests ---

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::DELETE).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Runs one request through the router. Non-JSON bodies come back as `Null`.
pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    TestResponse {
        status: parts.status,
        headers: parts.headers,
        body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    }
}

pub fn error_message(response: &TestResponse) -> String {
    response.body["error"].as_str().unwrap_or_default().to_string()
}

// --- Fixtures ---

pub fn review_at(name: &str, approved: bool, created_at: DateTime<Utc>) -> Review {
    Review {
        id: Uuid::new_v4(),
        name: name.to_string(),
        star: 4,
        email: format!("{}@example.com", name.to_lowercase()),
        phone: "0123456789".to_string(),
        message: "Lovely evening".to_string(),
        approved,
        created_at,
        updated_at: created_at,
    }
}

pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    Utc::now() - Duration::minutes(minutes)
}

pub fn valid_review_body() -> Value {
    serde_json::json!({
        "name": "Ada",
        "star": 5,
        "email": "ada@example.com",
        "phone": "0123456789",
        "message": "Wonderful exhibition"
    })
}
