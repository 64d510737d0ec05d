use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    auth::{Role, Session, authorize, session_from_headers},
    config::AppConfig,
    error::AppError,
};

/// Where unauthenticated browser navigations are sent.
pub const LOGIN_PATH: &str = "/admin/login";

/// Admin pages rendered by the frontend that require an admin session.
pub const PROTECTED_PAGE_PREFIXES: &[&str] = &[
    "/admin/dashboard",
    "/admin/blogs",
    "/admin/news",
    "/admin/events",
    "/admin/reviews",
    "/admin/analytics",
];

/// True when `path` is one of the protected prefixes or below one of them.
/// `/admin/blogsroll` does not match `/admin/blogs`.
pub fn is_protected_page(path: &str) -> bool {
    PROTECTED_PAGE_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Percent-encodes everything outside the RFC 3986 unreserved set, `/` included.
fn encode_callback(target: &str) -> String {
    target
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

/// `target` is the requested path with its query string, if any.
pub fn login_redirect(target: &str) -> Redirect {
    Redirect::to(&format!("{LOGIN_PATH}?callbackUrl={}", encode_callback(target)))
}

/// admin_page_guard
///
/// Browser-facing gate. Navigations to protected admin pages without an admin
/// session are redirected to the login page; everything else passes through.
pub async fn admin_page_guard(
    State(config): State<AppConfig>,
    request: Request,
    next: Next,
) -> Response {
    if !is_protected_page(request.uri().path()) {
        return next.run(request).await;
    }

    let session = session_from_headers(request.headers(), &config).ok();
    match authorize(session.as_ref(), Role::Admin) {
        Ok(()) => next.run(request).await,
        Err(_) => {
            let target = request
                .uri()
                .path_and_query()
                .map_or_else(|| request.uri().path(), |pq| pq.as_str());
            tracing::info!(%target, "admin page requested without admin session");
            login_redirect(target).into_response()
        }
    }
}

/// admin_api_guard
///
/// First layer in front of `/api/admin`. The `Session` extractor rejects a
/// missing or invalid token; the role is then checked here. Handlers repeat the
/// check through the service layer.
pub async fn admin_api_guard(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(Some(&session), Role::Admin)?;
    Ok(next.run(request).await)
}
