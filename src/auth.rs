use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::{config::AppConfig, error::AppError};

/// Name of the cookie the frontend stores the session token in.
pub const SESSION_COOKIE: &str = "session_token";

/// Role claim value that grants administrative access.
pub const ADMIN_CLAIM: &str = "ADMIN";

/// Claims
///
/// Payload of the session token issued by the identity provider. Only `role`
/// is interpreted for access control; `sub` is carried through for logging.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the identity of the signed-in user.
    pub sub: String,
    /// Role claim. `ADMIN` is the only value that carries meaning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

/// Role
///
/// Closed set of access tiers. Ordering follows privilege, so a session
/// satisfies a requirement when `session.role >= required`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    Visitor,
    Admin,
}

impl Role {
    pub fn from_claim(claim: Option<&str>) -> Self {
        match claim {
            Some(ADMIN_CLAIM) => Role::Admin,
            _ => Role::Visitor,
        }
    }
}

/// Session
///
/// The resolved caller of a request. Built fresh from the token on every
/// request; nothing is cached between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: String,
    pub role: Role,
}

impl Session {
    pub fn admin(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            role: Role::Admin,
        }
    }

    pub fn visitor(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            role: Role::Visitor,
        }
    }
}

/// authorize
///
/// The single capability gate shared by the access guards and every service
/// operation. An absent session never satisfies a requirement.
pub fn authorize(session: Option<&Session>, required: Role) -> Result<(), AppError> {
    match session {
        Some(session) if session.role >= required => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}

/// Pulls the raw token from `Authorization: Bearer ...`, falling back to the
/// session cookie used by browser navigations.
fn extract_token(headers: &HeaderMap) -> Option<&str> {
    if let Some(bearer) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        return Some(bearer.trim());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token)
}

/// session_from_headers
///
/// Decodes and validates the session token carried by a request. Expiry is
/// always enforced. Any failure collapses into `AppError::Unauthorized`.
pub fn session_from_headers(headers: &HeaderMap, config: &AppConfig) -> Result<Session, AppError> {
    let token = extract_token(headers).ok_or(AppError::Unauthorized)?;

    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "session token rejected");
        AppError::Unauthorized
    })?;

    let claims = token_data.claims;
    Ok(Session {
        role: Role::from_claim(claims.role.as_deref()),
        identity: claims.sub,
    })
}

/// Session Extractor
///
/// Handlers that take a `Session` argument reject the request with 401 before
/// running when no valid token is present. Role checks happen afterwards via
/// `authorize`.
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);
        session_from_headers(&parts.headers, &config)
    }
}
