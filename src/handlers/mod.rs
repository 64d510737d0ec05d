//! HTTP handlers.
//!
//! Handlers stay thin: extract, call the resource service with the caller's
//! session, and serialize the result. Authorization, validation and cache
//! invalidation all live in `services::CrudService`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

pub mod admin;
pub mod blogs;
pub mod events;
pub mod news;
pub mod reviews;

/// ApiJson
///
/// `axum::Json` with its rejection mapped into `AppError::Validation`, so
/// malformed bodies and missing required fields answer 400 `{ "error": ... }`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// ApiPath
///
/// `axum::extract::Path` with the same treatment: an id that does not parse
/// answers 400 `{ "error": ... }`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
