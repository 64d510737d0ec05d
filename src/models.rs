use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Persisted Records (Mapped to Database) ---

/// Blog
///
/// A blog post from the `blogs` table. Public pages address it by `slug`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    // Unique, URL-safe. Enforced by a unique index.
    pub slug: String,
    pub content: String,
    pub cover_image: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// News
///
/// A news article from the `news` table, optionally tied to an event date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct News {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub event_date: Option<NaiveDate>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Event
///
/// A scheduled cultural event from the `events` table. `time` is free-form
/// ("19:30", "doors 7pm") and stored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub image: Option<String>,
    pub description: String,
    pub time: String,
    pub date: NaiveDate,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Review
///
/// A visitor review from the `reviews` table. Only rows with `approved = true`
/// are ever returned to anonymous readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Review {
    pub id: Uuid,
    pub name: String,
    // 1..=5, also guarded by a CHECK constraint.
    pub star: i32,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub approved: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// BlogDraft
///
/// Body of `POST /api/admin/blogs`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BlogDraft {
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewsDraft {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EventDraft {
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    pub description: String,
    pub time: String,
    pub date: NaiveDate,
}

/// ReviewDraft
///
/// Body of the public `POST /api/reviews`. There is no `approved`
/// field: any value a client sends is dropped during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReviewDraft {
    pub name: String,
    pub star: i32,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn explicit_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// For fields that may be omitted but never cleared: an explicit `null` is
/// rejected instead of being read as "absent".
fn reject_null<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer)?
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom("value must not be null"))
}

/// BlogChanges
///
/// Partial update for a blog. Absent fields are left alone; `coverImage: null`
/// removes the cover image.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct BlogChanges {
    #[serde(
        default,
        deserialize_with = "reject_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "reject_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub slug: Option<String>,
    #[serde(
        default,
        deserialize_with = "reject_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<String>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub cover_image: Option<Option<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewsChanges {
    #[serde(
        default,
        deserialize_with = "reject_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "reject_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<String>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, format = Date)]
    pub event_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventChanges {
    #[serde(
        default,
        deserialize_with = "reject_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "reject_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "reject_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<String>,
    #[serde(
        default,
        deserialize_with = "reject_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
}

/// ReviewChanges
///
/// The only mutable attribute of a review is its moderation flag.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReviewChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved: Option<bool>,
}

/// ModerateReviewRequest
///
/// Body of `PUT /api/admin/reviews`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ModerateReviewRequest {
    pub id: Uuid,
    pub approved: bool,
}

/// Body of `DELETE /api/admin/reviews`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ReviewIdRequest {
    pub id: Uuid,
}

/// PresignedUrlRequest
///
/// Input for requesting a short-lived S3 upload URL for a cover or event image.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, TS, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PresignedUrlRequest {
    /// The original filename, used to derive the file extension.
    #[schema(example = "poster.jpg")]
    pub filename: String,
    /// MIME type the client will upload with. Must be `image/*`.
    #[schema(example = "image/jpeg")]
    pub file_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PresignedUrlResponse {
    /// The time-limited URL for the PUT request.
    pub upload_url: String,
    /// Object key to store in `coverImage` / `image` once the upload completes.
    pub resource_key: String,
}

// --- Output Schemas ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct DeleteResponse {
    pub success: bool,
}

/// AdminDashboardStats
///
/// Counters for the admin dashboard and analytics pages (GET /api/admin/stats).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AdminDashboardStats {
    pub blogs: i64,
    pub news: i64,
    pub events: i64,
    pub reviews: i64,
    /// Reviews still waiting for moderation (`approved = false`).
    pub pending_reviews: i64,
}
