//! Resource definitions shared by the CRUD service and the stores.
//!
//! Each persisted record type implements [`Resource`], which tells the generic
//! service who may create it, how drafts become records, which rows are publicly
//! visible, and which rendered pages go stale after a write.

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{
    auth::Role,
    error::AppError,
    models::{
        Blog, BlogChanges, BlogDraft, Event, EventChanges, EventDraft, News, NewsChanges,
        NewsDraft, Review, ReviewChanges, ReviewDraft,
    },
};

/// Home page; every resource is featured there.
pub const HOME_PATH: &str = "/";

/// Which rows a listing may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Anonymous readers: publicly visible rows only.
    Public,
    /// Administrators: every row.
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Created,
    Updated,
    Deleted,
}

/// Input checks run before anything reaches the store.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

pub trait Resource: Clone + Serialize + Send + Sync + 'static {
    /// Singular name used in messages and logs.
    const KIND: &'static str;
    /// Path of the rendered index page listing this resource.
    const INDEX_PATH: &'static str;
    /// Role needed to create one. `None` means anyone may.
    const CREATE_ROLE: Option<Role> = Some(Role::Admin);

    type Draft: DeserializeOwned + Validate + Send + Sync;
    type Changes: DeserializeOwned + Validate + Send + Sync;

    /// Builds the record for a validated draft with an application-assigned
    /// identity and timestamps.
    fn from_draft(draft: Self::Draft, id: Uuid, now: DateTime<Utc>) -> Self;

    /// Applies validated changes in place and stamps `updated_at`.
    fn apply(&mut self, changes: Self::Changes, now: DateTime<Utc>);

    fn id(&self) -> Uuid;

    fn created_at(&self) -> DateTime<Utc>;

    /// Key used by the public detail route and the detail page path.
    fn public_key(&self) -> String {
        self.id().to_string()
    }

    fn is_public(&self) -> bool {
        true
    }

    /// Value covered by a unique constraint other than the id, if any.
    fn unique_key(&self) -> Option<&str> {
        None
    }

    /// Rendered detail page for a public key.
    fn detail_path(key: &str) -> String {
        format!("{}/{}", Self::INDEX_PATH, key)
    }

    /// Rendered paths that embed this record and are stale after `mutation`.
    fn stale_paths(&self, mutation: Mutation) -> Vec<String> {
        let mut paths = vec![HOME_PATH.to_string(), Self::INDEX_PATH.to_string()];
        if mutation == Mutation::Updated {
            paths.push(Self::detail_path(&self.public_key()));
        }
        paths
    }
}

// --- Validation helpers ---

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_if_present(field: &str, value: Option<&str>) -> Result<(), AppError> {
    value.map_or(Ok(()), |v| require(field, v))
}

/// Lowercase ASCII alphanumerics separated by single hyphens.
pub fn is_url_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn check_slug(slug: &str) -> Result<(), AppError> {
    require("slug", slug)?;
    if !is_url_safe_slug(slug) {
        return Err(AppError::Validation(
            "slug must contain only lowercase letters, digits and single hyphens".to_string(),
        ));
    }
    Ok(())
}

// --- Blog ---

impl Validate for BlogDraft {
    fn validate(&self) -> Result<(), AppError> {
        require("title", &self.title)?;
        check_slug(&self.slug)?;
        require("content", &self.content)?;
        require_if_present("coverImage", self.cover_image.as_deref())
    }
}

impl Validate for BlogChanges {
    fn validate(&self) -> Result<(), AppError> {
        require_if_present("title", self.title.as_deref())?;
        if let Some(slug) = &self.slug {
            check_slug(slug)?;
        }
        require_if_present("content", self.content.as_deref())?;
        require_if_present("coverImage", self.cover_image.clone().flatten().as_deref())
    }
}

impl Resource for Blog {
    const KIND: &'static str = "blog";
    const INDEX_PATH: &'static str = "/blogs";

    type Draft = BlogDraft;
    type Changes = BlogChanges;

    fn from_draft(draft: BlogDraft, id: Uuid, now: DateTime<Utc>) -> Self {
        Blog {
            id,
            title: draft.title,
            slug: draft.slug,
            content: draft.content,
            cover_image: draft.cover_image,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: BlogChanges, now: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(slug) = changes.slug {
            self.slug = slug;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(cover_image) = changes.cover_image {
            self.cover_image = cover_image;
        }
        self.updated_at = now;
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn public_key(&self) -> String {
        self.slug.clone()
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.slug)
    }
}

// --- News ---

impl Validate for NewsDraft {
    fn validate(&self) -> Result<(), AppError> {
        require("title", &self.title)?;
        require("content", &self.content)
    }
}

impl Validate for NewsChanges {
    fn validate(&self) -> Result<(), AppError> {
        require_if_present("title", self.title.as_deref())?;
        require_if_present("content", self.content.as_deref())
    }
}

impl Resource for News {
    const KIND: &'static str = "news";
    const INDEX_PATH: &'static str = "/news";

    type Draft = NewsDraft;
    type Changes = NewsChanges;

    fn from_draft(draft: NewsDraft, id: Uuid, now: DateTime<Utc>) -> Self {
        News {
            id,
            title: draft.title,
            content: draft.content,
            event_date: draft.event_date,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: NewsChanges, now: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(event_date) = changes.event_date {
            self.event_date = event_date;
        }
        self.updated_at = now;
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// --- Event ---

impl Validate for EventDraft {
    fn validate(&self) -> Result<(), AppError> {
        require("title", &self.title)?;
        require("description", &self.description)?;
        require("time", &self.time)?;
        require_if_present("image", self.image.as_deref())
    }
}

impl Validate for EventChanges {
    fn validate(&self) -> Result<(), AppError> {
        require_if_present("title", self.title.as_deref())?;
        require_if_present("description", self.description.as_deref())?;
        require_if_present("time", self.time.as_deref())?;
        require_if_present("image", self.image.clone().flatten().as_deref())
    }
}

impl Resource for Event {
    const KIND: &'static str = "event";
    const INDEX_PATH: &'static str = "/events";

    type Draft = EventDraft;
    type Changes = EventChanges;

    fn from_draft(draft: EventDraft, id: Uuid, now: DateTime<Utc>) -> Self {
        Event {
            id,
            title: draft.title,
            image: draft.image,
            description: draft.description,
            time: draft.time,
            date: draft.date,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: EventChanges, now: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(image) = changes.image {
            self.image = image;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(time) = changes.time {
            self.time = time;
        }
        if let Some(date) = changes.date {
            self.date = date;
        }
        self.updated_at = now;
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// --- Review ---

pub const MIN_STAR: i32 = 1;
pub const MAX_STAR: i32 = 5;

impl Validate for ReviewDraft {
    fn validate(&self) -> Result<(), AppError> {
        require("name", &self.name)?;
        if !(MIN_STAR..=MAX_STAR).contains(&self.star) {
            return Err(AppError::Validation(format!(
                "star rating must be between {MIN_STAR} and {MAX_STAR}"
            )));
        }
        require("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(AppError::Validation("email is not a valid address".to_string()));
        }
        require("phone", &self.phone)?;
        require("message", &self.message)
    }
}

impl Validate for ReviewChanges {
    fn validate(&self) -> Result<(), AppError> {
        if self.approved.is_none() {
            return Err(AppError::Validation("approved is required".to_string()));
        }
        Ok(())
    }
}

impl Resource for Review {
    const KIND: &'static str = "review";
    const INDEX_PATH: &'static str = "/reviews";
    const CREATE_ROLE: Option<Role> = None;

    type Draft = ReviewDraft;
    type Changes = ReviewChanges;

    /// New reviews always start unapproved.
    fn from_draft(draft: ReviewDraft, id: Uuid, now: DateTime<Utc>) -> Self {
        Review {
            id,
            name: draft.name,
            star: draft.star,
            email: draft.email,
            phone: draft.phone,
            message: draft.message,
            approved: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: ReviewChanges, now: DateTime<Utc>) {
        if let Some(approved) = changes.approved {
            self.approved = approved;
        }
        self.updated_at = now;
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn is_public(&self) -> bool {
        self.approved
    }

    /// Reviews have no detail page, and an unapproved submission changes
    /// nothing a visitor can see.
    fn stale_paths(&self, mutation: Mutation) -> Vec<String> {
        match mutation {
            Mutation::Created => Vec::new(),
            Mutation::Updated | Mutation::Deleted => {
                vec![HOME_PATH.to_string(), Self::INDEX_PATH.to_string()]
            }
        }
    }
}
