use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::StoreError,
    models::{
        AdminDashboardStats, Blog, BlogChanges, Event, EventChanges, News, NewsChanges, Review,
        ReviewChanges,
    },
    resources::{Resource, Scope},
};

pub mod memory;

pub use memory::MemoryRepository;

/// ResourceStore
///
/// Persistence contract for one resource type. Identities and timestamps are
/// produced by the caller; the store only writes what it is given, except for
/// `updated_at` on `update`, which it stamps with `now`.
///
/// Every method is a single statement against the store. No multi-row
/// transactions are used.
#[async_trait]
pub trait ResourceStore<R: Resource>: Send + Sync {
    /// All rows visible in `scope`, newest first.
    async fn list(&self, scope: Scope) -> Result<Vec<R>, StoreError>;

    /// A publicly visible row addressed by its public key.
    async fn find_public(&self, key: &str) -> Result<R, StoreError>;

    /// Any row by id, regardless of visibility.
    async fn find(&self, id: Uuid) -> Result<R, StoreError>;

    async fn insert(&self, record: R) -> Result<R, StoreError>;

    async fn update(
        &self,
        id: Uuid,
        changes: R::Changes,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<R, StoreError>;

    /// Removes the row and returns what was removed.
    async fn delete(&self, id: Uuid) -> Result<R, StoreError>;
}

/// Counters for the admin dashboard.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn stats(&self) -> Result<AdminDashboardStats, StoreError>;
}

/// ContentStore
///
/// Everything the application needs from persistence. Implemented by
/// `PostgresRepository` in production and `MemoryRepository` in tests.
pub trait ContentStore:
    ResourceStore<Blog> + ResourceStore<News> + ResourceStore<Event> + ResourceStore<Review> + StatsSource
{
}

impl<T> ContentStore for T where
    T: ResourceStore<Blog>
        + ResourceStore<News>
        + ResourceStore<Event>
        + ResourceStore<Review>
        + StatsSource
{
}

pub type StoreState<R> = Arc<dyn ResourceStore<R>>;
pub type StatsState = Arc<dyn StatsSource>;

/// PostgresRepository
///
/// The production store. One pool is created at start-up and shared by every
/// resource service.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn parse_id(key: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(key).map_err(|_| StoreError::NotFound)
}

// --- Blogs ---

const BLOG_COLUMNS: &str = "id, title, slug, content, cover_image, created_at, updated_at";

#[async_trait]
impl ResourceStore<Blog> for PostgresRepository {
    async fn list(&self, _scope: Scope) -> Result<Vec<Blog>, StoreError> {
        let sql = format!("SELECT {BLOG_COLUMNS} FROM blogs ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, Blog>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_public(&self, slug: &str) -> Result<Blog, StoreError> {
        let sql = format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE slug = $1");
        Ok(sqlx::query_as::<_, Blog>(&sql)
            .bind(slug)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find(&self, id: Uuid) -> Result<Blog, StoreError> {
        let sql = format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1");
        Ok(sqlx::query_as::<_, Blog>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn insert(&self, blog: Blog) -> Result<Blog, StoreError> {
        let sql = format!(
            "INSERT INTO blogs (id, title, slug, content, cover_image, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {BLOG_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Blog>(&sql)
            .bind(blog.id)
            .bind(blog.title)
            .bind(blog.slug)
            .bind(blog.content)
            .bind(blog.cover_image)
            .bind(blog.created_at)
            .bind(blog.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    /// COALESCE leaves absent fields untouched. The nullable cover image uses
    /// an explicit "touched" flag so that `null` can clear it.
    async fn update(
        &self,
        id: Uuid,
        changes: BlogChanges,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Blog, StoreError> {
        let sql = format!(
            r#"
            UPDATE blogs
            SET title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                content = COALESCE($4, content),
                cover_image = CASE WHEN $5 THEN $6 ELSE cover_image END,
                updated_at = $7
            WHERE id = $1
            RETURNING {BLOG_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, Blog>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.slug)
            .bind(changes.content)
            .bind(changes.cover_image.is_some())
            .bind(changes.cover_image.flatten())
            .bind(now)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn delete(&self, id: Uuid) -> Result<Blog, StoreError> {
        let sql = format!("DELETE FROM blogs WHERE id = $1 RETURNING {BLOG_COLUMNS}");
        Ok(sqlx::query_as::<_, Blog>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?)
    }
}

// --- News ---

const NEWS_COLUMNS: &str = "id, title, content, event_date, created_at, updated_at";

#[async_trait]
impl ResourceStore<News> for PostgresRepository {
    async fn list(&self, _scope: Scope) -> Result<Vec<News>, StoreError> {
        let sql = format!("SELECT {NEWS_COLUMNS} FROM news ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, News>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_public(&self, key: &str) -> Result<News, StoreError> {
        let sql = format!("SELECT {NEWS_COLUMNS} FROM news WHERE id = $1");
        Ok(sqlx::query_as::<_, News>(&sql)
            .bind(parse_id(key)?)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find(&self, id: Uuid) -> Result<News, StoreError> {
        let sql = format!("SELECT {NEWS_COLUMNS} FROM news WHERE id = $1");
        Ok(sqlx::query_as::<_, News>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn insert(&self, news: News) -> Result<News, StoreError> {
        let sql = format!(
            "INSERT INTO news (id, title, content, event_date, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {NEWS_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, News>(&sql)
            .bind(news.id)
            .bind(news.title)
            .bind(news.content)
            .bind(news.event_date)
            .bind(news.created_at)
            .bind(news.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: NewsChanges,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<News, StoreError> {
        let sql = format!(
            r#"
            UPDATE news
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                event_date = CASE WHEN $4 THEN $5 ELSE event_date END,
                updated_at = $6
            WHERE id = $1
            RETURNING {NEWS_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, News>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.content)
            .bind(changes.event_date.is_some())
            .bind(changes.event_date.flatten())
            .bind(now)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn delete(&self, id: Uuid) -> Result<News, StoreError> {
        let sql = format!("DELETE FROM news WHERE id = $1 RETURNING {NEWS_COLUMNS}");
        Ok(sqlx::query_as::<_, News>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?)
    }
}

// --- Events ---

const EVENT_COLUMNS: &str =
    r#"id, title, image, description, "time", "date", created_at, updated_at"#;

#[async_trait]
impl ResourceStore<Event> for PostgresRepository {
    async fn list(&self, _scope: Scope) -> Result<Vec<Event>, StoreError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, Event>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_public(&self, key: &str) -> Result<Event, StoreError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(parse_id(key)?)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find(&self, id: Uuid) -> Result<Event, StoreError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn insert(&self, event: Event) -> Result<Event, StoreError> {
        let sql = format!(
            r#"INSERT INTO events (id, title, image, description, "time", "date", created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {EVENT_COLUMNS}"#
        );
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(event.id)
            .bind(event.title)
            .bind(event.image)
            .bind(event.description)
            .bind(event.time)
            .bind(event.date)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: EventChanges,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Event, StoreError> {
        let sql = format!(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                image = CASE WHEN $3 THEN $4 ELSE image END,
                description = COALESCE($5, description),
                "time" = COALESCE($6, "time"),
                "date" = COALESCE($7, "date"),
                updated_at = $8
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.image.is_some())
            .bind(changes.image.flatten())
            .bind(changes.description)
            .bind(changes.time)
            .bind(changes.date)
            .bind(now)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn delete(&self, id: Uuid) -> Result<Event, StoreError> {
        let sql = format!("DELETE FROM events WHERE id = $1 RETURNING {EVENT_COLUMNS}");
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?)
    }
}

// --- Reviews ---

const REVIEW_COLUMNS: &str =
    "id, name, star, email, phone, message, approved, created_at, updated_at";

#[async_trait]
impl ResourceStore<Review> for PostgresRepository {
    /// **Moderation gate**: the public scope filters on `approved = true` in SQL.
    async fn list(&self, scope: Scope) -> Result<Vec<Review>, StoreError> {
        let filter = match scope {
            Scope::Public => "WHERE approved = true",
            Scope::All => "",
        };
        let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews {filter} ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, Review>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_public(&self, key: &str) -> Result<Review, StoreError> {
        let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1 AND approved = true");
        Ok(sqlx::query_as::<_, Review>(&sql)
            .bind(parse_id(key)?)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find(&self, id: Uuid) -> Result<Review, StoreError> {
        let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1");
        Ok(sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn insert(&self, review: Review) -> Result<Review, StoreError> {
        let sql = format!(
            "INSERT INTO reviews (id, name, star, email, phone, message, approved, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {REVIEW_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Review>(&sql)
            .bind(review.id)
            .bind(review.name)
            .bind(review.star)
            .bind(review.email)
            .bind(review.phone)
            .bind(review.message)
            .bind(review.approved)
            .bind(review.created_at)
            .bind(review.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: ReviewChanges,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Review, StoreError> {
        let sql = format!(
            "UPDATE reviews SET approved = COALESCE($2, approved), updated_at = $3 \
             WHERE id = $1 RETURNING {REVIEW_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .bind(changes.approved)
            .bind(now)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn delete(&self, id: Uuid) -> Result<Review, StoreError> {
        let sql = format!("DELETE FROM reviews WHERE id = $1 RETURNING {REVIEW_COLUMNS}");
        Ok(sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?)
    }
}

#[async_trait]
impl StatsSource for PostgresRepository {
    /// Compiles all dashboard counters in a single round-trip.
    async fn stats(&self) -> Result<AdminDashboardStats, StoreError> {
        let (blogs, news, events, reviews, pending_reviews): (i64, i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM blogs),
                    (SELECT COUNT(*) FROM news),
                    (SELECT COUNT(*) FROM events),
                    (SELECT COUNT(*) FROM reviews),
                    (SELECT COUNT(*) FROM reviews WHERE approved = false)
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(AdminDashboardStats {
            blogs,
            news,
            events,
            reviews,
            pending_reviews,
        })
    }
}
