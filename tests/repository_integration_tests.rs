//! Runs against a real Postgres. Start the database, export `DATABASE_URL`
//! and run with `--ignored`.

use chrono::{Duration, NaiveDate, Utc};
use culture_cms::{
    error::StoreError,
    models::{Blog, BlogChanges, Event, EventChanges, Review, ReviewChanges},
    repository::{PostgresRepository, ResourceStore, StatsSource},
    resources::Scope,
};
use sqlx::PgPool;
use uuid::Uuid;

// --- Test Context and Setup ---

struct DbTestContext {
    pool: PgPool,
}

impl DbTestContext {
    async fn setup() -> Self {
        dotenv::dotenv().ok();

        let db_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set to run integration tests");

        let pool = PgPool::connect(&db_url)
            .await
            .expect("Failed to connect to database for integration tests.");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run database migrations.");

        DbTestContext { pool }
    }

    fn repository(&self) -> PostgresRepository {
        PostgresRepository::new(self.pool.clone())
    }
}

// --- Test Data Helpers ---

fn unique_slug(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

fn blog(slug: &str) -> Blog {
    let now = Utc::now();
    Blog {
        id: Uuid::new_v4(),
        title: "Integration".to_string(),
        slug: slug.to_string(),
        content: "Body".to_string(),
        cover_image: Some("uploads/cover.png".to_string()),
        created_at: now,
        updated_at: now,
    }
}

fn review(approved: bool) -> Review {
    let now = Utc::now();
    Review {
        id: Uuid::new_v4(),
        name: "Ada".to_string(),
        star: 5,
        email: "ada@example.com".to_string(),
        phone: "0123".to_string(),
        message: "Lovely".to_string(),
        approved,
        created_at: now,
        updated_at: now,
    }
}

// --- Tests ---

#[tokio::test]
#[ignore]
async fn test_blog_insert_find_update_delete() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let slug = unique_slug("roundtrip");

    let created = ResourceStore::<Blog>::insert(&repo, blog(&slug)).await.unwrap();
    let found = ResourceStore::<Blog>::find_public(&repo, &slug).await.unwrap();
    assert_eq!(found.id, created.id);

    let later = Utc::now() + Duration::seconds(1);
    let updated = ResourceStore::<Blog>::update(
        &repo,
        created.id,
        BlogChanges {
            title: Some("Renamed".to_string()),
            cover_image: Some(None),
            ..BlogChanges::default()
        },
        later,
    )
    .await
    .unwrap();
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.content, "Body");
    assert_eq!(updated.cover_image, None);
    assert!(updated.updated_at > created.updated_at);

    let deleted = ResourceStore::<Blog>::delete(&repo, created.id).await.unwrap();
    assert_eq!(deleted.id, created.id);

    let again = ResourceStore::<Blog>::delete(&repo, created.id).await;
    assert!(matches!(again, Err(StoreError::NotFound)));
}

#[tokio::test]
#[ignore]
async fn test_blog_duplicate_slug_is_conflict() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let slug = unique_slug("dup");

    let first = ResourceStore::<Blog>::insert(&repo, blog(&slug)).await.unwrap();
    let second = ResourceStore::<Blog>::insert(&repo, blog(&slug)).await;

    assert!(matches!(second, Err(StoreError::Conflict(_))));

    ResourceStore::<Blog>::delete(&repo, first.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_review_scope_filters_unapproved() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();

    let pending = ResourceStore::<Review>::insert(&repo, review(false)).await.unwrap();
    let published = ResourceStore::<Review>::insert(&repo, review(true)).await.unwrap();

    let public = ResourceStore::<Review>::list(&repo, Scope::Public).await.unwrap();
    assert!(public.iter().all(|r| r.approved));
    assert!(public.iter().any(|r| r.id == published.id));
    assert!(public.iter().all(|r| r.id != pending.id));

    let all = ResourceStore::<Review>::list(&repo, Scope::All).await.unwrap();
    assert!(all.iter().any(|r| r.id == pending.id));

    let approved = ResourceStore::<Review>::update(
        &repo,
        pending.id,
        ReviewChanges {
            approved: Some(true),
        },
        Utc::now(),
    )
    .await
    .unwrap();
    assert!(approved.approved);

    let stats = repo.stats().await.unwrap();
    assert!(stats.reviews >= 2);

    ResourceStore::<Review>::delete(&repo, pending.id).await.unwrap();
    ResourceStore::<Review>::delete(&repo, published.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_event_quoted_columns_round_trip() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let now = Utc::now();

    let created = ResourceStore::<Event>::insert(
        &repo,
        Event {
            id: Uuid::new_v4(),
            title: "Jazz".to_string(),
            image: None,
            description: "Quartet".to_string(),
            time: "19:30".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 12, 12).unwrap(),
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .unwrap();

    let updated = ResourceStore::<Event>::update(
        &repo,
        created.id,
        EventChanges {
            time: Some("20:00".to_string()),
            ..EventChanges::default()
        },
        Utc::now(),
    )
    .await
    .unwrap();
    assert_eq!(updated.time, "20:00");
    assert_eq!(updated.date, created.date);

    let missing = ResourceStore::<Event>::find_public(&repo, "not-a-uuid").await;
    assert!(matches!(missing, Err(StoreError::NotFound)));

    ResourceStore::<Event>::delete(&repo, created.id).await.unwrap();
}
