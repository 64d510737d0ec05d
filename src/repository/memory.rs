use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ResourceStore, StatsSource};
use crate::{
    error::StoreError,
    models::{AdminDashboardStats, Blog, Event, News, Review},
    resources::{Resource, Scope},
};

/// One table of an in-memory store.
pub struct MemoryTable<R> {
    rows: RwLock<Vec<R>>,
}

impl<R> Default for MemoryTable<R> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<R: Resource> MemoryTable<R> {
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Direct row access for test assertions, bypassing the service.
    pub async fn get(&self, id: Uuid) -> Option<R> {
        self.rows.read().await.iter().find(|r| r.id() == id).cloned()
    }

    /// Seeds a row directly, bypassing validation and authorization.
    pub async fn seed(&self, record: R) {
        self.rows.write().await.push(record);
    }

    async fn list(&self, scope: Scope) -> Vec<R> {
        let mut rows: Vec<R> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|r| scope == Scope::All || r.is_public())
            .cloned()
            .collect();
        rows.sort_by_key(|r| std::cmp::Reverse(r.created_at()));
        rows
    }

    async fn find_public(&self, key: &str) -> Result<R, StoreError> {
        self.rows
            .read()
            .await
            .iter()
            .find(|r| r.is_public() && r.public_key() == key)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn insert(&self, record: R) -> Result<R, StoreError> {
        let mut rows = self.rows.write().await;
        if let Some(key) = record.unique_key()
            && rows.iter().any(|r| r.unique_key() == Some(key))
        {
            return Err(StoreError::Conflict(format!("{}_unique", R::KIND)));
        }
        rows.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: R::Changes,
        now: DateTime<Utc>,
    ) -> Result<R, StoreError> {
        let mut rows = self.rows.write().await;
        let index = rows
            .iter()
            .position(|r| r.id() == id)
            .ok_or(StoreError::NotFound)?;

        let mut updated = rows[index].clone();
        updated.apply(changes, now);

        if let Some(key) = updated.unique_key()
            && rows
                .iter()
                .any(|r| r.id() != id && r.unique_key() == Some(key))
        {
            return Err(StoreError::Conflict(format!("{}_unique", R::KIND)));
        }

        rows[index] = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<R, StoreError> {
        let mut rows = self.rows.write().await;
        let index = rows
            .iter()
            .position(|r| r.id() == id)
            .ok_or(StoreError::NotFound)?;
        Ok(rows.remove(index))
    }
}

/// MemoryRepository
///
/// A `ContentStore` kept entirely in process memory. Used by the test suite
/// and for running the API without a database. Behaves like the Postgres store:
/// newest-first ordering, unique slugs, not-found on unknown ids.
#[derive(Default)]
pub struct MemoryRepository {
    pub blogs: MemoryTable<Blog>,
    pub news: MemoryTable<News>,
    pub events: MemoryTable<Event>,
    pub reviews: MemoryTable<Review>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Routes a resource type to its table.
pub trait HasTable<R> {
    fn table(&self) -> &MemoryTable<R>;
}

impl HasTable<Blog> for MemoryRepository {
    fn table(&self) -> &MemoryTable<Blog> {
        &self.blogs
    }
}

impl HasTable<News> for MemoryRepository {
    fn table(&self) -> &MemoryTable<News> {
        &self.news
    }
}

impl HasTable<Event> for MemoryRepository {
    fn table(&self) -> &MemoryTable<Event> {
        &self.events
    }
}

impl HasTable<Review> for MemoryRepository {
    fn table(&self) -> &MemoryTable<Review> {
        &self.reviews
    }
}

#[async_trait]
impl<R> ResourceStore<R> for MemoryRepository
where
    R: Resource,
    R::Changes: 'static,
    MemoryRepository: HasTable<R>,
{
    async fn list(&self, scope: Scope) -> Result<Vec<R>, StoreError> {
        Ok(HasTable::<R>::table(self).list(scope).await)
    }

    async fn find_public(&self, key: &str) -> Result<R, StoreError> {
        HasTable::<R>::table(self).find_public(key).await
    }

    async fn find(&self, id: Uuid) -> Result<R, StoreError> {
        HasTable::<R>::table(self)
            .get(id)
            .await
            .ok_or(StoreError::NotFound)
    }

    async fn insert(&self, record: R) -> Result<R, StoreError> {
        HasTable::<R>::table(self).insert(record).await
    }

    async fn update(
        &self,
        id: Uuid,
        changes: R::Changes,
        now: DateTime<Utc>,
    ) -> Result<R, StoreError> {
        HasTable::<R>::table(self).update(id, changes, now).await
    }

    async fn delete(&self, id: Uuid) -> Result<R, StoreError> {
        HasTable::<R>::table(self).delete(id).await
    }
}

#[async_trait]
impl StatsSource for MemoryRepository {
    async fn stats(&self) -> Result<AdminDashboardStats, StoreError> {
        let pending_reviews = self
            .reviews
            .rows
            .read()
            .await
            .iter()
            .filter(|r| !r.approved)
            .count();

        Ok(AdminDashboardStats {
            blogs: self.blogs.len().await as i64,
            news: self.news.len().await as i64,
            events: self.events.len().await as i64,
            reviews: self.reviews.len().await as i64,
            pending_reviews: pending_reviews as i64,
        })
    }
}
