//! Repository layer.
//!
//! [`CatalogRepo`] is a zero-sized struct providing async CRUD methods over
//! `&PgPool` for any [`CatalogRecord`]; [`MemoryStore`] provides the same
//! operations in memory. [`CatalogStore`] dispatches to whichever backend the
//! server was configured with.

pub mod catalog_repo;
pub mod memory_repo;

use std::sync::Arc;

use catalog_core::entity::EntityKind;
use catalog_core::pagination::Page;
use catalog_core::types::DbId;

pub use catalog_repo::CatalogRepo;
pub use memory_repo::MemoryStore;

use crate::error::StoreError;
use crate::record::{CatalogRecord, ListQuery};
use crate::DbPool;

/// Storage backend shared by all handlers. Cheap to clone.
#[derive(Clone)]
pub enum CatalogStore {
    Postgres(DbPool),
    Memory(Arc<MemoryStore>),
}

impl CatalogStore {
    /// A fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::Memory(Arc::new(MemoryStore::new()))
    }

    /// Short backend name for logs and health output.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }

    pub async fn insert<T: CatalogRecord>(&self, record: &T) -> Result<T, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(CatalogRepo::create(pool, record).await?),
            Self::Memory(store) => store.create(record).await,
        }
    }

    pub async fn find_by_id<T: CatalogRecord>(&self, id: DbId) -> Result<Option<T>, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(CatalogRepo::find_by_id(pool, id).await?),
            Self::Memory(store) => store.find_by_id(id).await,
        }
    }

    pub async fn exists(&self, kind: EntityKind, id: DbId) -> Result<bool, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(CatalogRepo::exists(pool, kind, id).await?),
            Self::Memory(store) => store.exists(kind, id).await,
        }
    }

    pub async fn list<T: CatalogRecord>(&self, query: &ListQuery) -> Result<Page<T>, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(CatalogRepo::list(pool, query).await?),
            Self::Memory(store) => store.list(query).await,
        }
    }

    /// Persist the full state of an existing row. `None` if the row is gone.
    pub async fn save<T: CatalogRecord>(&self, record: &T) -> Result<Option<T>, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(CatalogRepo::update(pool, record).await?),
            Self::Memory(store) => store.update(record).await,
        }
    }

    pub async fn delete(&self, kind: EntityKind, id: DbId) -> Result<bool, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(CatalogRepo::delete(pool, kind, id).await?),
            Self::Memory(store) => store.delete(kind, id).await,
        }
    }

    /// Whether the backend is reachable. The memory store always is.
    pub async fn health_check(&self) -> Result<(), StoreError> {
        match self {
            Self::Postgres(pool) => Ok(crate::health_check(pool).await?),
            Self::Memory(_) => Ok(()),
        }
    }
}
