//! Generic catalog service.
//!
//! Every catalog entity goes through the same pipeline: DTO validation,
//! mapping, invariant checks, parent existence checks, then the store.
//! Handlers stay thin and only translate HTTP to these calls.

use catalog_core::error::CoreError;
use catalog_core::pagination::{resolve_sort_column, Page, PageRequest};
use catalog_core::types::{new_id, DbId};
use catalog_core::validation::validate_input;
use catalog_db::record::{CatalogRecord, ChildRecord, FilterClause, ListQuery};
use catalog_db::CatalogStore;

use crate::error::{AppError, AppResult};

/// CRUD operations over any [`CatalogRecord`], backed by a [`CatalogStore`].
pub struct CatalogService<'a> {
    store: &'a CatalogStore,
}

impl<'a> CatalogService<'a> {
    pub fn new(store: &'a CatalogStore) -> Self {
        Self { store }
    }

    /// Validate, map and insert a new record.
    pub async fn create<T: CatalogRecord>(&self, input: T::Create) -> AppResult<T> {
        validate_input(&input)?;
        let record = T::from_create(new_id(), input, chrono::Utc::now());
        record.check_invariants()?;
        self.ensure_parents(&record).await?;

        let created = self.store.insert(&record).await?;
        tracing::info!(entity = T::KIND.label(), id = %created.id(), "Record created");
        Ok(created)
    }

    pub async fn get<T: CatalogRecord>(&self, id: DbId) -> AppResult<T> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found::<T>(id))
    }

    /// One page of records matching `filter`.
    pub async fn list<T: CatalogRecord>(
        &self,
        page: PageRequest,
        filter: &T::Filter,
    ) -> AppResult<Page<T>> {
        let query = list_query::<T>(T::filter_clauses(filter), page)?;
        Ok(self.store.list(&query).await?)
    }

    /// One page of the records belonging to a parent row.
    ///
    /// Fails with not-found if the parent itself does not exist.
    pub async fn list_by_parent<T: ChildRecord>(
        &self,
        parent_id: DbId,
        page: PageRequest,
        filter: &T::Filter,
    ) -> AppResult<Page<T>> {
        if !self.store.exists(T::PARENT, parent_id).await? {
            return Err(CoreError::NotFound {
                entity: T::PARENT.label(),
                id: parent_id,
            }
            .into());
        }

        let mut filters = vec![FilterClause::eq(T::PARENT_COLUMN, parent_id)];
        filters.extend(T::filter_clauses(filter));
        let query = list_query::<T>(filters, page)?;
        Ok(self.store.list(&query).await?)
    }

    /// Merge `input` into an existing record. Absent fields keep their value.
    pub async fn update<T: CatalogRecord>(&self, id: DbId, input: T::Update) -> AppResult<T> {
        validate_input(&input)?;
        let mut record: T = self.get(id).await?;
        record.apply_update(input, chrono::Utc::now());
        record.check_invariants()?;
        self.ensure_parents(&record).await?;

        let updated = self
            .store
            .save(&record)
            .await?
            .ok_or_else(|| not_found::<T>(id))?;
        tracing::info!(entity = T::KIND.label(), %id, "Record updated");
        Ok(updated)
    }

    /// Delete a record and the rows it owns.
    ///
    /// Fails with a conflict while restricting references remain.
    pub async fn delete<T: CatalogRecord>(&self, id: DbId) -> AppResult<()> {
        if !self.store.exists(T::KIND, id).await? {
            return Err(not_found::<T>(id));
        }
        if !self.store.delete(T::KIND, id).await? {
            return Err(not_found::<T>(id));
        }
        tracing::info!(entity = T::KIND.label(), %id, "Record deleted");
        Ok(())
    }

    async fn ensure_parents<T: CatalogRecord>(&self, record: &T) -> AppResult<()> {
        for parent in record.parents() {
            if !self.store.exists(parent.kind, parent.id).await? {
                return Err(CoreError::NotFound {
                    entity: parent.kind.label(),
                    id: parent.id,
                }
                .into());
            }
        }
        Ok(())
    }
}

fn not_found<T: CatalogRecord>(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: T::KIND.label(),
        id,
    })
}

/// Resolve the requested sort against the entity's whitelist.
fn list_query<T: CatalogRecord>(
    filters: Vec<FilterClause>,
    page: PageRequest,
) -> Result<ListQuery, CoreError> {
    let sort = match &page.sort {
        Some(order) => Some((
            resolve_sort_column(order, &T::sortable_fields())?,
            order.direction,
        )),
        None => None,
    };
    let mut query = ListQuery::new(filters, page);
    query.sort = sort;
    Ok(query)
}
