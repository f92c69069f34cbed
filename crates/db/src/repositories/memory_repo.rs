//! In-memory catalog store.
//!
//! Holds one typed table per [`EntityKind`] behind a single async `RwLock`.
//! Emulates the constraints the PostgreSQL schema enforces: unique keys,
//! parent existence on write, `RESTRICT` and `CASCADE` on delete. Used for
//! local runs without a database and by the API tests.

use std::any::Any;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use tokio::sync::RwLock;

use catalog_core::entity::{EntityKind, OnDelete};
use catalog_core::pagination::{Page, SortDirection};
use catalog_core::types::DbId;

use crate::error::StoreError;
use crate::record::{CatalogRecord, FieldValue, FilterClause, ListQuery};

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Type-erased view of a table, used for cross-table reference checks.
trait ErasedTable: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn contains(&self, id: DbId) -> bool;
    /// Rows of this table referencing the given parent row.
    fn references_to(&self, parent: EntityKind, parent_id: DbId) -> Vec<(DbId, OnDelete)>;
    fn remove(&mut self, id: DbId) -> bool;
}

struct Table<T> {
    rows: BTreeMap<DbId, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<T: CatalogRecord> ErasedTable for Table<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn contains(&self, id: DbId) -> bool {
        self.rows.contains_key(&id)
    }

    fn references_to(&self, parent: EntityKind, parent_id: DbId) -> Vec<(DbId, OnDelete)> {
        self.rows
            .values()
            .flat_map(|row| {
                row.parents()
                    .into_iter()
                    .filter(|p| p.kind == parent && p.id == parent_id)
                    .map(move |p| (row.id(), p.on_delete))
            })
            .collect()
    }

    fn remove(&mut self, id: DbId) -> bool {
        self.rows.remove(&id).is_some()
    }
}

type Tables = HashMap<EntityKind, Box<dyn ErasedTable>>;

fn table<T: CatalogRecord>(tables: &Tables) -> Result<Option<&Table<T>>, StoreError> {
    match tables.get(&T::KIND) {
        None => Ok(None),
        Some(t) => t
            .as_any()
            .downcast_ref::<Table<T>>()
            .map(Some)
            .ok_or_else(|| type_mismatch::<T>()),
    }
}

fn table_mut<T: CatalogRecord>(tables: &mut Tables) -> Result<&mut Table<T>, StoreError> {
    tables
        .entry(T::KIND)
        .or_insert_with(|| Box::new(Table::<T>::default()))
        .as_any_mut()
        .downcast_mut::<Table<T>>()
        .ok_or_else(|| type_mismatch::<T>())
}

fn type_mismatch<T: CatalogRecord>() -> StoreError {
    StoreError::Internal(format!(
        "table {} registered with a different record type",
        T::KIND.table()
    ))
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Thread-safe in-memory implementation of the catalog repositories.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create<T: CatalogRecord>(&self, record: &T) -> Result<T, StoreError> {
        let mut tables = self.tables.write().await;
        check_parents(&tables, record)?;
        let table = table_mut::<T>(&mut tables)?;
        if table.rows.contains_key(&record.id()) {
            return Err(StoreError::UniqueViolation(format!(
                "{}_pkey",
                T::KIND.table()
            )));
        }
        check_unique(table, record)?;
        table.rows.insert(record.id(), record.clone());
        Ok(record.clone())
    }

    pub async fn find_by_id<T: CatalogRecord>(&self, id: DbId) -> Result<Option<T>, StoreError> {
        let tables = self.tables.read().await;
        Ok(table::<T>(&tables)?.and_then(|t| t.rows.get(&id).cloned()))
    }

    pub async fn exists(&self, kind: EntityKind, id: DbId) -> Result<bool, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.get(&kind).is_some_and(|t| t.contains(id)))
    }

    pub async fn list<T: CatalogRecord>(&self, query: &ListQuery) -> Result<Page<T>, StoreError> {
        let tables = self.tables.read().await;
        let Some(table) = table::<T>(&tables)? else {
            return Ok(Page::new(Vec::new(), 0, &query.page));
        };

        let mut matching: Vec<&T> = table
            .rows
            .values()
            .filter(|row| query.filters.iter().all(|clause| row_matches(*row, clause)))
            .collect();
        let total = matching.len() as i64;

        match query.sort {
            Some((column, direction)) => matching.sort_by(|a, b| {
                let ord = compare(&a.column_value(column), &b.column_value(column));
                let ord = match direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                };
                ord.then_with(|| a.id().cmp(&b.id()))
            }),
            None => matching.sort_by(|a, b| {
                b.created_at()
                    .cmp(&a.created_at())
                    .then_with(|| b.id().cmp(&a.id()))
            }),
        }

        let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(query.page.size).unwrap_or(0);
        let content = matching
            .into_iter()
            .skip(offset)
            .take(size)
            .cloned()
            .collect();

        Ok(Page::new(content, total, &query.page))
    }

    pub async fn update<T: CatalogRecord>(&self, record: &T) -> Result<Option<T>, StoreError> {
        let mut tables = self.tables.write().await;
        check_parents(&tables, record)?;
        let table = table_mut::<T>(&mut tables)?;
        if !table.rows.contains_key(&record.id()) {
            return Ok(None);
        }
        check_unique(table, record)?;
        table.rows.insert(record.id(), record.clone());
        Ok(Some(record.clone()))
    }

    /// Delete a row and everything cascading from it.
    ///
    /// Fails without removing anything if a row outside the cascade set
    /// references a row inside it with `RESTRICT`.
    pub async fn delete(&self, kind: EntityKind, id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.get(&kind).is_some_and(|t| t.contains(id)) {
            return Ok(false);
        }

        // Collect the cascade closure.
        let mut doomed: HashSet<(EntityKind, DbId)> = HashSet::from([(kind, id)]);
        let mut queue = VecDeque::from([(kind, id)]);
        while let Some((parent_kind, parent_id)) = queue.pop_front() {
            for (child_kind, child_table) in tables.iter() {
                for (child_id, on_delete) in child_table.references_to(parent_kind, parent_id) {
                    if on_delete == OnDelete::Cascade && doomed.insert((*child_kind, child_id)) {
                        queue.push_back((*child_kind, child_id));
                    }
                }
            }
        }

        // Any restricting reference from outside the closure blocks the delete.
        for (parent_kind, parent_id) in &doomed {
            for (child_kind, child_table) in tables.iter() {
                for (child_id, on_delete) in child_table.references_to(*parent_kind, *parent_id) {
                    if on_delete == OnDelete::Restrict && !doomed.contains(&(*child_kind, child_id)) {
                        return Err(StoreError::ReferenceViolation(format!(
                            "{} {parent_id} is still referenced by {} {child_id}",
                            parent_kind.label(),
                            child_kind.label()
                        )));
                    }
                }
            }
        }

        for (doomed_kind, doomed_id) in &doomed {
            if let Some(t) = tables.get_mut(doomed_kind) {
                t.remove(*doomed_id);
            }
        }
        tracing::debug!(
            entity = kind.label(),
            %id,
            removed = doomed.len(),
            "Deleted row with cascade"
        );
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Constraint emulation
// ---------------------------------------------------------------------------

fn check_parents<T: CatalogRecord>(tables: &Tables, record: &T) -> Result<(), StoreError> {
    for parent in record.parents() {
        let present = tables.get(&parent.kind).is_some_and(|t| t.contains(parent.id));
        if !present {
            return Err(StoreError::ReferenceViolation(format!(
                "{} references missing {} {}",
                T::KIND.label(),
                parent.kind.label(),
                parent.id
            )));
        }
    }
    Ok(())
}

fn check_unique<T: CatalogRecord>(table: &Table<T>, record: &T) -> Result<(), StoreError> {
    for (constraint, values) in record.unique_keys() {
        let clash = table.rows.values().any(|other| {
            other.id() != record.id()
                && other
                    .unique_keys()
                    .into_iter()
                    .any(|(name, other_values)| name == constraint && other_values == values)
        });
        if clash {
            return Err(StoreError::UniqueViolation(constraint.to_string()));
        }
    }
    Ok(())
}

fn row_matches<T: CatalogRecord>(row: &T, clause: &FilterClause) -> bool {
    match clause {
        FilterClause::Eq { column, value } => row.column_value(column) == *value,
        FilterClause::Contains { column, needle } => match row.column_value(column) {
            FieldValue::Text(text) => text.to_lowercase().contains(&needle.to_lowercase()),
            _ => false,
        },
    }
}

fn compare(a: &FieldValue, b: &FieldValue) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}
