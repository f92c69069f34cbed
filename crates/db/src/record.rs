//! The generic catalog record abstraction.
//!
//! Every catalog entity implements [`CatalogRecord`], which describes its
//! table layout (column list, sortable fields, parent references, unique
//! keys) and its mapper functions (create DTO → entity, update DTO merged
//! into entity). The repositories in [`crate::repositories`] are written once
//! against this trait.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use validator::Validate;

use catalog_core::entity::{EntityKind, ParentRef};
use catalog_core::error::CoreError;
use catalog_core::pagination::{PageRequest, SortDirection};
use catalog_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Field values
// ---------------------------------------------------------------------------

/// A single column value, used for binding, filtering and in-memory sorting.
///
/// `Null` is declared last so that it orders after every other value, which
/// matches PostgreSQL's default `NULLS LAST` for ascending sorts.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum FieldValue {
    Bool(bool),
    Int(i32),
    Text(String),
    Uuid(DbId),
    Date(NaiveDate),
    Decimal(Decimal),
    Timestamp(Timestamp),
    /// A PostgreSQL enum value, bound as text and cast to `type_name`.
    Enum {
        type_name: &'static str,
        label: &'static str,
    },
    Null,
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<DbId> for FieldValue {
    fn from(v: DbId) -> Self {
        Self::Uuid(v)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<Decimal> for FieldValue {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<Timestamp> for FieldValue {
    fn from(v: Timestamp) -> Self {
        Self::Timestamp(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// A Rust enum stored in a PostgreSQL enum column.
pub trait PgEnum: Copy {
    /// Name of the PostgreSQL type.
    const TYPE_NAME: &'static str;

    /// Database label of this variant.
    fn as_str(self) -> &'static str;

    fn field_value(self) -> FieldValue {
        FieldValue::Enum {
            type_name: Self::TYPE_NAME,
            label: self.as_str(),
        }
    }
}

// ---------------------------------------------------------------------------
// Filters and list queries
// ---------------------------------------------------------------------------

/// One `AND`-ed condition of a list query. Column names are always static
/// identifiers declared by the entity module, never client input.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    /// `column = value` (`IS NULL` for [`FieldValue::Null`]).
    Eq {
        column: &'static str,
        value: FieldValue,
    },
    /// Case-insensitive substring match on a text column.
    Contains {
        column: &'static str,
        needle: String,
    },
}

impl FilterClause {
    pub fn eq(column: &'static str, value: impl Into<FieldValue>) -> Self {
        Self::Eq {
            column,
            value: value.into(),
        }
    }

    pub fn contains(column: &'static str, needle: impl Into<String>) -> Self {
        Self::Contains {
            column,
            needle: needle.into(),
        }
    }
}

/// Push an equality clause for every `Some` value.
pub fn push_eq(
    clauses: &mut Vec<FilterClause>,
    column: &'static str,
    value: Option<impl Into<FieldValue>>,
) {
    if let Some(value) = value {
        clauses.push(FilterClause::eq(column, value));
    }
}

/// Push a substring clause for a non-blank needle.
pub fn push_contains(clauses: &mut Vec<FilterClause>, column: &'static str, needle: Option<&str>) {
    if let Some(needle) = needle.map(str::trim).filter(|n| !n.is_empty()) {
        clauses.push(FilterClause::contains(column, needle));
    }
}

/// A fully resolved list query: filters, sort column and page window.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub filters: Vec<FilterClause>,
    /// Resolved column and direction; `None` means newest first.
    pub sort: Option<(&'static str, SortDirection)>,
    pub page: PageRequest,
}

impl ListQuery {
    pub fn new(filters: Vec<FilterClause>, page: PageRequest) -> Self {
        Self {
            filters,
            sort: None,
            page,
        }
    }
}

/// A named unique constraint and the values it covers for one row.
pub type UniqueKey = (&'static str, Vec<FieldValue>);

// ---------------------------------------------------------------------------
// The record trait
// ---------------------------------------------------------------------------

/// Columns every catalog table carries in addition to [`CatalogRecord::FIELDS`].
pub const COMMON_SORTABLE: &[(&str, &str)] = &[
    ("id", "id"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];

/// A catalog entity: one table row plus its create/update DTOs.
pub trait CatalogRecord:
    for<'r> FromRow<'r, PgRow> + Serialize + Clone + Send + Sync + Unpin + 'static
{
    const KIND: EntityKind;

    /// Data columns, excluding `id`, `created_at` and `updated_at`, in the
    /// order [`CatalogRecord::field_values`] returns them.
    const FIELDS: &'static [&'static str];

    /// Entity-specific `(json_field, column)` pairs clients may sort by,
    /// in addition to [`COMMON_SORTABLE`].
    const SORTABLE: &'static [(&'static str, &'static str)];

    type Create: DeserializeOwned + Validate + Send + Sync + 'static;
    type Update: DeserializeOwned + Validate + Send + Sync + 'static;
    type Filter: DeserializeOwned + Default + Send + Sync + 'static;

    fn id(&self) -> DbId;
    fn created_at(&self) -> Timestamp;
    fn updated_at(&self) -> Timestamp;

    /// Map a create DTO to a new entity.
    fn from_create(id: DbId, input: Self::Create, now: Timestamp) -> Self;

    /// Merge an update DTO into the entity. Absent fields keep their value.
    fn apply_update(&mut self, input: Self::Update, now: Timestamp);

    /// Values of [`CatalogRecord::FIELDS`], in the same order.
    fn field_values(&self) -> Vec<FieldValue>;

    /// Translate the entity's query-string filter into clauses.
    fn filter_clauses(filter: &Self::Filter) -> Vec<FilterClause>;

    /// Rows this row references.
    fn parents(&self) -> Vec<ParentRef> {
        Vec::new()
    }

    /// Unique constraints this row participates in.
    fn unique_keys(&self) -> Vec<UniqueKey> {
        Vec::new()
    }

    /// Cross-field rules that must hold after mapping or merging.
    fn check_invariants(&self) -> Result<(), CoreError> {
        Ok(())
    }

    /// Value of any column of this row, by column name.
    fn column_value(&self, column: &str) -> FieldValue {
        match column {
            "id" => FieldValue::Uuid(self.id()),
            "created_at" => FieldValue::Timestamp(self.created_at()),
            "updated_at" => FieldValue::Timestamp(self.updated_at()),
            _ => Self::FIELDS
                .iter()
                .position(|field| *field == column)
                .map(|idx| self.field_values().swap_remove(idx))
                .unwrap_or(FieldValue::Null),
        }
    }

    /// All sortable `(json_field, column)` pairs.
    fn sortable_fields() -> Vec<(&'static str, &'static str)> {
        COMMON_SORTABLE
            .iter()
            .chain(Self::SORTABLE.iter())
            .copied()
            .collect()
    }
}

/// A record owned by a single parent row, listable under the parent's route.
pub trait ChildRecord: CatalogRecord {
    const PARENT: EntityKind;
    const PARENT_COLUMN: &'static str;
}

/// Full `SELECT` column list for a record type.
pub fn select_columns<T: CatalogRecord>() -> String {
    let mut columns = Vec::with_capacity(T::FIELDS.len() + 3);
    columns.push("id");
    columns.extend_from_slice(T::FIELDS);
    columns.push("created_at");
    columns.push("updated_at");
    columns.join(", ")
}
