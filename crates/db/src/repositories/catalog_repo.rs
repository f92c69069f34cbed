//! PostgreSQL repository for every catalog table.
//!
//! Queries are assembled with [`QueryBuilder`] from the static column lists
//! declared by each [`CatalogRecord`]; every value is a bind parameter.

use sqlx::{PgPool, Postgres, QueryBuilder};

use catalog_core::entity::EntityKind;
use catalog_core::pagination::Page;
use catalog_core::types::DbId;

use crate::record::{select_columns, CatalogRecord, FieldValue, FilterClause, ListQuery};

/// Provides CRUD operations for any [`CatalogRecord`].
pub struct CatalogRepo;

impl CatalogRepo {
    /// Insert a new row, returning the stored row.
    pub async fn create<T: CatalogRecord>(pool: &PgPool, record: &T) -> Result<T, sqlx::Error> {
        let columns = select_columns::<T>();
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "INSERT INTO {} ({columns}) VALUES (",
            T::KIND.table()
        ));
        qb.push_bind(record.id());
        for value in record.field_values() {
            qb.push(", ");
            push_value(&mut qb, value);
        }
        qb.push(", ")
            .push_bind(record.created_at())
            .push(", ")
            .push_bind(record.updated_at())
            .push(format!(") RETURNING {columns}"));

        qb.build_query_as::<T>().fetch_one(pool).await
    }

    /// Find a row by its ID.
    pub async fn find_by_id<T: CatalogRecord>(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<T>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1",
            select_columns::<T>(),
            T::KIND.table()
        );
        sqlx::query_as::<_, T>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Check whether a row of the given kind exists.
    pub async fn exists(pool: &PgPool, kind: EntityKind, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            kind.table()
        );
        sqlx::query_scalar::<_, bool>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List one page of rows matching the query's filters.
    pub async fn list<T: CatalogRecord>(
        pool: &PgPool,
        query: &ListQuery,
    ) -> Result<Page<T>, sqlx::Error> {
        let table = T::KIND.table();

        let mut count = QueryBuilder::<Postgres>::new(format!(
            "SELECT COUNT(*) FROM {table} WHERE TRUE"
        ));
        push_filters(&mut count, &query.filters);
        let (total,): (i64,) = count.build_query_as().fetch_one(pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM {table} WHERE TRUE",
            select_columns::<T>()
        ));
        push_filters(&mut select, &query.filters);
        match query.sort {
            Some((column, direction)) => {
                select.push(format!(" ORDER BY {column} {}, id ASC", direction.as_sql()));
            }
            None => {
                select.push(" ORDER BY created_at DESC, id DESC");
            }
        }
        select
            .push(" LIMIT ")
            .push_bind(query.page.size)
            .push(" OFFSET ")
            .push_bind(query.page.offset());

        let content = select.build_query_as::<T>().fetch_all(pool).await?;
        Ok(Page::new(content, total, &query.page))
    }

    /// Overwrite every data column of an existing row.
    ///
    /// Returns `None` if no row with the record's ID exists.
    pub async fn update<T: CatalogRecord>(
        pool: &PgPool,
        record: &T,
    ) -> Result<Option<T>, sqlx::Error> {
        let columns = select_columns::<T>();
        let mut qb = QueryBuilder::<Postgres>::new(format!("UPDATE {} SET ", T::KIND.table()));
        for (idx, (column, value)) in T::FIELDS.iter().zip(record.field_values()).enumerate() {
            if idx > 0 {
                qb.push(", ");
            }
            qb.push(*column).push(" = ");
            push_value(&mut qb, value);
        }
        qb.push(", updated_at = ")
            .push_bind(record.updated_at())
            .push(" WHERE id = ")
            .push_bind(record.id())
            .push(format!(" RETURNING {columns}"));

        qb.build_query_as::<T>().fetch_optional(pool).await
    }

    /// Delete a row by ID. Returns `true` if a row was removed.
    ///
    /// Owned children go with it through `ON DELETE CASCADE`; restricting
    /// references make the statement fail with a foreign-key violation.
    pub async fn delete(pool: &PgPool, kind: EntityKind, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Append a value as a bind parameter (or a literal `NULL`).
fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: FieldValue) {
    match value {
        FieldValue::Bool(v) => {
            qb.push_bind(v);
        }
        FieldValue::Int(v) => {
            qb.push_bind(v);
        }
        FieldValue::Text(v) => {
            qb.push_bind(v);
        }
        FieldValue::Uuid(v) => {
            qb.push_bind(v);
        }
        FieldValue::Date(v) => {
            qb.push_bind(v);
        }
        FieldValue::Decimal(v) => {
            qb.push_bind(v);
        }
        FieldValue::Timestamp(v) => {
            qb.push_bind(v);
        }
        FieldValue::Enum { type_name, label } => {
            qb.push_bind(label).push(format!("::{type_name}"));
        }
        FieldValue::Null => {
            qb.push("NULL");
        }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &[FilterClause]) {
    for clause in filters {
        qb.push(" AND ");
        match clause {
            FilterClause::Eq {
                column,
                value: FieldValue::Null,
            } => {
                qb.push(*column).push(" IS NULL");
            }
            FilterClause::Eq { column, value } => {
                qb.push(*column).push(" = ");
                push_value(qb, value.clone());
            }
            FilterClause::Contains { column, needle } => {
                qb.push(*column)
                    .push(" ILIKE ")
                    .push_bind(format!("%{}%", escape_like(needle)));
            }
        }
    }
}

/// Escape `LIKE` wildcards so the needle matches literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
