//! Storage-level errors.

/// Errors returned by the catalog repositories.
///
/// sqlx errors are classified on conversion so that constraint violations
/// surface the same way from the PostgreSQL and in-memory stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint was violated. Holds the constraint name.
    #[error("Duplicate value violates unique constraint: {0}")]
    UniqueViolation(String),

    /// A foreign-key style reference was violated (missing parent on write,
    /// or a restricting child still present on delete).
    #[error("Reference violation: {0}")]
    ReferenceViolation(String),

    /// Any other database error.
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// An internal inconsistency in the store itself.
    #[error("Store error: {0}")]
    Internal(String),
}

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => return Self::UniqueViolation(constraint),
                Some(FOREIGN_KEY_VIOLATION) => {
                    return Self::ReferenceViolation(format!(
                        "constraint {constraint}: {}",
                        db_err.message()
                    ))
                }
                _ => {}
            }
        }
        Self::Database(err)
    }
}
