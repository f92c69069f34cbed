//! Pagination request/response types used by every list endpoint.
//!
//! Requests are `{page, size, sort}` with a 0-based page index; responses are
//! `{content, totalElements, totalPages, page, size}`.

use serde::Serialize;

use crate::error::CoreError;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum number of rows per page.
pub const MAX_PAGE_SIZE: i64 = 100;

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A requested sort order, as given by the client (`field` is a JSON field name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

/// Parse a `sort` parameter of the form `field` or `field,asc|desc`.
///
/// The direction is case-insensitive and defaults to ascending.
pub fn parse_sort(raw: &str) -> Result<SortOrder, CoreError> {
    let mut parts = raw.split(',').map(str::trim);
    let field = parts.next().unwrap_or_default();
    if field.is_empty() {
        return Err(CoreError::Validation(
            "Sort field must not be empty".to_string(),
        ));
    }

    let direction = match parts.next() {
        None | Some("") => SortDirection::Asc,
        Some(dir) if dir.eq_ignore_ascii_case("asc") => SortDirection::Asc,
        Some(dir) if dir.eq_ignore_ascii_case("desc") => SortDirection::Desc,
        Some(dir) => {
            return Err(CoreError::Validation(format!(
                "Invalid sort direction '{dir}'. Must be 'asc' or 'desc'"
            )))
        }
    };

    if parts.next().is_some() {
        return Err(CoreError::Validation(format!(
            "Invalid sort '{raw}'. Expected 'field' or 'field,direction'"
        )));
    }

    Ok(SortOrder {
        field: field.to_string(),
        direction,
    })
}

/// Resolve a client sort field against a whitelist of `(json_field, column)` pairs.
pub fn resolve_sort_column(
    order: &SortOrder,
    sortable: &[(&'static str, &'static str)],
) -> Result<&'static str, CoreError> {
    sortable
        .iter()
        .find(|(field, _)| *field == order.field)
        .map(|(_, column)| *column)
        .ok_or_else(|| {
            let allowed: Vec<&str> = sortable.iter().map(|(f, _)| *f).collect();
            CoreError::Validation(format!(
                "Cannot sort by '{}'. Sortable fields: {}",
                order.field,
                allowed.join(", ")
            ))
        })
}

// ---------------------------------------------------------------------------
// Page request
// ---------------------------------------------------------------------------

/// A normalized pagination request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
    pub sort: Option<SortOrder>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: None,
        }
    }
}

impl PageRequest {
    /// Build a request from raw query values, clamping page and size.
    pub fn new(page: Option<i64>, size: Option<i64>, sort: Option<&str>) -> Result<Self, CoreError> {
        let sort = match sort.map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_sort(raw)?),
        };
        Ok(Self {
            page: clamp_page(page),
            size: clamp_size(size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
            sort,
        })
    }

    /// Row offset of the first element on this page.
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }
}

/// Clamp a user-provided page size to `[1, max]`.
pub fn clamp_size(size: Option<i64>, default: i64, max: i64) -> i64 {
    size.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided page index to non-negative.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Page response
// ---------------------------------------------------------------------------

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: i64,
    pub total_pages: i64,
    pub page: i64,
    pub size: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: i64, request: &PageRequest) -> Self {
        let total_pages = if total_elements == 0 {
            0
        } else {
            (total_elements + request.size - 1) / request.size
        };
        Self {
            content,
            total_elements,
            total_pages,
            page: request.page,
            size: request.size,
        }
    }
}
