//! Shared query-string parameter types.

use serde::Deserialize;

use catalog_core::error::CoreError;
use catalog_core::pagination::PageRequest;

/// Pagination parameters accepted by every list endpoint:
/// `?page=0&size=20&sort=name,desc`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort: Option<String>,
}

impl PageParams {
    pub fn into_request(self) -> Result<PageRequest, CoreError> {
        PageRequest::new(self.page, self.size, self.sort.as_deref())
    }
}
