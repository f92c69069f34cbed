//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) merged into the row
//! - A query-string filter and the [`crate::record::CatalogRecord`] impl

pub mod bundle;
pub mod category;
pub mod documentation;
pub mod enums;
pub mod feature;
pub mod fee;
pub mod lifecycle;
pub mod limit;
pub mod localization;
pub mod pricing;
pub mod product;
pub mod relationship;
pub mod version;
