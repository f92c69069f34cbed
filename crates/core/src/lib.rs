//! Domain types shared by the catalog database and API crates.

pub mod entity;
pub mod error;
pub mod pagination;
pub mod types;
pub mod validation;
pub mod wizard;
