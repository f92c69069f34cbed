//! Product version model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use catalog_core::entity::{EntityKind, ParentRef};
use catalog_core::types::{DbId, Timestamp};

use crate::record::{push_eq, CatalogRecord, ChildRecord, FieldValue, FilterClause, UniqueKey};

/// A row from the `product_versions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVersion {
    pub id: DbId,
    pub product_id: DbId,
    pub version_number: i32,
    pub description: Option<String>,
    pub effective_date: NaiveDate,
    pub change_summary: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductVersion {
    pub product_id: DbId,
    #[validate(range(min = 1))]
    pub version_number: i32,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    pub effective_date: NaiveDate,
    #[validate(length(max = 4000))]
    pub change_summary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductVersion {
    pub product_id: Option<DbId>,
    #[validate(range(min = 1))]
    pub version_number: Option<i32>,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    pub effective_date: Option<NaiveDate>,
    #[validate(length(max = 4000))]
    pub change_summary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionFilter {
    pub product_id: Option<DbId>,
    pub version_number: Option<i32>,
}

impl CatalogRecord for ProductVersion {
    const KIND: EntityKind = EntityKind::Version;
    const FIELDS: &'static [&'static str] = &[
        "product_id",
        "version_number",
        "description",
        "effective_date",
        "change_summary",
    ];
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("versionNumber", "version_number"),
        ("effectiveDate", "effective_date"),
    ];

    type Create = CreateProductVersion;
    type Update = UpdateProductVersion;
    type Filter = VersionFilter;

    fn id(&self) -> DbId {
        self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn from_create(id: DbId, input: CreateProductVersion, now: Timestamp) -> Self {
        Self {
            id,
            product_id: input.product_id,
            version_number: input.version_number,
            description: input.description,
            effective_date: input.effective_date,
            change_summary: input.change_summary,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: UpdateProductVersion, now: Timestamp) {
        if let Some(product_id) = input.product_id {
            self.product_id = product_id;
        }
        if let Some(number) = input.version_number {
            self.version_number = number;
        }
        if input.description.is_some() {
            self.description = input.description;
        }
        if let Some(date) = input.effective_date {
            self.effective_date = date;
        }
        if input.change_summary.is_some() {
            self.change_summary = input.change_summary;
        }
        self.updated_at = now;
    }

    fn field_values(&self) -> Vec<FieldValue> {
        vec![
            self.product_id.into(),
            self.version_number.into(),
            self.description.clone().into(),
            self.effective_date.into(),
            self.change_summary.clone().into(),
        ]
    }

    fn filter_clauses(filter: &VersionFilter) -> Vec<FilterClause> {
        let mut clauses = Vec::new();
        push_eq(&mut clauses, "product_id", filter.product_id);
        push_eq(&mut clauses, "version_number", filter.version_number);
        clauses
    }

    fn parents(&self) -> Vec<ParentRef> {
        vec![ParentRef::cascade(EntityKind::Product, self.product_id)]
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![(
            "uq_product_versions_product_version",
            vec![self.product_id.into(), self.version_number.into()],
        )]
    }
}

impl ChildRecord for ProductVersion {
    const PARENT: EntityKind = EntityKind::Product;
    const PARENT_COLUMN: &'static str = "product_id";
}
