//! Product bundle and bundle item models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use catalog_core::entity::{EntityKind, ParentRef};
use catalog_core::error::CoreError;
use catalog_core::types::{DbId, Timestamp};
use catalog_core::validation::validate_date_range;

use crate::models::enums::BundleStatus;
use crate::record::{
    push_contains, push_eq, CatalogRecord, ChildRecord, FieldValue, FilterClause, UniqueKey,
};

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// A row from the `product_bundles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductBundle {
    pub id: DbId,
    pub name: String,
    pub bundle_code: String,
    pub description: Option<String>,
    pub status: BundleStatus,
    pub effective_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductBundle {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub bundle_code: String,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    /// Defaults to [`BundleStatus::Draft`].
    pub status: Option<BundleStatus>,
    pub effective_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductBundle {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub bundle_code: Option<String>,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    pub status: Option<BundleStatus>,
    pub effective_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleFilter {
    pub name: Option<String>,
    pub status: Option<BundleStatus>,
}

impl CatalogRecord for ProductBundle {
    const KIND: EntityKind = EntityKind::Bundle;
    const FIELDS: &'static [&'static str] = &[
        "name",
        "bundle_code",
        "description",
        "status",
        "effective_date",
        "expiration_date",
    ];
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("name", "name"),
        ("bundleCode", "bundle_code"),
        ("effectiveDate", "effective_date"),
    ];

    type Create = CreateProductBundle;
    type Update = UpdateProductBundle;
    type Filter = BundleFilter;

    fn id(&self) -> DbId {
        self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn from_create(id: DbId, input: CreateProductBundle, now: Timestamp) -> Self {
        Self {
            id,
            name: input.name,
            bundle_code: input.bundle_code,
            description: input.description,
            status: input.status.unwrap_or(BundleStatus::Draft),
            effective_date: input.effective_date,
            expiration_date: input.expiration_date,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: UpdateProductBundle, now: Timestamp) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(code) = input.bundle_code {
            self.bundle_code = code;
        }
        if input.description.is_some() {
            self.description = input.description;
        }
        if let Some(status) = input.status {
            self.status = status;
        }
        if input.effective_date.is_some() {
            self.effective_date = input.effective_date;
        }
        if input.expiration_date.is_some() {
            self.expiration_date = input.expiration_date;
        }
        self.updated_at = now;
    }

    fn field_values(&self) -> Vec<FieldValue> {
        vec![
            self.name.clone().into(),
            self.bundle_code.clone().into(),
            self.description.clone().into(),
            self.status.into(),
            self.effective_date.into(),
            self.expiration_date.into(),
        ]
    }

    fn filter_clauses(filter: &BundleFilter) -> Vec<FilterClause> {
        let mut clauses = Vec::new();
        push_contains(&mut clauses, "name", filter.name.as_deref());
        push_eq(&mut clauses, "status", filter.status);
        clauses
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![(
            "uq_product_bundles_bundle_code",
            vec![self.bundle_code.clone().into()],
        )]
    }

    fn check_invariants(&self) -> Result<(), CoreError> {
        validate_date_range(
            "effectiveDate",
            self.effective_date,
            "expirationDate",
            self.expiration_date,
        )
    }
}

// ---------------------------------------------------------------------------
// Bundle item
// ---------------------------------------------------------------------------

/// A row from the `bundle_items` table: membership of a product in a bundle.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleItem {
    pub id: DbId,
    pub bundle_id: DbId,
    pub product_id: DbId,
    pub is_mandatory: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBundleItem {
    pub bundle_id: DbId,
    pub product_id: DbId,
    pub is_mandatory: Option<bool>,
    #[validate(range(min = 0))]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBundleItem {
    pub bundle_id: Option<DbId>,
    pub product_id: Option<DbId>,
    pub is_mandatory: Option<bool>,
    #[validate(range(min = 0))]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleItemFilter {
    pub bundle_id: Option<DbId>,
    pub product_id: Option<DbId>,
    pub is_mandatory: Option<bool>,
}

impl CatalogRecord for BundleItem {
    const KIND: EntityKind = EntityKind::BundleItem;
    const FIELDS: &'static [&'static str] =
        &["bundle_id", "product_id", "is_mandatory", "sort_order"];
    const SORTABLE: &'static [(&'static str, &'static str)] = &[("sortOrder", "sort_order")];

    type Create = CreateBundleItem;
    type Update = UpdateBundleItem;
    type Filter = BundleItemFilter;

    fn id(&self) -> DbId {
        self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn from_create(id: DbId, input: CreateBundleItem, now: Timestamp) -> Self {
        Self {
            id,
            bundle_id: input.bundle_id,
            product_id: input.product_id,
            is_mandatory: input.is_mandatory.unwrap_or(false),
            sort_order: input.sort_order.unwrap_or(0),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: UpdateBundleItem, now: Timestamp) {
        if let Some(bundle_id) = input.bundle_id {
            self.bundle_id = bundle_id;
        }
        if let Some(product_id) = input.product_id {
            self.product_id = product_id;
        }
        if let Some(mandatory) = input.is_mandatory {
            self.is_mandatory = mandatory;
        }
        if let Some(order) = input.sort_order {
            self.sort_order = order;
        }
        self.updated_at = now;
    }

    fn field_values(&self) -> Vec<FieldValue> {
        vec![
            self.bundle_id.into(),
            self.product_id.into(),
            self.is_mandatory.into(),
            self.sort_order.into(),
        ]
    }

    fn filter_clauses(filter: &BundleItemFilter) -> Vec<FilterClause> {
        let mut clauses = Vec::new();
        push_eq(&mut clauses, "bundle_id", filter.bundle_id);
        push_eq(&mut clauses, "product_id", filter.product_id);
        push_eq(&mut clauses, "is_mandatory", filter.is_mandatory);
        clauses
    }

    fn parents(&self) -> Vec<ParentRef> {
        vec![
            ParentRef::cascade(EntityKind::Bundle, self.bundle_id),
            ParentRef::cascade(EntityKind::Product, self.product_id),
        ]
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![(
            "uq_bundle_items_bundle_product",
            vec![self.bundle_id.into(), self.product_id.into()],
        )]
    }
}

impl ChildRecord for BundleItem {
    const PARENT: EntityKind = EntityKind::Bundle;
    const PARENT_COLUMN: &'static str = "bundle_id";
}
