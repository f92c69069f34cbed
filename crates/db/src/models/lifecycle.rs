//! Product lifecycle model and DTOs.
//!
//! Each row records a lifecycle status a product entered and the date it took
//! effect; the history of a product is its rows ordered by that date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use catalog_core::entity::{EntityKind, ParentRef};
use catalog_core::types::{DbId, Timestamp};

use crate::models::enums::LifecycleStatus;
use crate::record::{push_eq, CatalogRecord, ChildRecord, FieldValue, FilterClause};

/// A row from the `product_lifecycles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLifecycle {
    pub id: DbId,
    pub product_id: DbId,
    pub lifecycle_status: LifecycleStatus,
    pub status_effective_date: NaiveDate,
    pub reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductLifecycle {
    pub product_id: DbId,
    pub lifecycle_status: LifecycleStatus,
    pub status_effective_date: NaiveDate,
    #[validate(length(max = 4000))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductLifecycle {
    pub product_id: Option<DbId>,
    pub lifecycle_status: Option<LifecycleStatus>,
    pub status_effective_date: Option<NaiveDate>,
    #[validate(length(max = 4000))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleFilter {
    pub product_id: Option<DbId>,
    pub lifecycle_status: Option<LifecycleStatus>,
}

impl CatalogRecord for ProductLifecycle {
    const KIND: EntityKind = EntityKind::Lifecycle;
    const FIELDS: &'static [&'static str] = &[
        "product_id",
        "lifecycle_status",
        "status_effective_date",
        "reason",
    ];
    const SORTABLE: &'static [(&'static str, &'static str)] =
        &[("statusEffectiveDate", "status_effective_date")];

    type Create = CreateProductLifecycle;
    type Update = UpdateProductLifecycle;
    type Filter = LifecycleFilter;

    fn id(&self) -> DbId {
        self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn from_create(id: DbId, input: CreateProductLifecycle, now: Timestamp) -> Self {
        Self {
            id,
            product_id: input.product_id,
            lifecycle_status: input.lifecycle_status,
            status_effective_date: input.status_effective_date,
            reason: input.reason,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: UpdateProductLifecycle, now: Timestamp) {
        if let Some(product_id) = input.product_id {
            self.product_id = product_id;
        }
        if let Some(status) = input.lifecycle_status {
            self.lifecycle_status = status;
        }
        if let Some(date) = input.status_effective_date {
            self.status_effective_date = date;
        }
        if input.reason.is_some() {
            self.reason = input.reason;
        }
        self.updated_at = now;
    }

    fn field_values(&self) -> Vec<FieldValue> {
        vec![
            self.product_id.into(),
            self.lifecycle_status.into(),
            self.status_effective_date.into(),
            self.reason.clone().into(),
        ]
    }

    fn filter_clauses(filter: &LifecycleFilter) -> Vec<FilterClause> {
        let mut clauses = Vec::new();
        push_eq(&mut clauses, "product_id", filter.product_id);
        push_eq(&mut clauses, "lifecycle_status", filter.lifecycle_status);
        clauses
    }

    fn parents(&self) -> Vec<ParentRef> {
        vec![ParentRef::cascade(EntityKind::Product, self.product_id)]
    }
}

impl ChildRecord for ProductLifecycle {
    const PARENT: EntityKind = EntityKind::Product;
    const PARENT_COLUMN: &'static str = "product_id";
}
