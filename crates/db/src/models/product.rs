//! Product model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use catalog_core::entity::{EntityKind, ParentRef};
use catalog_core::error::CoreError;
use catalog_core::types::{DbId, Timestamp};
use catalog_core::validation::{validate_date_range, validate_optional_currency_code};

use crate::models::enums::{ProductStatus, ProductType};
use crate::record::{
    push_contains, push_eq, CatalogRecord, ChildRecord, FieldValue, FilterClause, UniqueKey,
};

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: DbId,
    pub product_category_id: DbId,
    pub product_subtype_id: Option<DbId>,
    pub name: String,
    pub product_code: String,
    pub description: Option<String>,
    pub product_type: ProductType,
    pub status: ProductStatus,
    pub currency_code: Option<String>,
    pub launch_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub product_category_id: DbId,
    pub product_subtype_id: Option<DbId>,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub product_code: String,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    pub product_type: ProductType,
    /// Defaults to [`ProductStatus::Draft`].
    pub status: Option<ProductStatus>,
    pub currency_code: Option<String>,
    pub launch_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub product_category_id: Option<DbId>,
    pub product_subtype_id: Option<DbId>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub product_code: Option<String>,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    pub product_type: Option<ProductType>,
    pub status: Option<ProductStatus>,
    pub currency_code: Option<String>,
    pub launch_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub name: Option<String>,
    pub product_category_id: Option<DbId>,
    pub product_subtype_id: Option<DbId>,
    pub product_type: Option<ProductType>,
    pub status: Option<ProductStatus>,
    pub currency_code: Option<String>,
}

impl CatalogRecord for Product {
    const KIND: EntityKind = EntityKind::Product;
    const FIELDS: &'static [&'static str] = &[
        "product_category_id",
        "product_subtype_id",
        "name",
        "product_code",
        "description",
        "product_type",
        "status",
        "currency_code",
        "launch_date",
        "end_date",
    ];
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("name", "name"),
        ("productCode", "product_code"),
        ("launchDate", "launch_date"),
        ("endDate", "end_date"),
    ];

    type Create = CreateProduct;
    type Update = UpdateProduct;
    type Filter = ProductFilter;

    fn id(&self) -> DbId {
        self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn from_create(id: DbId, input: CreateProduct, now: Timestamp) -> Self {
        Self {
            id,
            product_category_id: input.product_category_id,
            product_subtype_id: input.product_subtype_id,
            name: input.name,
            product_code: input.product_code,
            description: input.description,
            product_type: input.product_type,
            status: input.status.unwrap_or(ProductStatus::Draft),
            currency_code: input.currency_code,
            launch_date: input.launch_date,
            end_date: input.end_date,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: UpdateProduct, now: Timestamp) {
        if let Some(category_id) = input.product_category_id {
            self.product_category_id = category_id;
        }
        if input.product_subtype_id.is_some() {
            self.product_subtype_id = input.product_subtype_id;
        }
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(code) = input.product_code {
            self.product_code = code;
        }
        if input.description.is_some() {
            self.description = input.description;
        }
        if let Some(product_type) = input.product_type {
            self.product_type = product_type;
        }
        if let Some(status) = input.status {
            self.status = status;
        }
        if input.currency_code.is_some() {
            self.currency_code = input.currency_code;
        }
        if input.launch_date.is_some() {
            self.launch_date = input.launch_date;
        }
        if input.end_date.is_some() {
            self.end_date = input.end_date;
        }
        self.updated_at = now;
    }

    fn field_values(&self) -> Vec<FieldValue> {
        vec![
            self.product_category_id.into(),
            self.product_subtype_id.into(),
            self.name.clone().into(),
            self.product_code.clone().into(),
            self.description.clone().into(),
            self.product_type.into(),
            self.status.into(),
            self.currency_code.clone().into(),
            self.launch_date.into(),
            self.end_date.into(),
        ]
    }

    fn filter_clauses(filter: &ProductFilter) -> Vec<FilterClause> {
        let mut clauses = Vec::new();
        push_contains(&mut clauses, "name", filter.name.as_deref());
        push_eq(&mut clauses, "product_category_id", filter.product_category_id);
        push_eq(&mut clauses, "product_subtype_id", filter.product_subtype_id);
        push_eq(&mut clauses, "product_type", filter.product_type);
        push_eq(&mut clauses, "status", filter.status);
        push_eq(&mut clauses, "currency_code", filter.currency_code.clone());
        clauses
    }

    fn parents(&self) -> Vec<ParentRef> {
        let mut parents = vec![ParentRef::restrict(
            EntityKind::Category,
            self.product_category_id,
        )];
        if let Some(subtype_id) = self.product_subtype_id {
            parents.push(ParentRef::restrict(EntityKind::Subtype, subtype_id));
        }
        parents
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![(
            "uq_products_product_code",
            vec![self.product_code.clone().into()],
        )]
    }

    fn check_invariants(&self) -> Result<(), CoreError> {
        validate_optional_currency_code("currencyCode", self.currency_code.as_deref())?;
        validate_date_range("launchDate", self.launch_date, "endDate", self.end_date)
    }
}

/// Products listed under `/categories/{id}/products`.
impl ChildRecord for Product {
    const PARENT: EntityKind = EntityKind::Category;
    const PARENT_COLUMN: &'static str = "product_category_id";
}
