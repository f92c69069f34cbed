//! Product limit model and DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use catalog_core::entity::{EntityKind, ParentRef};
use catalog_core::error::CoreError;
use catalog_core::types::{DbId, Timestamp};
use catalog_core::validation::{
    validate_amount, validate_bounds, validate_non_negative, validate_optional_currency_code,
};

use crate::models::enums::LimitType;
use crate::record::{push_eq, CatalogRecord, ChildRecord, FieldValue, FilterClause};

/// A row from the `product_limits` table.
///
/// `min_value`/`max_value` are monetary amounts or counts depending on
/// `limit_type`; `time_period` is a free-form window such as `"DAILY"`.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLimit {
    pub id: DbId,
    pub product_id: DbId,
    pub limit_type: LimitType,
    pub min_value: Option<Decimal>,
    pub max_value: Option<Decimal>,
    pub currency_code: Option<String>,
    pub time_period: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductLimit {
    pub product_id: DbId,
    pub limit_type: LimitType,
    pub min_value: Option<Decimal>,
    pub max_value: Option<Decimal>,
    pub currency_code: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub time_period: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductLimit {
    pub product_id: Option<DbId>,
    pub limit_type: Option<LimitType>,
    pub min_value: Option<Decimal>,
    pub max_value: Option<Decimal>,
    pub currency_code: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub time_period: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitFilter {
    pub product_id: Option<DbId>,
    pub limit_type: Option<LimitType>,
}

impl CatalogRecord for ProductLimit {
    const KIND: EntityKind = EntityKind::Limit;
    const FIELDS: &'static [&'static str] = &[
        "product_id",
        "limit_type",
        "min_value",
        "max_value",
        "currency_code",
        "time_period",
    ];
    const SORTABLE: &'static [(&'static str, &'static str)] =
        &[("minValue", "min_value"), ("maxValue", "max_value")];

    type Create = CreateProductLimit;
    type Update = UpdateProductLimit;
    type Filter = LimitFilter;

    fn id(&self) -> DbId {
        self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn from_create(id: DbId, input: CreateProductLimit, now: Timestamp) -> Self {
        Self {
            id,
            product_id: input.product_id,
            limit_type: input.limit_type,
            min_value: input.min_value,
            max_value: input.max_value,
            currency_code: input.currency_code,
            time_period: input.time_period,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: UpdateProductLimit, now: Timestamp) {
        if let Some(product_id) = input.product_id {
            self.product_id = product_id;
        }
        if let Some(limit_type) = input.limit_type {
            self.limit_type = limit_type;
        }
        if input.min_value.is_some() {
            self.min_value = input.min_value;
        }
        if input.max_value.is_some() {
            self.max_value = input.max_value;
        }
        if input.currency_code.is_some() {
            self.currency_code = input.currency_code;
        }
        if input.time_period.is_some() {
            self.time_period = input.time_period;
        }
        self.updated_at = now;
    }

    fn field_values(&self) -> Vec<FieldValue> {
        vec![
            self.product_id.into(),
            self.limit_type.into(),
            self.min_value.into(),
            self.max_value.into(),
            self.currency_code.clone().into(),
            self.time_period.clone().into(),
        ]
    }

    fn filter_clauses(filter: &LimitFilter) -> Vec<FilterClause> {
        let mut clauses = Vec::new();
        push_eq(&mut clauses, "product_id", filter.product_id);
        push_eq(&mut clauses, "limit_type", filter.limit_type);
        clauses
    }

    fn parents(&self) -> Vec<ParentRef> {
        vec![ParentRef::cascade(EntityKind::Product, self.product_id)]
    }

    fn check_invariants(&self) -> Result<(), CoreError> {
        validate_non_negative("minValue", self.min_value)?;
        validate_non_negative("maxValue", self.max_value)?;
        validate_amount("minValue", self.min_value)?;
        validate_amount("maxValue", self.max_value)?;
        validate_bounds("minValue", self.min_value, "maxValue", self.max_value)?;
        validate_optional_currency_code("currencyCode", self.currency_code.as_deref())
    }
}

impl ChildRecord for ProductLimit {
    const PARENT: EntityKind = EntityKind::Product;
    const PARENT_COLUMN: &'static str = "product_id";
}
