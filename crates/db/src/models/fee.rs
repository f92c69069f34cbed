//! Fee structure and fee component models and DTOs.
//!
//! A fee structure groups the fee components charged for a product over an
//! effective date window.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use catalog_core::entity::{EntityKind, ParentRef};
use catalog_core::error::CoreError;
use catalog_core::types::{DbId, Timestamp};
use catalog_core::validation::{
    validate_amount, validate_bounds, validate_date_range, validate_non_negative,
    validate_optional_currency_code, validate_rate,
};

use crate::models::enums::{CalculationMethod, FeeFrequency, FeeStructureType, FeeType};
use crate::record::{push_contains, push_eq, CatalogRecord, ChildRecord, FieldValue, FilterClause};

// ---------------------------------------------------------------------------
// Fee structure
// ---------------------------------------------------------------------------

/// A row from the `fee_structures` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeStructure {
    pub id: DbId,
    pub product_id: DbId,
    pub name: String,
    pub fee_structure_type: FeeStructureType,
    pub description: Option<String>,
    pub effective_date: NaiveDate,
    pub expiration_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeeStructure {
    pub product_id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub fee_structure_type: FeeStructureType,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    pub effective_date: NaiveDate,
    pub expiration_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeeStructure {
    pub product_id: Option<DbId>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub fee_structure_type: Option<FeeStructureType>,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    pub effective_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeStructureFilter {
    pub product_id: Option<DbId>,
    pub name: Option<String>,
    pub fee_structure_type: Option<FeeStructureType>,
}

impl CatalogRecord for FeeStructure {
    const KIND: EntityKind = EntityKind::FeeStructure;
    const FIELDS: &'static [&'static str] = &[
        "product_id",
        "name",
        "fee_structure_type",
        "description",
        "effective_date",
        "expiration_date",
    ];
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("name", "name"),
        ("effectiveDate", "effective_date"),
        ("expirationDate", "expiration_date"),
    ];

    type Create = CreateFeeStructure;
    type Update = UpdateFeeStructure;
    type Filter = FeeStructureFilter;

    fn id(&self) -> DbId {
        self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn from_create(id: DbId, input: CreateFeeStructure, now: Timestamp) -> Self {
        Self {
            id,
            product_id: input.product_id,
            name: input.name,
            fee_structure_type: input.fee_structure_type,
            description: input.description,
            effective_date: input.effective_date,
            expiration_date: input.expiration_date,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: UpdateFeeStructure, now: Timestamp) {
        if let Some(product_id) = input.product_id {
            self.product_id = product_id;
        }
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(structure_type) = input.fee_structure_type {
            self.fee_structure_type = structure_type;
        }
        if input.description.is_some() {
            self.description = input.description;
        }
        if let Some(date) = input.effective_date {
            self.effective_date = date;
        }
        if input.expiration_date.is_some() {
            self.expiration_date = input.expiration_date;
        }
        self.updated_at = now;
    }

    fn field_values(&self) -> Vec<FieldValue> {
        vec![
            self.product_id.into(),
            self.name.clone().into(),
            self.fee_structure_type.into(),
            self.description.clone().into(),
            self.effective_date.into(),
            self.expiration_date.into(),
        ]
    }

    fn filter_clauses(filter: &FeeStructureFilter) -> Vec<FilterClause> {
        let mut clauses = Vec::new();
        push_eq(&mut clauses, "product_id", filter.product_id);
        push_contains(&mut clauses, "name", filter.name.as_deref());
        push_eq(&mut clauses, "fee_structure_type", filter.fee_structure_type);
        clauses
    }

    fn parents(&self) -> Vec<ParentRef> {
        vec![ParentRef::cascade(EntityKind::Product, self.product_id)]
    }

    fn check_invariants(&self) -> Result<(), CoreError> {
        validate_date_range(
            "effectiveDate",
            Some(self.effective_date),
            "expirationDate",
            self.expiration_date,
        )
    }
}

impl ChildRecord for FeeStructure {
    const PARENT: EntityKind = EntityKind::Product;
    const PARENT_COLUMN: &'static str = "product_id";
}

// ---------------------------------------------------------------------------
// Fee component
// ---------------------------------------------------------------------------

/// A row from the `fee_components` table.
///
/// A `FIXED` component charges `amount`; a `PERCENTAGE` component charges
/// `rate`, optionally clamped to `[min_amount, max_amount]`.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeComponent {
    pub id: DbId,
    pub fee_structure_id: DbId,
    pub component_name: String,
    pub fee_type: FeeType,
    pub calculation_method: CalculationMethod,
    pub amount: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub currency_code: Option<String>,
    pub frequency: FeeFrequency,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeeComponent {
    pub fee_structure_id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub component_name: String,
    pub fee_type: FeeType,
    pub calculation_method: CalculationMethod,
    pub amount: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub currency_code: Option<String>,
    pub frequency: FeeFrequency,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeeComponent {
    pub fee_structure_id: Option<DbId>,
    #[validate(length(min = 1, max = 255))]
    pub component_name: Option<String>,
    pub fee_type: Option<FeeType>,
    pub calculation_method: Option<CalculationMethod>,
    pub amount: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub currency_code: Option<String>,
    pub frequency: Option<FeeFrequency>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeComponentFilter {
    pub fee_structure_id: Option<DbId>,
    pub name: Option<String>,
    pub fee_type: Option<FeeType>,
    pub calculation_method: Option<CalculationMethod>,
    pub frequency: Option<FeeFrequency>,
}

impl CatalogRecord for FeeComponent {
    const KIND: EntityKind = EntityKind::FeeComponent;
    const FIELDS: &'static [&'static str] = &[
        "fee_structure_id",
        "component_name",
        "fee_type",
        "calculation_method",
        "amount",
        "rate",
        "currency_code",
        "frequency",
        "min_amount",
        "max_amount",
    ];
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("componentName", "component_name"),
        ("amount", "amount"),
        ("rate", "rate"),
    ];

    type Create = CreateFeeComponent;
    type Update = UpdateFeeComponent;
    type Filter = FeeComponentFilter;

    fn id(&self) -> DbId {
        self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn from_create(id: DbId, input: CreateFeeComponent, now: Timestamp) -> Self {
        Self {
            id,
            fee_structure_id: input.fee_structure_id,
            component_name: input.component_name,
            fee_type: input.fee_type,
            calculation_method: input.calculation_method,
            amount: input.amount,
            rate: input.rate,
            currency_code: input.currency_code,
            frequency: input.frequency,
            min_amount: input.min_amount,
            max_amount: input.max_amount,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: UpdateFeeComponent, now: Timestamp) {
        if let Some(structure_id) = input.fee_structure_id {
            self.fee_structure_id = structure_id;
        }
        if let Some(name) = input.component_name {
            self.component_name = name;
        }
        if let Some(fee_type) = input.fee_type {
            self.fee_type = fee_type;
        }
        if let Some(method) = input.calculation_method {
            self.calculation_method = method;
        }
        if input.amount.is_some() {
            self.amount = input.amount;
        }
        if input.rate.is_some() {
            self.rate = input.rate;
        }
        if input.currency_code.is_some() {
            self.currency_code = input.currency_code;
        }
        if let Some(frequency) = input.frequency {
            self.frequency = frequency;
        }
        if input.min_amount.is_some() {
            self.min_amount = input.min_amount;
        }
        if input.max_amount.is_some() {
            self.max_amount = input.max_amount;
        }
        self.updated_at = now;
    }

    fn field_values(&self) -> Vec<FieldValue> {
        vec![
            self.fee_structure_id.into(),
            self.component_name.clone().into(),
            self.fee_type.into(),
            self.calculation_method.into(),
            self.amount.into(),
            self.rate.into(),
            self.currency_code.clone().into(),
            self.frequency.into(),
            self.min_amount.into(),
            self.max_amount.into(),
        ]
    }

    fn filter_clauses(filter: &FeeComponentFilter) -> Vec<FilterClause> {
        let mut clauses = Vec::new();
        push_eq(&mut clauses, "fee_structure_id", filter.fee_structure_id);
        push_contains(&mut clauses, "component_name", filter.name.as_deref());
        push_eq(&mut clauses, "fee_type", filter.fee_type);
        push_eq(&mut clauses, "calculation_method", filter.calculation_method);
        push_eq(&mut clauses, "frequency", filter.frequency);
        clauses
    }

    fn parents(&self) -> Vec<ParentRef> {
        vec![ParentRef::cascade(
            EntityKind::FeeStructure,
            self.fee_structure_id,
        )]
    }

    fn check_invariants(&self) -> Result<(), CoreError> {
        match self.calculation_method {
            CalculationMethod::Fixed if self.amount.is_none() => {
                return Err(CoreError::Validation(
                    "A FIXED fee component requires an amount".to_string(),
                ));
            }
            CalculationMethod::Percentage if self.rate.is_none() => {
                return Err(CoreError::Validation(
                    "A PERCENTAGE fee component requires a rate".to_string(),
                ));
            }
            _ => {}
        }
        validate_non_negative("amount", self.amount)?;
        validate_non_negative("rate", self.rate)?;
        validate_non_negative("minAmount", self.min_amount)?;
        validate_non_negative("maxAmount", self.max_amount)?;
        validate_amount("amount", self.amount)?;
        validate_rate("rate", self.rate)?;
        validate_amount("minAmount", self.min_amount)?;
        validate_amount("maxAmount", self.max_amount)?;
        validate_bounds("minAmount", self.min_amount, "maxAmount", self.max_amount)?;
        validate_optional_currency_code("currencyCode", self.currency_code.as_deref())
    }
}

impl ChildRecord for FeeComponent {
    const PARENT: EntityKind = EntityKind::FeeStructure;
    const PARENT_COLUMN: &'static str = "fee_structure_id";
}
