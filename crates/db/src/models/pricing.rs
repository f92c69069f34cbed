//! Product pricing model and DTOs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use catalog_core::entity::{EntityKind, ParentRef};
use catalog_core::error::CoreError;
use catalog_core::types::{DbId, Timestamp};
use catalog_core::validation::{
    validate_amount, validate_currency_code, validate_date_range, validate_non_negative,
    validate_rate,
};

use crate::models::enums::PricingType;
use crate::record::{push_eq, CatalogRecord, ChildRecord, FieldValue, FilterClause};

/// A row from the `product_pricing` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPricing {
    pub id: DbId,
    pub product_id: DbId,
    pub pricing_type: PricingType,
    pub amount: Decimal,
    pub currency_code: String,
    /// Annual rate in percent, for interest-bearing products.
    pub interest_rate: Option<Decimal>,
    pub effective_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPricing {
    pub product_id: DbId,
    pub pricing_type: PricingType,
    pub amount: Decimal,
    pub currency_code: String,
    pub interest_rate: Option<Decimal>,
    pub effective_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPricing {
    pub product_id: Option<DbId>,
    pub pricing_type: Option<PricingType>,
    pub amount: Option<Decimal>,
    pub currency_code: Option<String>,
    pub interest_rate: Option<Decimal>,
    pub effective_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingFilter {
    pub product_id: Option<DbId>,
    pub pricing_type: Option<PricingType>,
    pub currency_code: Option<String>,
    pub is_active: Option<bool>,
}

impl CatalogRecord for ProductPricing {
    const KIND: EntityKind = EntityKind::Pricing;
    const FIELDS: &'static [&'static str] = &[
        "product_id",
        "pricing_type",
        "amount",
        "currency_code",
        "interest_rate",
        "effective_date",
        "expiry_date",
        "is_active",
    ];
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("amount", "amount"),
        ("interestRate", "interest_rate"),
        ("effectiveDate", "effective_date"),
        ("expiryDate", "expiry_date"),
    ];

    type Create = CreateProductPricing;
    type Update = UpdateProductPricing;
    type Filter = PricingFilter;

    fn id(&self) -> DbId {
        self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn from_create(id: DbId, input: CreateProductPricing, now: Timestamp) -> Self {
        Self {
            id,
            product_id: input.product_id,
            pricing_type: input.pricing_type,
            amount: input.amount,
            currency_code: input.currency_code,
            interest_rate: input.interest_rate,
            effective_date: input.effective_date,
            expiry_date: input.expiry_date,
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: UpdateProductPricing, now: Timestamp) {
        if let Some(product_id) = input.product_id {
            self.product_id = product_id;
        }
        if let Some(pricing_type) = input.pricing_type {
            self.pricing_type = pricing_type;
        }
        if let Some(amount) = input.amount {
            self.amount = amount;
        }
        if let Some(currency) = input.currency_code {
            self.currency_code = currency;
        }
        if input.interest_rate.is_some() {
            self.interest_rate = input.interest_rate;
        }
        if let Some(date) = input.effective_date {
            self.effective_date = date;
        }
        if input.expiry_date.is_some() {
            self.expiry_date = input.expiry_date;
        }
        if let Some(active) = input.is_active {
            self.is_active = active;
        }
        self.updated_at = now;
    }

    fn field_values(&self) -> Vec<FieldValue> {
        vec![
            self.product_id.into(),
            self.pricing_type.into(),
            self.amount.into(),
            self.currency_code.clone().into(),
            self.interest_rate.into(),
            self.effective_date.into(),
            self.expiry_date.into(),
            self.is_active.into(),
        ]
    }

    fn filter_clauses(filter: &PricingFilter) -> Vec<FilterClause> {
        let mut clauses = Vec::new();
        push_eq(&mut clauses, "product_id", filter.product_id);
        push_eq(&mut clauses, "pricing_type", filter.pricing_type);
        push_eq(&mut clauses, "currency_code", filter.currency_code.clone());
        push_eq(&mut clauses, "is_active", filter.is_active);
        clauses
    }

    fn parents(&self) -> Vec<ParentRef> {
        vec![ParentRef::cascade(EntityKind::Product, self.product_id)]
    }

    fn check_invariants(&self) -> Result<(), CoreError> {
        validate_non_negative("amount", Some(self.amount))?;
        validate_non_negative("interestRate", self.interest_rate)?;
        validate_amount("amount", Some(self.amount))?;
        validate_rate("interestRate", self.interest_rate)?;
        validate_currency_code("currencyCode", &self.currency_code)?;
        validate_date_range(
            "effectiveDate",
            Some(self.effective_date),
            "expiryDate",
            self.expiry_date,
        )
    }
}

impl ChildRecord for ProductPricing {
    const PARENT: EntityKind = EntityKind::Product;
    const PARENT_COLUMN: &'static str = "product_id";
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn pricing(amount: &str) -> ProductPricing {
        ProductPricing::from_create(
            uuid::Uuid::now_v7(),
            CreateProductPricing {
                product_id: uuid::Uuid::now_v7(),
                pricing_type: PricingType::Fixed,
                amount: amount.parse().unwrap(),
                currency_code: "USD".into(),
                interest_rate: None,
                effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                expiry_date: None,
                is_active: None,
            },
            chrono::Utc::now(),
        )
    }

    #[test]
    fn defaults_to_active_and_cascades_from_product() {
        let p = pricing("4.95");
        assert!(p.is_active);
        assert_eq!(p.parents(), vec![ParentRef::cascade(EntityKind::Product, p.product_id)]);
        assert_eq!(p.field_values().len(), ProductPricing::FIELDS.len());
        assert!(p.check_invariants().is_ok());
    }

    #[test]
    fn update_keeps_omitted_fields() {
        let mut p = pricing("4.95");
        p.interest_rate = Some(Decimal::new(325, 2));
        p.apply_update(
            UpdateProductPricing {
                amount: Some(Decimal::new(599, 2)),
                ..Default::default()
            },
            chrono::Utc::now(),
        );
        assert_eq!(p.amount, Decimal::new(599, 2));
        assert_eq!(p.interest_rate, Some(Decimal::new(325, 2)));
        assert_eq!(p.currency_code, "USD");
    }

    #[test]
    fn amount_scale_and_rate_range_follow_the_columns() {
        assert_matches!(
            pricing("4.95001").check_invariants(),
            Err(CoreError::Validation(msg)) if msg.contains("amount")
        );

        let mut p = pricing("4.95");
        p.interest_rate = Some("12345.5".parse().unwrap());
        assert_matches!(
            p.check_invariants(),
            Err(CoreError::Validation(msg)) if msg.contains("interestRate")
        );
    }

    #[test]
    fn expiry_before_effective_date_is_rejected() {
        let mut p = pricing("1");
        p.expiry_date = NaiveDate::from_ymd_opt(2023, 12, 31);
        assert_matches!(p.check_invariants(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn filter_maps_each_present_field() {
        let clauses = ProductPricing::filter_clauses(&PricingFilter {
            currency_code: Some("EUR".into()),
            is_active: Some(true),
            ..Default::default()
        });
        assert_eq!(
            clauses,
            vec![
                FilterClause::eq("currency_code", "EUR"),
                FilterClause::eq("is_active", true),
            ]
        );
    }
}
