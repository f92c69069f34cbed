//! Product localization model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use catalog_core::entity::{EntityKind, ParentRef};
use catalog_core::types::{DbId, Timestamp};

use crate::record::{
    push_contains, push_eq, CatalogRecord, ChildRecord, FieldValue, FilterClause, UniqueKey,
};

/// A row from the `product_localizations` table. One row per product and locale.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLocalization {
    pub id: DbId,
    pub product_id: DbId,
    /// BCP 47 tag, e.g. `en-US`.
    pub locale_code: String,
    pub localized_name: String,
    pub localized_description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductLocalization {
    pub product_id: DbId,
    #[validate(length(min = 2, max = 20))]
    pub locale_code: String,
    #[validate(length(min = 1, max = 255))]
    pub localized_name: String,
    #[validate(length(max = 4000))]
    pub localized_description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductLocalization {
    pub product_id: Option<DbId>,
    #[validate(length(min = 2, max = 20))]
    pub locale_code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub localized_name: Option<String>,
    #[validate(length(max = 4000))]
    pub localized_description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizationFilter {
    pub product_id: Option<DbId>,
    pub locale_code: Option<String>,
    pub name: Option<String>,
}

impl CatalogRecord for ProductLocalization {
    const KIND: EntityKind = EntityKind::Localization;
    const FIELDS: &'static [&'static str] = &[
        "product_id",
        "locale_code",
        "localized_name",
        "localized_description",
    ];
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("localeCode", "locale_code"),
        ("localizedName", "localized_name"),
    ];

    type Create = CreateProductLocalization;
    type Update = UpdateProductLocalization;
    type Filter = LocalizationFilter;

    fn id(&self) -> DbId {
        self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn from_create(id: DbId, input: CreateProductLocalization, now: Timestamp) -> Self {
        Self {
            id,
            product_id: input.product_id,
            locale_code: input.locale_code,
            localized_name: input.localized_name,
            localized_description: input.localized_description,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: UpdateProductLocalization, now: Timestamp) {
        if let Some(product_id) = input.product_id {
            self.product_id = product_id;
        }
        if let Some(locale) = input.locale_code {
            self.locale_code = locale;
        }
        if let Some(name) = input.localized_name {
            self.localized_name = name;
        }
        if input.localized_description.is_some() {
            self.localized_description = input.localized_description;
        }
        self.updated_at = now;
    }

    fn field_values(&self) -> Vec<FieldValue> {
        vec![
            self.product_id.into(),
            self.locale_code.clone().into(),
            self.localized_name.clone().into(),
            self.localized_description.clone().into(),
        ]
    }

    fn filter_clauses(filter: &LocalizationFilter) -> Vec<FilterClause> {
        let mut clauses = Vec::new();
        push_eq(&mut clauses, "product_id", filter.product_id);
        push_eq(&mut clauses, "locale_code", filter.locale_code.clone());
        push_contains(&mut clauses, "localized_name", filter.name.as_deref());
        clauses
    }

    fn parents(&self) -> Vec<ParentRef> {
        vec![ParentRef::cascade(EntityKind::Product, self.product_id)]
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![(
            "uq_product_localizations_product_locale",
            vec![self.product_id.into(), self.locale_code.clone().into()],
        )]
    }
}

impl ChildRecord for ProductLocalization {
    const PARENT: EntityKind = EntityKind::Product;
    const PARENT_COLUMN: &'static str = "product_id";
}
