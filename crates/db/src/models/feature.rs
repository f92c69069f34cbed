//! Product feature model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use catalog_core::entity::{EntityKind, ParentRef};
use catalog_core::types::{DbId, Timestamp};

use crate::record::{push_contains, push_eq, CatalogRecord, ChildRecord, FieldValue, FilterClause};

/// A row from the `product_features` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFeature {
    pub id: DbId,
    pub product_id: DbId,
    pub feature_name: String,
    /// Free-form feature classification, e.g. `"REWARDS"` or `"OVERDRAFT"`.
    pub feature_type: String,
    pub feature_description: Option<String>,
    pub is_mandatory: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductFeature {
    pub product_id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub feature_name: String,
    #[validate(length(min = 1, max = 50))]
    pub feature_type: String,
    #[validate(length(max = 4000))]
    pub feature_description: Option<String>,
    pub is_mandatory: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductFeature {
    pub product_id: Option<DbId>,
    #[validate(length(min = 1, max = 255))]
    pub feature_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub feature_type: Option<String>,
    #[validate(length(max = 4000))]
    pub feature_description: Option<String>,
    pub is_mandatory: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFilter {
    pub product_id: Option<DbId>,
    pub name: Option<String>,
    pub feature_type: Option<String>,
    pub is_mandatory: Option<bool>,
}

impl CatalogRecord for ProductFeature {
    const KIND: EntityKind = EntityKind::Feature;
    const FIELDS: &'static [&'static str] = &[
        "product_id",
        "feature_name",
        "feature_type",
        "feature_description",
        "is_mandatory",
    ];
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("featureName", "feature_name"),
        ("featureType", "feature_type"),
    ];

    type Create = CreateProductFeature;
    type Update = UpdateProductFeature;
    type Filter = FeatureFilter;

    fn id(&self) -> DbId {
        self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn from_create(id: DbId, input: CreateProductFeature, now: Timestamp) -> Self {
        Self {
            id,
            product_id: input.product_id,
            feature_name: input.feature_name,
            feature_type: input.feature_type,
            feature_description: input.feature_description,
            is_mandatory: input.is_mandatory.unwrap_or(false),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: UpdateProductFeature, now: Timestamp) {
        if let Some(product_id) = input.product_id {
            self.product_id = product_id;
        }
        if let Some(name) = input.feature_name {
            self.feature_name = name;
        }
        if let Some(feature_type) = input.feature_type {
            self.feature_type = feature_type;
        }
        if input.feature_description.is_some() {
            self.feature_description = input.feature_description;
        }
        if let Some(mandatory) = input.is_mandatory {
            self.is_mandatory = mandatory;
        }
        self.updated_at = now;
    }

    fn field_values(&self) -> Vec<FieldValue> {
        vec![
            self.product_id.into(),
            self.feature_name.clone().into(),
            self.feature_type.clone().into(),
            self.feature_description.clone().into(),
            self.is_mandatory.into(),
        ]
    }

    fn filter_clauses(filter: &FeatureFilter) -> Vec<FilterClause> {
        let mut clauses = Vec::new();
        push_eq(&mut clauses, "product_id", filter.product_id);
        push_contains(&mut clauses, "feature_name", filter.name.as_deref());
        push_eq(&mut clauses, "feature_type", filter.feature_type.clone());
        push_eq(&mut clauses, "is_mandatory", filter.is_mandatory);
        clauses
    }

    fn parents(&self) -> Vec<ParentRef> {
        vec![ParentRef::cascade(EntityKind::Product, self.product_id)]
    }
}

impl ChildRecord for ProductFeature {
    const PARENT: EntityKind = EntityKind::Product;
    const PARENT_COLUMN: &'static str = "product_id";
}
