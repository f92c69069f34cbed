//! Product category and subtype models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use catalog_core::entity::{EntityKind, ParentRef};
use catalog_core::error::CoreError;
use catalog_core::types::{DbId, Timestamp};

use crate::record::{
    push_contains, push_eq, CatalogRecord, ChildRecord, FieldValue, FilterClause, UniqueKey,
};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A row from the `product_categories` table.
///
/// Categories form a tree through `parent_category_id`.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    pub id: DbId,
    pub name: String,
    pub category_code: String,
    pub description: Option<String>,
    pub parent_category_id: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductCategory {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub category_code: String,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    pub parent_category_id: Option<DbId>,
    /// Defaults to `true`.
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductCategory {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub category_code: Option<String>,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    pub parent_category_id: Option<DbId>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFilter {
    pub name: Option<String>,
    pub parent_category_id: Option<DbId>,
    pub is_active: Option<bool>,
}

impl CatalogRecord for ProductCategory {
    const KIND: EntityKind = EntityKind::Category;
    const FIELDS: &'static [&'static str] = &[
        "name",
        "category_code",
        "description",
        "parent_category_id",
        "is_active",
    ];
    const SORTABLE: &'static [(&'static str, &'static str)] =
        &[("name", "name"), ("categoryCode", "category_code")];

    type Create = CreateProductCategory;
    type Update = UpdateProductCategory;
    type Filter = CategoryFilter;

    fn id(&self) -> DbId {
        self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn from_create(id: DbId, input: CreateProductCategory, now: Timestamp) -> Self {
        Self {
            id,
            name: input.name,
            category_code: input.category_code,
            description: input.description,
            parent_category_id: input.parent_category_id,
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: UpdateProductCategory, now: Timestamp) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(code) = input.category_code {
            self.category_code = code;
        }
        if input.description.is_some() {
            self.description = input.description;
        }
        if input.parent_category_id.is_some() {
            self.parent_category_id = input.parent_category_id;
        }
        if let Some(active) = input.is_active {
            self.is_active = active;
        }
        self.updated_at = now;
    }

    fn field_values(&self) -> Vec<FieldValue> {
        vec![
            self.name.clone().into(),
            self.category_code.clone().into(),
            self.description.clone().into(),
            self.parent_category_id.into(),
            self.is_active.into(),
        ]
    }

    fn filter_clauses(filter: &CategoryFilter) -> Vec<FilterClause> {
        let mut clauses = Vec::new();
        push_contains(&mut clauses, "name", filter.name.as_deref());
        push_eq(&mut clauses, "parent_category_id", filter.parent_category_id);
        push_eq(&mut clauses, "is_active", filter.is_active);
        clauses
    }

    fn parents(&self) -> Vec<ParentRef> {
        self.parent_category_id
            .map(|id| ParentRef::restrict(EntityKind::Category, id))
            .into_iter()
            .collect()
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![(
            "uq_product_categories_category_code",
            vec![self.category_code.clone().into()],
        )]
    }

    fn check_invariants(&self) -> Result<(), CoreError> {
        if self.parent_category_id == Some(self.id) {
            return Err(CoreError::Validation(
                "A category cannot be its own parent".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Subtype
// ---------------------------------------------------------------------------

/// A row from the `product_subtypes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSubtype {
    pub id: DbId,
    pub product_category_id: DbId,
    pub name: String,
    pub subtype_code: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductSubtype {
    pub product_category_id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub subtype_code: String,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductSubtype {
    pub product_category_id: Option<DbId>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub subtype_code: Option<String>,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtypeFilter {
    pub product_category_id: Option<DbId>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

impl CatalogRecord for ProductSubtype {
    const KIND: EntityKind = EntityKind::Subtype;
    const FIELDS: &'static [&'static str] = &[
        "product_category_id",
        "name",
        "subtype_code",
        "description",
        "is_active",
    ];
    const SORTABLE: &'static [(&'static str, &'static str)] =
        &[("name", "name"), ("subtypeCode", "subtype_code")];

    type Create = CreateProductSubtype;
    type Update = UpdateProductSubtype;
    type Filter = SubtypeFilter;

    fn id(&self) -> DbId {
        self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn from_create(id: DbId, input: CreateProductSubtype, now: Timestamp) -> Self {
        Self {
            id,
            product_category_id: input.product_category_id,
            name: input.name,
            subtype_code: input.subtype_code,
            description: input.description,
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: UpdateProductSubtype, now: Timestamp) {
        if let Some(category_id) = input.product_category_id {
            self.product_category_id = category_id;
        }
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(code) = input.subtype_code {
            self.subtype_code = code;
        }
        if input.description.is_some() {
            self.description = input.description;
        }
        if let Some(active) = input.is_active {
            self.is_active = active;
        }
        self.updated_at = now;
    }

    fn field_values(&self) -> Vec<FieldValue> {
        vec![
            self.product_category_id.into(),
            self.name.clone().into(),
            self.subtype_code.clone().into(),
            self.description.clone().into(),
            self.is_active.into(),
        ]
    }

    fn filter_clauses(filter: &SubtypeFilter) -> Vec<FilterClause> {
        let mut clauses = Vec::new();
        push_eq(&mut clauses, "product_category_id", filter.product_category_id);
        push_contains(&mut clauses, "name", filter.name.as_deref());
        push_eq(&mut clauses, "is_active", filter.is_active);
        clauses
    }

    fn parents(&self) -> Vec<ParentRef> {
        vec![ParentRef::restrict(
            EntityKind::Category,
            self.product_category_id,
        )]
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![(
            "uq_product_subtypes_subtype_code",
            vec![self.subtype_code.clone().into()],
        )]
    }
}

impl ChildRecord for ProductSubtype {
    const PARENT: EntityKind = EntityKind::Category;
    const PARENT_COLUMN: &'static str = "product_category_id";
}
