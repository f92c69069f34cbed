//! Product relationship model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use catalog_core::entity::{EntityKind, ParentRef};
use catalog_core::error::CoreError;
use catalog_core::types::{DbId, Timestamp};

use crate::models::enums::RelationshipType;
use crate::record::{push_eq, CatalogRecord, ChildRecord, FieldValue, FilterClause, UniqueKey};

/// A row from the `product_relationships` table: a directed, typed edge
/// between two products.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRelationship {
    pub id: DbId,
    pub product_id: DbId,
    pub related_product_id: DbId,
    pub relationship_type: RelationshipType,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRelationship {
    pub product_id: DbId,
    pub related_product_id: DbId,
    pub relationship_type: RelationshipType,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRelationship {
    pub product_id: Option<DbId>,
    pub related_product_id: Option<DbId>,
    pub relationship_type: Option<RelationshipType>,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipFilter {
    pub product_id: Option<DbId>,
    pub related_product_id: Option<DbId>,
    pub relationship_type: Option<RelationshipType>,
}

impl CatalogRecord for ProductRelationship {
    const KIND: EntityKind = EntityKind::Relationship;
    const FIELDS: &'static [&'static str] = &[
        "product_id",
        "related_product_id",
        "relationship_type",
        "description",
    ];
    const SORTABLE: &'static [(&'static str, &'static str)] = &[];

    type Create = CreateProductRelationship;
    type Update = UpdateProductRelationship;
    type Filter = RelationshipFilter;

    fn id(&self) -> DbId {
        self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn from_create(id: DbId, input: CreateProductRelationship, now: Timestamp) -> Self {
        Self {
            id,
            product_id: input.product_id,
            related_product_id: input.related_product_id,
            relationship_type: input.relationship_type,
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: UpdateProductRelationship, now: Timestamp) {
        if let Some(product_id) = input.product_id {
            self.product_id = product_id;
        }
        if let Some(related_id) = input.related_product_id {
            self.related_product_id = related_id;
        }
        if let Some(relationship_type) = input.relationship_type {
            self.relationship_type = relationship_type;
        }
        if input.description.is_some() {
            self.description = input.description;
        }
        self.updated_at = now;
    }

    fn field_values(&self) -> Vec<FieldValue> {
        vec![
            self.product_id.into(),
            self.related_product_id.into(),
            self.relationship_type.into(),
            self.description.clone().into(),
        ]
    }

    fn filter_clauses(filter: &RelationshipFilter) -> Vec<FilterClause> {
        let mut clauses = Vec::new();
        push_eq(&mut clauses, "product_id", filter.product_id);
        push_eq(&mut clauses, "related_product_id", filter.related_product_id);
        push_eq(&mut clauses, "relationship_type", filter.relationship_type);
        clauses
    }

    fn parents(&self) -> Vec<ParentRef> {
        vec![
            ParentRef::cascade(EntityKind::Product, self.product_id),
            ParentRef::cascade(EntityKind::Product, self.related_product_id),
        ]
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![(
            "uq_product_relationships_edge",
            vec![
                self.product_id.into(),
                self.related_product_id.into(),
                self.relationship_type.into(),
            ],
        )]
    }

    fn check_invariants(&self) -> Result<(), CoreError> {
        if self.product_id == self.related_product_id {
            return Err(CoreError::Validation(
                "A product cannot be related to itself".to_string(),
            ));
        }
        Ok(())
    }
}

impl ChildRecord for ProductRelationship {
    const PARENT: EntityKind = EntityKind::Product;
    const PARENT_COLUMN: &'static str = "product_id";
}
