//! Documentation requirement model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use catalog_core::entity::{EntityKind, ParentRef};
use catalog_core::types::{DbId, Timestamp};

use crate::record::{push_eq, CatalogRecord, ChildRecord, FieldValue, FilterClause};

/// A row from the `product_documentation_requirements` table: a document a
/// customer must (or may) provide to obtain the product.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationRequirement {
    pub id: DbId,
    pub product_id: DbId,
    pub document_type: String,
    pub description: Option<String>,
    pub is_mandatory: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentationRequirement {
    pub product_id: DbId,
    #[validate(length(min = 1, max = 100))]
    pub document_type: String,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    /// Defaults to `true`.
    pub is_mandatory: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentationRequirement {
    pub product_id: Option<DbId>,
    #[validate(length(min = 1, max = 100))]
    pub document_type: Option<String>,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    pub is_mandatory: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationFilter {
    pub product_id: Option<DbId>,
    pub document_type: Option<String>,
    pub is_mandatory: Option<bool>,
}

impl CatalogRecord for DocumentationRequirement {
    const KIND: EntityKind = EntityKind::DocumentationRequirement;
    const FIELDS: &'static [&'static str] =
        &["product_id", "document_type", "description", "is_mandatory"];
    const SORTABLE: &'static [(&'static str, &'static str)] =
        &[("documentType", "document_type")];

    type Create = CreateDocumentationRequirement;
    type Update = UpdateDocumentationRequirement;
    type Filter = DocumentationFilter;

    fn id(&self) -> DbId {
        self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn from_create(id: DbId, input: CreateDocumentationRequirement, now: Timestamp) -> Self {
        Self {
            id,
            product_id: input.product_id,
            document_type: input.document_type,
            description: input.description,
            is_mandatory: input.is_mandatory.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: UpdateDocumentationRequirement, now: Timestamp) {
        if let Some(product_id) = input.product_id {
            self.product_id = product_id;
        }
        if let Some(document_type) = input.document_type {
            self.document_type = document_type;
        }
        if input.description.is_some() {
            self.description = input.description;
        }
        if let Some(mandatory) = input.is_mandatory {
            self.is_mandatory = mandatory;
        }
        self.updated_at = now;
    }

    fn field_values(&self) -> Vec<FieldValue> {
        vec![
            self.product_id.into(),
            self.document_type.clone().into(),
            self.description.clone().into(),
            self.is_mandatory.into(),
        ]
    }

    fn filter_clauses(filter: &DocumentationFilter) -> Vec<FilterClause> {
        let mut clauses = Vec::new();
        push_eq(&mut clauses, "product_id", filter.product_id);
        push_eq(&mut clauses, "document_type", filter.document_type.clone());
        push_eq(&mut clauses, "is_mandatory", filter.is_mandatory);
        clauses
    }

    fn parents(&self) -> Vec<ParentRef> {
        vec![ParentRef::cascade(EntityKind::Product, self.product_id)]
    }
}

impl ChildRecord for DocumentationRequirement {
    const PARENT: EntityKind = EntityKind::Product;
    const PARENT_COLUMN: &'static str = "product_id";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirement(is_mandatory: Option<bool>) -> DocumentationRequirement {
        DocumentationRequirement::from_create(
            uuid::Uuid::now_v7(),
            CreateDocumentationRequirement {
                product_id: uuid::Uuid::now_v7(),
                document_type: "PROOF_OF_ADDRESS".into(),
                description: Some("Utility bill under 3 months old".into()),
                is_mandatory,
            },
            chrono::Utc::now(),
        )
    }

    #[test]
    fn requirements_are_mandatory_unless_stated() {
        assert!(requirement(None).is_mandatory);
        assert!(!requirement(Some(false)).is_mandatory);
    }

    #[test]
    fn update_keeps_description() {
        let mut r = requirement(None);
        r.apply_update(
            UpdateDocumentationRequirement {
                is_mandatory: Some(false),
                ..Default::default()
            },
            chrono::Utc::now(),
        );
        assert!(!r.is_mandatory);
        assert_eq!(r.document_type, "PROOF_OF_ADDRESS");
        assert_eq!(r.description.as_deref(), Some("Utility bill under 3 months old"));
    }

    #[test]
    fn filter_by_type_and_flag() {
        let clauses = DocumentationRequirement::filter_clauses(&DocumentationFilter {
            document_type: Some("ID".into()),
            is_mandatory: Some(true),
            ..Default::default()
        });
        assert_eq!(
            clauses,
            vec![
                FilterClause::eq("document_type", "ID"),
                FilterClause::eq("is_mandatory", true),
            ]
        );
    }
}
