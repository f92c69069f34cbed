//! Catalog entity kinds.
//!
//! Every table in the catalog schema has a corresponding [`EntityKind`]. The
//! kind carries the table name used by the SQL layer and the label used in
//! error messages and logs, and is the key parent references point at.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Category,
    Subtype,
    Product,
    Feature,
    FeeStructure,
    FeeComponent,
    Pricing,
    Lifecycle,
    Limit,
    Localization,
    Relationship,
    Version,
    Bundle,
    BundleItem,
    DocumentationRequirement,
}

/// All entity kinds, in dependency order (parents before children).
pub const ALL_KINDS: &[EntityKind] = &[
    EntityKind::Category,
    EntityKind::Subtype,
    EntityKind::Product,
    EntityKind::Feature,
    EntityKind::FeeStructure,
    EntityKind::FeeComponent,
    EntityKind::Pricing,
    EntityKind::Lifecycle,
    EntityKind::Limit,
    EntityKind::Localization,
    EntityKind::Relationship,
    EntityKind::Version,
    EntityKind::Bundle,
    EntityKind::BundleItem,
    EntityKind::DocumentationRequirement,
];

impl EntityKind {
    /// Database table backing this entity.
    pub fn table(self) -> &'static str {
        match self {
            Self::Category => "product_categories",
            Self::Subtype => "product_subtypes",
            Self::Product => "products",
            Self::Feature => "product_features",
            Self::FeeStructure => "fee_structures",
            Self::FeeComponent => "fee_components",
            Self::Pricing => "product_pricing",
            Self::Lifecycle => "product_lifecycles",
            Self::Limit => "product_limits",
            Self::Localization => "product_localizations",
            Self::Relationship => "product_relationships",
            Self::Version => "product_versions",
            Self::Bundle => "product_bundles",
            Self::BundleItem => "bundle_items",
            Self::DocumentationRequirement => "product_documentation_requirements",
        }
    }

    /// Human-readable entity name for error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Category => "ProductCategory",
            Self::Subtype => "ProductSubtype",
            Self::Product => "Product",
            Self::Feature => "ProductFeature",
            Self::FeeStructure => "FeeStructure",
            Self::FeeComponent => "FeeComponent",
            Self::Pricing => "ProductPricing",
            Self::Lifecycle => "ProductLifecycle",
            Self::Limit => "ProductLimit",
            Self::Localization => "ProductLocalization",
            Self::Relationship => "ProductRelationship",
            Self::Version => "ProductVersion",
            Self::Bundle => "ProductBundle",
            Self::BundleItem => "BundleItem",
            Self::DocumentationRequirement => "DocumentationRequirement",
        }
    }
}

/// What happens to a referencing row when its parent is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// The child is deleted along with the parent.
    Cascade,
    /// The parent cannot be deleted while the child exists.
    Restrict,
}

/// A foreign-key style reference from a row to its parent row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentRef {
    pub kind: EntityKind,
    pub id: crate::types::DbId,
    pub on_delete: OnDelete,
}

impl ParentRef {
    pub fn cascade(kind: EntityKind, id: crate::types::DbId) -> Self {
        Self {
            kind,
            id,
            on_delete: OnDelete::Cascade,
        }
    }

    pub fn restrict(kind: EntityKind, id: crate::types::DbId) -> Self {
        Self {
            kind,
            id,
            on_delete: OnDelete::Restrict,
        }
    }
}
