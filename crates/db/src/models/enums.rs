//! Enumerations stored as PostgreSQL enum types.
//!
//! Each enum serializes as `SCREAMING_SNAKE_CASE` in JSON and is stored under
//! the snake_case label declared next to its variant. The labels must match
//! the `CREATE TYPE` statements in the initial migration.

use serde::{Deserialize, Serialize};

use crate::record::{FieldValue, PgEnum};

macro_rules! define_pg_enum {
    (
        $(#[$meta:meta])*
        $name:ident : $type_name:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        #[sqlx(type_name = $type_name)]
        pub enum $name {
            $( $(#[$vmeta])* #[sqlx(rename = $label)] $variant ),+
        }

        impl PgEnum for $name {
            const TYPE_NAME: &'static str = $type_name;

            fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }
        }

        impl From<$name> for FieldValue {
            fn from(value: $name) -> Self {
                value.field_value()
            }
        }
    };
}

define_pg_enum! {
    /// Broad family a product belongs to.
    ProductType: "product_type" {
        Account = "account",
        Loan = "loan",
        Card = "card",
        Deposit = "deposit",
        Investment = "investment",
        Insurance = "insurance",
        Service = "service",
    }
}

define_pg_enum! {
    /// Publication status of a product.
    ProductStatus: "product_status" {
        Draft = "draft",
        Active = "active",
        Inactive = "inactive",
        Retired = "retired",
    }
}

define_pg_enum! {
    FeeStructureType: "fee_structure_type" {
        Flat = "flat",
        Tiered = "tiered",
        Percentage = "percentage",
        Mixed = "mixed",
    }
}

define_pg_enum! {
    FeeType: "fee_type" {
        Maintenance = "maintenance",
        Transaction = "transaction",
        Penalty = "penalty",
        Service = "service",
        Origination = "origination",
        Other = "other",
    }
}

define_pg_enum! {
    /// How a fee component's charge is computed.
    CalculationMethod: "calculation_method" {
        /// A fixed `amount`.
        Fixed = "fixed",
        /// A `rate` applied to the transaction or balance.
        Percentage = "percentage",
    }
}

define_pg_enum! {
    FeeFrequency: "fee_frequency" {
        OneTime = "one_time",
        Monthly = "monthly",
        Quarterly = "quarterly",
        Annual = "annual",
        PerTransaction = "per_transaction",
    }
}

define_pg_enum! {
    PricingType: "pricing_type" {
        Fixed = "fixed",
        Variable = "variable",
        Tiered = "tiered",
        Promotional = "promotional",
    }
}

define_pg_enum! {
    /// Stage of a product in its market lifecycle.
    LifecycleStatus: "lifecycle_status" {
        Concept = "concept",
        Development = "development",
        Launched = "launched",
        Mature = "mature",
        Declining = "declining",
        Discontinued = "discontinued",
    }
}

define_pg_enum! {
    LimitType: "limit_type" {
        TransactionAmount = "transaction_amount",
        DailyAmount = "daily_amount",
        MonthlyAmount = "monthly_amount",
        Balance = "balance",
        CreditLimit = "credit_limit",
        TransactionCount = "transaction_count",
    }
}

define_pg_enum! {
    RelationshipType: "relationship_type" {
        Complementary = "complementary",
        Substitute = "substitute",
        Prerequisite = "prerequisite",
        Upgrade = "upgrade",
        Bundled = "bundled",
        Incompatible = "incompatible",
    }
}

define_pg_enum! {
    BundleStatus: "bundle_status" {
        Draft = "draft",
        Active = "active",
        Inactive = "inactive",
    }
}
