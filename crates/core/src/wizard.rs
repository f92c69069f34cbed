//! Product creation wizard: step definitions and the session state machine.
//!
//! A wizard session walks linearly through [`TOTAL_STEPS`] steps. Each step
//! must be processed in order with a JSON object carrying the step's required
//! keys; once every step has been processed the session can be completed.
//! Sessions hold no storage handles; the API layer owns the registry and
//! performs the actual product creation on completion.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl WizardStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardStep {
    ProductDetails,
    Categorization,
    Pricing,
}

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: u8 = 3;

/// Minimum step number (1-based).
pub const MIN_STEP: u8 = 1;

impl WizardStep {
    /// Convert a 1-based step number to a `WizardStep`.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::ProductDetails),
            2 => Ok(Self::Categorization),
            3 => Ok(Self::Pricing),
            _ => Err(CoreError::Validation(format!(
                "Invalid step number {n}. Must be between {MIN_STEP} and {TOTAL_STEPS}"
            ))),
        }
    }

    pub fn to_number(self) -> u8 {
        match self {
            Self::ProductDetails => 1,
            Self::Categorization => 2,
            Self::Pricing => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ProductDetails => "Product Details",
            Self::Categorization => "Categorization",
            Self::Pricing => "Pricing",
        }
    }

    /// Key under which this step's data is kept in the session.
    pub fn data_key(self) -> &'static str {
        match self {
            Self::ProductDetails => "productDetails",
            Self::Categorization => "categorization",
            Self::Pricing => "pricing",
        }
    }

    /// Keys that must be present (and non-null) in the step's data.
    pub fn required_keys(self) -> &'static [&'static str] {
        match self {
            Self::ProductDetails => &["name", "productCode", "productType"],
            Self::Categorization => &["productCategoryId"],
            Self::Pricing => &["amount", "currencyCode"],
        }
    }
}

/// Check that step data is a JSON object containing the step's required keys.
pub fn validate_step_data(step: WizardStep, data: &Value) -> Result<(), CoreError> {
    let obj = data
        .as_object()
        .ok_or_else(|| CoreError::Validation("Step data must be a JSON object".to_string()))?;

    let missing: Vec<&str> = step
        .required_keys()
        .iter()
        .copied()
        .filter(|key| obj.get(*key).map_or(true, Value::is_null))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Step {} ({}) is missing required fields: {}",
            step.to_number(),
            step.label(),
            missing.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// In-memory state of one wizard run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSession {
    pub id: DbId,
    /// Next step to process; `TOTAL_STEPS + 1` once every step is done.
    pub current_step: u8,
    pub status: WizardStatus,
    pub step_data: Map<String, Value>,
    /// Product created when the wizard completed.
    pub product_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl WizardSession {
    /// Start a new session at step 1.
    pub fn initialize(id: DbId, now: Timestamp) -> Self {
        Self {
            id,
            current_step: MIN_STEP,
            status: WizardStatus::InProgress,
            step_data: Map::new(),
            product_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record the data for `step` and advance to the next step.
    ///
    /// Steps must be processed strictly in order; re-processing a finished
    /// step or skipping ahead is rejected.
    pub fn process_step(&mut self, step: u8, data: Value, now: Timestamp) -> Result<(), CoreError> {
        self.ensure_in_progress()?;
        let step_enum = WizardStep::from_number(step)?;

        if step != self.current_step {
            return Err(CoreError::Validation(format!(
                "Cannot process step {step}; the wizard is at step {}",
                self.current_step
            )));
        }

        validate_step_data(step_enum, &data)?;

        self.step_data.insert(step_enum.data_key().to_string(), data);
        self.current_step += 1;
        self.updated_at = now;
        Ok(())
    }

    /// Number of steps still to process.
    pub fn remaining_steps(&self) -> u8 {
        (TOTAL_STEPS + 1).saturating_sub(self.current_step)
    }

    /// Fail unless the session is in progress with every step processed.
    pub fn ensure_ready(&self) -> Result<(), CoreError> {
        self.ensure_in_progress()?;
        match self.remaining_steps() {
            0 => Ok(()),
            n => Err(CoreError::Validation(format!(
                "Cannot complete the wizard: {n} step(s) remaining"
            ))),
        }
    }

    /// Mark the session completed, recording the created product.
    pub fn complete(&mut self, product_id: DbId, now: Timestamp) -> Result<(), CoreError> {
        self.ensure_ready()?;
        self.status = WizardStatus::Completed;
        self.product_id = Some(product_id);
        self.updated_at = now;
        Ok(())
    }

    pub fn abandon(&mut self, now: Timestamp) -> Result<(), CoreError> {
        self.ensure_in_progress()?;
        self.status = WizardStatus::Abandoned;
        self.updated_at = now;
        Ok(())
    }

    /// Data recorded for a step, if it has been processed.
    pub fn data_for(&self, step: WizardStep) -> Option<&Map<String, Value>> {
        self.step_data.get(step.data_key()).and_then(Value::as_object)
    }

    /// All step data merged into one object, later steps winning on key clashes.
    pub fn merged_data(&self) -> Map<String, Value> {
        let mut merged = Map::new();
        for n in MIN_STEP..=TOTAL_STEPS {
            let Ok(step) = WizardStep::from_number(n) else {
                continue;
            };
            if let Some(data) = self.data_for(step) {
                merged.extend(data.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        merged
    }

    fn ensure_in_progress(&self) -> Result<(), CoreError> {
        if self.status == WizardStatus::InProgress {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Wizard session {} is {}",
                self.id,
                self.status.as_str()
            )))
        }
    }
}
