//! In-memory registry of product wizard sessions.
//!
//! Sessions live only in process memory and expire after a period of
//! inactivity. Each session sits behind its own mutex so that concurrent
//! requests against one session are serialized, including the
//! multi-step completion that writes the product and its pricing.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{Map, Value};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use catalog_core::error::CoreError;
use catalog_core::types::{new_id, DbId};
use catalog_core::wizard::{WizardSession, WizardStep};
use catalog_db::models::pricing::CreateProductPricing;
use catalog_db::models::product::CreateProduct;

/// Label used in not-found errors for wizard sessions.
pub const WIZARD_ENTITY: &str = "WizardSession";

struct Entry {
    session: WizardSession,
    last_touched: Instant,
}

impl Entry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_touched.elapsed() >= ttl
    }
}

/// Exclusive access to one live session. Dropping the guard releases it.
pub struct SessionGuard {
    entry: OwnedMutexGuard<Entry>,
}

impl Deref for SessionGuard {
    type Target = WizardSession;

    fn deref(&self) -> &WizardSession {
        &self.entry.session
    }
}

impl DerefMut for SessionGuard {
    fn deref_mut(&mut self) -> &mut WizardSession {
        &mut self.entry.session
    }
}

/// Thread-safe registry of wizard sessions with idle expiry.
pub struct WizardRegistry {
    sessions: RwLock<HashMap<DbId, Arc<Mutex<Entry>>>>,
    ttl: Duration,
}

impl WizardRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Start a new session at step 1.
    pub async fn create(&self) -> WizardSession {
        let session = WizardSession::initialize(new_id(), chrono::Utc::now());
        let entry = Entry {
            session: session.clone(),
            last_touched: Instant::now(),
        };
        self.sessions
            .write()
            .await
            .insert(session.id, Arc::new(Mutex::new(entry)));
        tracing::info!(session_id = %session.id, "Wizard session created");
        session
    }

    /// Lock a live session for exclusive use, refreshing its idle timer.
    ///
    /// Expired sessions are removed and reported as not found.
    pub async fn lock(&self, id: DbId) -> Result<SessionGuard, CoreError> {
        let slot = self.sessions.read().await.get(&id).cloned();
        let Some(slot) = slot else {
            return Err(not_found(id));
        };

        let mut entry = slot.lock_owned().await;
        if entry.is_expired(self.ttl) {
            drop(entry);
            self.sessions.write().await.remove(&id);
            tracing::debug!(session_id = %id, "Wizard session expired");
            return Err(not_found(id));
        }
        entry.last_touched = Instant::now();
        Ok(SessionGuard { entry })
    }

    /// Snapshot of a live session.
    pub async fn get(&self, id: DbId) -> Result<WizardSession, CoreError> {
        Ok(self.lock(id).await?.clone())
    }

    /// Remove every expired session that is not currently in use.
    ///
    /// Returns the number of sessions removed.
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, slot| match slot.try_lock() {
            Ok(entry) => !entry.is_expired(self.ttl),
            Err(_) => true,
        });
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: WIZARD_ENTITY,
        id,
    }
}

// ---------------------------------------------------------------------------
// Completion inputs
// ---------------------------------------------------------------------------

/// Build the product create input from the data of all processed steps.
///
/// Keys not belonging to the product (such as `amount`) are ignored.
pub fn product_input(session: &WizardSession) -> Result<CreateProduct, CoreError> {
    serde_json::from_value(Value::Object(session.merged_data()))
        .map_err(|e| CoreError::Validation(format!("Wizard product data is invalid: {e}")))
}

/// Build the pricing create input from the pricing step.
///
/// `pricingType` defaults to `FIXED` and `effectiveDate` to today.
pub fn pricing_input(
    session: &WizardSession,
    product_id: DbId,
) -> Result<CreateProductPricing, CoreError> {
    let mut data: Map<String, Value> = session
        .data_for(WizardStep::Pricing)
        .cloned()
        .ok_or_else(|| CoreError::Validation("Pricing step has not been processed".to_string()))?;

    data.insert("productId".into(), Value::String(product_id.to_string()));
    data.entry("pricingType")
        .or_insert_with(|| Value::String("FIXED".into()));
    data.entry("effectiveDate").or_insert_with(|| {
        Value::String(chrono::Utc::now().date_naive().to_string())
    });

    serde_json::from_value(Value::Object(data))
        .map_err(|e| CoreError::Validation(format!("Wizard pricing data is invalid: {e}")))
}
