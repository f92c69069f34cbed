//! Handlers for the product creation wizard.
//!
//! Sessions are held by [`crate::wizard::WizardRegistry`]; completing a
//! session creates the product and its pricing through [`CatalogService`].

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use catalog_core::types::DbId;
use catalog_core::validation::validate_input;
use catalog_core::wizard::WizardSession;
use catalog_db::models::pricing::ProductPricing;
use catalog_db::models::product::Product;
use catalog_db::record::CatalogRecord;

use crate::error::AppResult;
use crate::handlers::crud::{bad_json, bad_path};
use crate::service::CatalogService;
use crate::state::AppState;
use crate::wizard::{pricing_input, product_input};

/// Body of `POST /product-wizard/{id}/steps`.
#[derive(Debug, Deserialize)]
pub struct ProcessStepRequest {
    pub step: u8,
    pub data: Value,
}

/// Result of a completed wizard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardCompletion {
    pub session: WizardSession,
    pub product: Product,
    pub pricing: ProductPricing,
}

/// POST /api/v1/product-wizard
pub async fn initialize(State(state): State<AppState>) -> (StatusCode, Json<WizardSession>) {
    let session = state.wizard.create().await;
    (StatusCode::CREATED, Json(session))
}

/// GET /api/v1/product-wizard/{id}
pub async fn get_session(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<WizardSession>> {
    let Path(id) = id.map_err(bad_path)?;
    Ok(Json(state.wizard.get(id).await?))
}

/// POST /api/v1/product-wizard/{id}/steps
pub async fn process_step(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
    input: Result<Json<ProcessStepRequest>, JsonRejection>,
) -> AppResult<Json<WizardSession>> {
    let Path(id) = id.map_err(bad_path)?;
    let Json(input) = input.map_err(bad_json)?;

    let mut session = state.wizard.lock(id).await?;
    session.process_step(input.step, input.data, chrono::Utc::now())?;
    tracing::info!(session_id = %id, step = input.step, "Wizard step processed");
    Ok(Json(session.clone()))
}

/// POST /api/v1/product-wizard/{id}/complete
///
/// Creates the product, then its pricing. If the pricing cannot be stored
/// the product is removed again so the wizard can be retried.
pub async fn complete(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<(StatusCode, Json<WizardCompletion>)> {
    let Path(id) = id.map_err(bad_path)?;
    let mut session = state.wizard.lock(id).await?;
    session.ensure_ready()?;

    let product_dto = product_input(&session)?;
    // A bad pricing step must fail before the product is written.
    let pricing_draft = pricing_input(&session, id)?;
    validate_input(&pricing_draft)?;
    ProductPricing::from_create(id, pricing_draft, chrono::Utc::now()).check_invariants()?;

    let service = CatalogService::new(&state.store);
    let product = service.create::<Product>(product_dto).await?;

    let pricing = match service
        .create::<ProductPricing>(pricing_input(&session, product.id)?)
        .await
    {
        Ok(pricing) => pricing,
        Err(err) => {
            if let Err(cleanup) = service.delete::<Product>(product.id).await {
                tracing::error!(
                    session_id = %id,
                    product_id = %product.id,
                    error = %cleanup,
                    "Failed to remove product after wizard pricing error"
                );
            }
            return Err(err);
        }
    };

    session.complete(product.id, chrono::Utc::now())?;
    tracing::info!(session_id = %id, product_id = %product.id, "Wizard completed");

    Ok((
        StatusCode::CREATED,
        Json(WizardCompletion {
            session: session.clone(),
            product,
            pricing,
        }),
    ))
}

/// DELETE /api/v1/product-wizard/{id}
pub async fn abandon(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id.map_err(bad_path)?;
    let mut session = state.wizard.lock(id).await?;
    session.abandon(chrono::Utc::now())?;
    tracing::info!(session_id = %id, "Wizard abandoned");
    Ok(StatusCode::NO_CONTENT)
}
