use axum::routing::{get, post};
use axum::Router;

use crate::handlers::wizard;
use crate::state::AppState;

/// Routes mounted at `/product-wizard`.
///
/// ```text
/// POST   /                 initialize
/// GET    /{id}             get session
/// POST   /{id}/steps       process step
/// POST   /{id}/complete    create product and pricing
/// DELETE /{id}             abandon
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(wizard::initialize))
        .route("/{id}", get(wizard::get_session).delete(wizard::abandon))
        .route("/{id}/steps", post(wizard::process_step))
        .route("/{id}/complete", post(wizard::complete))
}
