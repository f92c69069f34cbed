pub mod catalog;
pub mod health;
pub mod wizard;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /categories                                   list, create
/// /categories/{id}                              get, update, delete
/// /categories/{id}/subtypes                     subtypes of a category
/// /categories/{id}/products                     products of a category
///
/// /product-subtypes[/{id}]                      CRUD
///
/// /products                                     list, create
/// /products/{id}                                get, update, delete
/// /products/{id}/features                       nested lists (read-only)
/// /products/{id}/fee-structures
/// /products/{id}/pricing
/// /products/{id}/lifecycles
/// /products/{id}/limits
/// /products/{id}/localizations
/// /products/{id}/relationships
/// /products/{id}/versions
/// /products/{id}/documentation
///
/// /product-features[/{id}]                      CRUD
/// /fee-structures[/{id}]                        CRUD
/// /fee-structures/{id}/components               components of a fee structure
/// /fee-components[/{id}]                        CRUD
/// /product-pricing[/{id}]                       CRUD
/// /product-lifecycles[/{id}]                    CRUD
/// /product-limits[/{id}]                        CRUD
/// /product-localizations[/{id}]                 CRUD
/// /product-relationships[/{id}]                 CRUD
/// /product-versions[/{id}]                      CRUD
/// /product-bundles[/{id}]                       CRUD
/// /product-bundles/{id}/items                   items of a bundle
/// /bundle-items[/{id}]                          CRUD
/// /product-documentation[/{id}]                 CRUD
///
/// /product-wizard                               start a session (POST)
/// /product-wizard/{id}                          get, abandon
/// /product-wizard/{id}/steps                    process a step (POST)
/// /product-wizard/{id}/complete                 create product + pricing (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(catalog::router())
        .nest("/product-wizard", wizard::router())
}
