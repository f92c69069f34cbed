//! Route definitions for the catalog resources.
//!
//! Every resource gets the same five CRUD routes from [`crud_router`].
//! Read-only nested lists are mounted next to them on the parent resource.

use axum::routing::get;
use axum::Router;

use catalog_db::models::bundle::{BundleItem, ProductBundle};
use catalog_db::models::category::{ProductCategory, ProductSubtype};
use catalog_db::models::documentation::DocumentationRequirement;
use catalog_db::models::feature::ProductFeature;
use catalog_db::models::fee::{FeeComponent, FeeStructure};
use catalog_db::models::lifecycle::ProductLifecycle;
use catalog_db::models::limit::ProductLimit;
use catalog_db::models::localization::ProductLocalization;
use catalog_db::models::pricing::ProductPricing;
use catalog_db::models::product::Product;
use catalog_db::models::relationship::ProductRelationship;
use catalog_db::models::version::ProductVersion;
use catalog_db::record::{CatalogRecord, ChildRecord};

use crate::handlers::crud;
use crate::state::AppState;

/// `GET|POST /` and `GET|PUT|DELETE /{id}` for one entity.
pub fn crud_router<T: CatalogRecord>() -> Router<AppState> {
    Router::new()
        .route("/", get(crud::list::<T>).post(crud::create::<T>))
        .route(
            "/{id}",
            get(crud::get_by_id::<T>)
                .put(crud::update::<T>)
                .delete(crud::delete::<T>),
        )
}

/// `GET /{id}/{segment}`: rows of `T` belonging to the parent `{id}`.
fn children<T: ChildRecord>(router: Router<AppState>, segment: &str) -> Router<AppState> {
    router.route(&format!("/{{id}}/{segment}"), get(crud::list_children::<T>))
}

/// Routes mounted at `/categories`.
pub fn category_router() -> Router<AppState> {
    let router = crud_router::<ProductCategory>();
    let router = children::<ProductSubtype>(router, "subtypes");
    children::<Product>(router, "products")
}

/// Routes mounted at `/products`.
pub fn product_router() -> Router<AppState> {
    let mut router = crud_router::<Product>();
    router = children::<ProductFeature>(router, "features");
    router = children::<FeeStructure>(router, "fee-structures");
    router = children::<ProductPricing>(router, "pricing");
    router = children::<ProductLifecycle>(router, "lifecycles");
    router = children::<ProductLimit>(router, "limits");
    router = children::<ProductLocalization>(router, "localizations");
    router = children::<ProductRelationship>(router, "relationships");
    router = children::<ProductVersion>(router, "versions");
    children::<DocumentationRequirement>(router, "documentation")
}

/// Routes mounted at `/fee-structures`.
pub fn fee_structure_router() -> Router<AppState> {
    children::<FeeComponent>(crud_router::<FeeStructure>(), "components")
}

/// Routes mounted at `/product-bundles`.
pub fn bundle_router() -> Router<AppState> {
    children::<BundleItem>(crud_router::<ProductBundle>(), "items")
}

/// Every catalog resource keyed by its path segment.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/categories", category_router())
        .nest("/product-subtypes", crud_router::<ProductSubtype>())
        .nest("/products", product_router())
        .nest("/product-features", crud_router::<ProductFeature>())
        .nest("/fee-structures", fee_structure_router())
        .nest("/fee-components", crud_router::<FeeComponent>())
        .nest("/product-pricing", crud_router::<ProductPricing>())
        .nest("/product-lifecycles", crud_router::<ProductLifecycle>())
        .nest("/product-limits", crud_router::<ProductLimit>())
        .nest("/product-localizations", crud_router::<ProductLocalization>())
        .nest("/product-relationships", crud_router::<ProductRelationship>())
        .nest("/product-versions", crud_router::<ProductVersion>())
        .nest("/product-bundles", bundle_router())
        .nest("/bundle-items", crud_router::<BundleItem>())
        .nest("/product-documentation", crud_router::<DocumentationRequirement>())
}
