#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use catalog_api::config::{ServerConfig, StorageBackend};
use catalog_api::router::build_app_router;
use catalog_api::state::AppState;
use catalog_db::CatalogStore;

/// Build a test `ServerConfig` with safe defaults and in-memory storage.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        storage_backend: StorageBackend::Memory,
        ..ServerConfig::default()
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// The router is cheap to clone; clones share the same store and wizard
/// sessions, so a test can issue several requests against one app.
pub fn build_test_app() -> Router {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> Router {
    let state = AppState::new(CatalogStore::in_memory(), config.clone());
    build_app_router(state, &config)
}

/// Build the full application router over a PostgreSQL pool.
pub fn build_test_app_with_pool(pool: PgPool) -> Router {
    let config = ServerConfig {
        storage_backend: StorageBackend::Postgres,
        ..test_config()
    };
    let state = AppState::new(CatalogStore::Postgres(pool), config.clone());
    build_app_router(state, &config)
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Send a request with a raw (possibly malformed) JSON body.
pub async fn post_raw(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// POST a body and return the created JSON, asserting 201.
pub async fn create(app: &Router, uri: &str, body: Value) -> Value {
    let response = post_json(app.clone(), uri, body).await;
    let status = response.status();
    let json = body_json(response).await;
    assert_eq!(status, axum::http::StatusCode::CREATED, "POST {uri}: {json}");
    json
}

pub async fn create_category(app: &Router, code: &str) -> Value {
    create(
        app,
        "/api/v1/categories",
        serde_json::json!({"name": format!("Category {code}"), "categoryCode": code}),
    )
    .await
}

pub async fn create_product(app: &Router, category_id: &Value, code: &str) -> Value {
    create(
        app,
        "/api/v1/products",
        serde_json::json!({
            "productCategoryId": category_id,
            "name": format!("Product {code}"),
            "productCode": code,
            "productType": "ACCOUNT",
            "currencyCode": "USD",
        }),
    )
    .await
}

/// Parent records every catalog resource can hang off.
pub struct Fixture {
    pub category: Value,
    pub product: Value,
    pub other_product: Value,
    pub fee_structure: Value,
    pub bundle: Value,
}

pub async fn seed(app: &Router) -> Fixture {
    let category = create_category(app, "FIX-CAT").await;
    let product = create_product(app, &category["id"], "FIX-P1").await;
    let other_product = create_product(app, &category["id"], "FIX-P2").await;
    let fee_structure = create(
        app,
        "/api/v1/fee-structures",
        serde_json::json!({
            "productId": product["id"],
            "name": "Standard fees",
            "feeStructureType": "FLAT",
            "effectiveDate": "2025-01-01",
        }),
    )
    .await;
    let bundle = create(
        app,
        "/api/v1/product-bundles",
        serde_json::json!({"name": "Fixture bundle", "bundleCode": "FIX-B"}),
    )
    .await;
    Fixture {
        category,
        product,
        other_product,
        fee_structure,
        bundle,
    }
}

/// One catalog resource: how to create it, how to change one field, and
/// which field an update that omits it must leave alone.
pub struct ResourceCase {
    pub path: &'static str,
    pub create: Value,
    pub update: Value,
    pub updated_field: &'static str,
    pub kept_field: &'static str,
    /// Nested list under the record's parent, if it has one.
    pub nested_list: Option<String>,
}

fn id_of(record: &Value) -> &str {
    record["id"].as_str().unwrap()
}

/// A case for every resource collection under `/api/v1`.
pub fn resource_cases(f: &Fixture) -> Vec<ResourceCase> {
    use serde_json::json;

    let category_id = id_of(&f.category);
    let product_id = id_of(&f.product);
    let under_product = |segment: &str| Some(format!("/api/v1/products/{product_id}/{segment}"));

    vec![
        ResourceCase {
            path: "/api/v1/categories",
            create: json!({"name": "Savings", "categoryCode": "SAV", "description": "Savings accounts"}),
            update: json!({"name": "Savings plus"}),
            updated_field: "name",
            kept_field: "description",
            nested_list: None,
        },
        ResourceCase {
            path: "/api/v1/product-subtypes",
            create: json!({
                "productCategoryId": f.category["id"],
                "name": "Premium",
                "subtypeCode": "PREM",
                "description": "High tier",
            }),
            update: json!({"name": "Premium plus"}),
            updated_field: "name",
            kept_field: "description",
            nested_list: Some(format!("/api/v1/categories/{category_id}/subtypes")),
        },
        ResourceCase {
            path: "/api/v1/products",
            create: json!({
                "productCategoryId": f.category["id"],
                "name": "Gold card",
                "productCode": "GOLD",
                "productType": "CARD",
                "description": "Metal card",
            }),
            update: json!({"name": "Gold card plus"}),
            updated_field: "name",
            kept_field: "description",
            nested_list: Some(format!("/api/v1/categories/{category_id}/products")),
        },
        ResourceCase {
            path: "/api/v1/product-features",
            create: json!({
                "productId": f.product["id"],
                "featureName": "Lounge access",
                "featureType": "BENEFIT",
                "featureDescription": "Airport lounges",
            }),
            update: json!({"featureName": "Lounge pass"}),
            updated_field: "featureName",
            kept_field: "featureDescription",
            nested_list: under_product("features"),
        },
        ResourceCase {
            path: "/api/v1/fee-structures",
            create: json!({
                "productId": f.product["id"],
                "name": "Premium fees",
                "feeStructureType": "TIERED",
                "description": "Premium tier",
                "effectiveDate": "2025-02-01",
            }),
            update: json!({"name": "Premium tier fees"}),
            updated_field: "name",
            kept_field: "description",
            nested_list: under_product("fee-structures"),
        },
        ResourceCase {
            path: "/api/v1/fee-components",
            create: json!({
                "feeStructureId": f.fee_structure["id"],
                "componentName": "Annual fee",
                "feeType": "MAINTENANCE",
                "calculationMethod": "FIXED",
                "amount": "95.00",
                "currencyCode": "USD",
                "frequency": "ANNUAL",
            }),
            update: json!({"componentName": "Annual card fee"}),
            updated_field: "componentName",
            kept_field: "amount",
            nested_list: Some(format!(
                "/api/v1/fee-structures/{}/components",
                id_of(&f.fee_structure)
            )),
        },
        ResourceCase {
            path: "/api/v1/product-pricing",
            create: json!({
                "productId": f.product["id"],
                "pricingType": "FIXED",
                "amount": "12.50",
                "currencyCode": "USD",
                "interestRate": "1.25",
                "effectiveDate": "2025-01-01",
            }),
            update: json!({"pricingType": "PROMOTIONAL"}),
            updated_field: "pricingType",
            kept_field: "amount",
            nested_list: under_product("pricing"),
        },
        ResourceCase {
            path: "/api/v1/product-lifecycles",
            create: json!({
                "productId": f.product["id"],
                "lifecycleStatus": "CONCEPT",
                "statusEffectiveDate": "2025-01-01",
                "reason": "Initial design",
            }),
            update: json!({"lifecycleStatus": "LAUNCHED"}),
            updated_field: "lifecycleStatus",
            kept_field: "reason",
            nested_list: under_product("lifecycles"),
        },
        ResourceCase {
            path: "/api/v1/product-limits",
            create: json!({
                "productId": f.product["id"],
                "limitType": "DAILY_AMOUNT",
                "minValue": "10",
                "maxValue": "5000",
                "currencyCode": "USD",
                "timePeriod": "DAILY",
            }),
            update: json!({"timePeriod": "CALENDAR_DAY"}),
            updated_field: "timePeriod",
            kept_field: "maxValue",
            nested_list: under_product("limits"),
        },
        ResourceCase {
            path: "/api/v1/product-localizations",
            create: json!({
                "productId": f.product["id"],
                "localeCode": "es-ES",
                "localizedName": "Cuenta",
                "localizedDescription": "Cuenta corriente",
            }),
            update: json!({"localizedName": "Cuenta nómina"}),
            updated_field: "localizedName",
            kept_field: "localizedDescription",
            nested_list: under_product("localizations"),
        },
        ResourceCase {
            path: "/api/v1/product-relationships",
            create: json!({
                "productId": f.product["id"],
                "relatedProductId": f.other_product["id"],
                "relationshipType": "UPGRADE",
                "description": "Step up",
            }),
            update: json!({"relationshipType": "SUBSTITUTE"}),
            updated_field: "relationshipType",
            kept_field: "description",
            nested_list: under_product("relationships"),
        },
        ResourceCase {
            path: "/api/v1/product-versions",
            create: json!({
                "productId": f.product["id"],
                "versionNumber": 1,
                "description": "Launch terms",
                "effectiveDate": "2025-01-01",
            }),
            update: json!({"changeSummary": "Rates revised"}),
            updated_field: "changeSummary",
            kept_field: "description",
            nested_list: under_product("versions"),
        },
        ResourceCase {
            path: "/api/v1/product-bundles",
            create: json!({"name": "Family pack", "bundleCode": "FAMILY", "description": "Two accounts"}),
            update: json!({"name": "Family pack plus"}),
            updated_field: "name",
            kept_field: "description",
            nested_list: None,
        },
        ResourceCase {
            path: "/api/v1/bundle-items",
            create: json!({
                "bundleId": f.bundle["id"],
                "productId": f.product["id"],
                "isMandatory": true,
                "sortOrder": 2,
            }),
            update: json!({"sortOrder": 3}),
            updated_field: "sortOrder",
            kept_field: "isMandatory",
            nested_list: Some(format!("/api/v1/product-bundles/{}/items", id_of(&f.bundle))),
        },
        ResourceCase {
            path: "/api/v1/product-documentation",
            create: json!({
                "productId": f.product["id"],
                "documentType": "ID_CARD",
                "description": "Government issued ID",
            }),
            update: json!({"documentType": "PASSPORT"}),
            updated_field: "documentType",
            kept_field: "description",
            nested_list: under_product("documentation"),
        },
    ]
}

/// Drive one resource through create, read, partial update and delete.
pub async fn exercise_resource(app: &Router, case: &ResourceCase) {
    use axum::http::StatusCode;

    let path = case.path;
    let created = create(app, path, case.create.clone()).await;
    let id = id_of(&created);
    let item_uri = format!("{path}/{id}");

    let response = get(app.clone(), &item_uri).await;
    assert_eq!(response.status(), StatusCode::OK, "GET {item_uri}");
    assert_eq!(body_json(response).await, created, "GET {item_uri}");

    if let Some(nested) = &case.nested_list {
        let response = get(app.clone(), nested).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {nested}");
        let page = body_json(response).await;
        let listed = page["content"]
            .as_array()
            .unwrap()
            .iter()
            .any(|row| row["id"] == created["id"]);
        assert!(listed, "{nested} should list {id}: {page}");
    }

    let response = put_json(app.clone(), &item_uri, case.update.clone()).await;
    assert_eq!(response.status(), StatusCode::OK, "PUT {item_uri}");
    let updated = body_json(response).await;
    let field = case.updated_field;
    assert_eq!(updated[field], case.update[field], "PUT {item_uri} {field}");
    let kept = case.kept_field;
    assert!(!created[kept].is_null(), "{path} fixture must set {kept}");
    assert_eq!(updated[kept], created[kept], "PUT {item_uri} kept {kept}");
    assert_eq!(updated["createdAt"], created["createdAt"], "PUT {item_uri}");

    let response = delete(app.clone(), &item_uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT, "DELETE {item_uri}");
    let response = get(app.clone(), &item_uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {item_uri} after delete");
}
