//! HTTP-level integration tests for the catalog resources.
//!
//! Requests go straight to the router via `tower::ServiceExt::oneshot`, over
//! the in-memory store.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create, create_category, create_product, delete, get, post_json, post_raw, put_json,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_category_returns_201_with_defaults() {
    let app = common::build_test_app();
    let category = create_category(&app, "RETAIL").await;

    assert_eq!(category["categoryCode"], "RETAIL");
    assert_eq!(category["isActive"], true);
    assert!(category["id"].is_string());
    assert!(category["createdAt"].is_string());
}

#[tokio::test]
async fn get_category_by_id() {
    let app = common::build_test_app();
    let created = create_category(&app, "GET").await;
    let id = created["id"].as_str().unwrap();

    let response = get(app, &format!("/api/v1/categories/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Category GET");
}

#[tokio::test]
async fn get_missing_record_returns_404() {
    let app = common::build_test_app();
    let id = uuid::Uuid::now_v7();

    let response = get(app, &format!("/api/v1/products/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], format!("Product with id {id} not found"));
}

#[tokio::test]
async fn product_status_defaults_to_draft() {
    let app = common::build_test_app();
    let category = create_category(&app, "C").await;
    let product = create_product(&app, &category["id"], "P-1").await;

    assert_eq!(product["status"], "DRAFT");
    assert_eq!(product["productType"], "ACCOUNT");
    assert_eq!(product["productCategoryId"], category["id"]);
}

#[tokio::test]
async fn update_preserves_omitted_fields() {
    let app = common::build_test_app();
    let category = create_category(&app, "C").await;
    let product = create(
        &app,
        "/api/v1/products",
        json!({
            "productCategoryId": category["id"],
            "name": "Everyday Checking",
            "productCode": "CHK-1",
            "description": "No monthly fee",
            "productType": "ACCOUNT",
        }),
    )
    .await;
    let id = product["id"].as_str().unwrap();

    let response = put_json(
        app.clone(),
        &format!("/api/v1/products/{id}"),
        json!({"name": "Premier Checking", "status": "ACTIVE", "description": null}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["name"], "Premier Checking");
    assert_eq!(json["status"], "ACTIVE");
    assert_eq!(json["productCode"], "CHK-1");
    assert_eq!(json["description"], "No monthly fee");
    assert_eq!(json["createdAt"], product["createdAt"]);
}

#[tokio::test]
async fn update_missing_record_returns_404() {
    let app = common::build_test_app();
    let id = uuid::Uuid::now_v7();

    let response = put_json(
        app,
        &format!("/api/v1/categories/{id}"),
        json!({"name": "Nope"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_returns_204_then_404() {
    let app = common::build_test_app();
    let category = create_category(&app, "DEL").await;
    let id = category["id"].as_str().unwrap();

    let response = delete(app.clone(), &format!("/api/v1/categories/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.clone(), &format!("/api/v1/categories/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(app, &format!("/api/v1/categories/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_is_paginated_and_sorted() {
    let app = common::build_test_app();
    for code in ["E", "B", "D", "A", "C"] {
        create_category(&app, code).await;
    }

    let response = get(
        app,
        "/api/v1/categories?page=1&size=2&sort=categoryCode,asc",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["totalElements"], 5);
    assert_eq!(json["totalPages"], 3);
    assert_eq!(json["page"], 1);
    assert_eq!(json["size"], 2);
    let codes: Vec<&str> = json["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["categoryCode"].as_str().unwrap())
        .collect();
    assert_eq!(codes, ["C", "D"]);
}

#[tokio::test]
async fn page_size_is_clamped() {
    let app = common::build_test_app();
    create_category(&app, "A").await;

    let json = body_json(get(app.clone(), "/api/v1/categories?size=500&page=-3").await).await;
    assert_eq!(json["size"], 100);
    assert_eq!(json["page"], 0);
    assert_eq!(json["content"].as_array().unwrap().len(), 1);

    let json = body_json(get(app, "/api/v1/categories?size=0").await).await;
    assert_eq!(json["size"], 1);
}

#[tokio::test]
async fn list_past_the_end_is_empty() {
    let app = common::build_test_app();
    create_category(&app, "A").await;

    let json = body_json(get(app, "/api/v1/categories?page=4").await).await;
    assert_eq!(json["totalElements"], 1);
    assert!(json["content"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn list_filters_by_name_and_enum() {
    let app = common::build_test_app();
    let category = create_category(&app, "C").await;
    create_product(&app, &category["id"], "SAV-1").await;
    let checking = create_product(&app, &category["id"], "CHK-1").await;
    create(
        &app,
        "/api/v1/products",
        json!({
            "productCategoryId": category["id"],
            "name": "Gold Card",
            "productCode": "CARD-1",
            "productType": "CARD",
        }),
    )
    .await;

    let json = body_json(get(app.clone(), "/api/v1/products?name=product%20chk").await).await;
    assert_eq!(json["totalElements"], 1);
    assert_eq!(json["content"][0]["id"], checking["id"]);

    let json = body_json(get(app.clone(), "/api/v1/products?productType=CARD").await).await;
    assert_eq!(json["totalElements"], 1);
    assert_eq!(json["content"][0]["productCode"], "CARD-1");

    let json = body_json(get(app, "/api/v1/products?status=ACTIVE").await).await;
    assert_eq!(json["totalElements"], 0);
}

#[tokio::test]
async fn list_filters_by_boolean() {
    let app = common::build_test_app();
    create_category(&app, "ON").await;
    create(
        &app,
        "/api/v1/categories",
        json!({"name": "Hidden", "categoryCode": "OFF", "isActive": false}),
    )
    .await;

    let json = body_json(get(app, "/api/v1/categories?isActive=false").await).await;
    assert_eq!(json["totalElements"], 1);
    assert_eq!(json["content"][0]["categoryCode"], "OFF");
}

#[tokio::test]
async fn unknown_sort_field_returns_400() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/products?sort=password,desc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn invalid_filter_value_returns_400() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/products?productType=SPACESHIP").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Nested lists
// ---------------------------------------------------------------------------

#[tokio::test]
async fn nested_list_returns_only_children_of_parent() {
    let app = common::build_test_app();
    let category = create_category(&app, "C").await;
    let first = create_product(&app, &category["id"], "P-1").await;
    let second = create_product(&app, &category["id"], "P-2").await;

    for (product, name) in [(&first, "Overdraft"), (&first, "Cashback"), (&second, "Mobile")] {
        create(
            &app,
            "/api/v1/product-features",
            json!({"productId": product["id"], "featureName": name, "featureType": "BENEFIT"}),
        )
        .await;
    }

    let id = first["id"].as_str().unwrap();
    let json = body_json(get(app.clone(), &format!("/api/v1/products/{id}/features")).await).await;
    assert_eq!(json["totalElements"], 2);
    for feature in json["content"].as_array().unwrap() {
        assert_eq!(feature["productId"], first["id"]);
        assert_eq!(feature["isMandatory"], false);
    }

    let category_id = category["id"].as_str().unwrap();
    let json = body_json(get(app, &format!("/api/v1/categories/{category_id}/products")).await).await;
    assert_eq!(json["totalElements"], 2);
}

#[tokio::test]
async fn nested_list_of_missing_parent_returns_404() {
    let app = common::build_test_app();
    let id = uuid::Uuid::now_v7();

    let response = get(app, &format!("/api/v1/fee-structures/{id}/components")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], format!("FeeStructure with id {id} not found"));
}

// ---------------------------------------------------------------------------
// Relationships between records
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_parent_returns_404_naming_the_parent() {
    let app = common::build_test_app();
    let category_id = uuid::Uuid::now_v7();

    let response = post_json(
        app,
        "/api/v1/products",
        json!({
            "productCategoryId": category_id,
            "name": "Orphan",
            "productCode": "ORPHAN",
            "productType": "LOAN",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        format!("ProductCategory with id {category_id} not found")
    );
}

#[tokio::test]
async fn duplicate_code_returns_409() {
    let app = common::build_test_app();
    let category = create_category(&app, "C").await;
    create_product(&app, &category["id"], "DUP").await;

    let response = post_json(
        app,
        "/api/v1/products",
        json!({
            "productCategoryId": category["id"],
            "name": "Again",
            "productCode": "DUP",
            "productType": "ACCOUNT",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn update_onto_existing_code_returns_409() {
    let app = common::build_test_app();
    create_category(&app, "TAKEN").await;
    let other = create_category(&app, "FREE").await;
    let id = other["id"].as_str().unwrap();

    let response = put_json(
        app,
        &format!("/api/v1/categories/{id}"),
        json!({"categoryCode": "TAKEN"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn deleting_referenced_category_returns_409() {
    let app = common::build_test_app();
    let category = create_category(&app, "C").await;
    create_product(&app, &category["id"], "P").await;
    let id = category["id"].as_str().unwrap();

    let response = delete(app.clone(), &format!("/api/v1/categories/{id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = get(app, &format!("/api/v1/categories/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn deleting_product_cascades_to_owned_records() {
    let app = common::build_test_app();
    let category = create_category(&app, "C").await;
    let product = create_product(&app, &category["id"], "P").await;

    let structure = create(
        &app,
        "/api/v1/fee-structures",
        json!({
            "productId": product["id"],
            "name": "Standard fees",
            "feeStructureType": "FLAT",
            "effectiveDate": "2025-01-01",
        }),
    )
    .await;
    let component = create(
        &app,
        "/api/v1/fee-components",
        json!({
            "feeStructureId": structure["id"],
            "componentName": "Monthly maintenance",
            "feeType": "MAINTENANCE",
            "calculationMethod": "FIXED",
            "amount": "5.00",
            "currencyCode": "USD",
            "frequency": "MONTHLY",
        }),
    )
    .await;

    let product_id = product["id"].as_str().unwrap();
    let response = delete(app.clone(), &format!("/api/v1/products/{product_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for uri in [
        format!("/api/v1/fee-structures/{}", structure["id"].as_str().unwrap()),
        format!("/api/v1/fee-components/{}", component["id"].as_str().unwrap()),
    ] {
        let response = get(app.clone(), &uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn bundle_items_are_unique_per_product() {
    let app = common::build_test_app();
    let category = create_category(&app, "C").await;
    let product = create_product(&app, &category["id"], "P").await;
    let bundle = create(
        &app,
        "/api/v1/product-bundles",
        json!({"name": "Starter pack", "bundleCode": "START"}),
    )
    .await;
    assert_eq!(bundle["status"], "DRAFT");

    let item = json!({"bundleId": bundle["id"], "productId": product["id"], "sortOrder": 1});
    create(&app, "/api/v1/bundle-items", item.clone()).await;

    let response = post_json(app.clone(), "/api/v1/bundle-items", item).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let bundle_id = bundle["id"].as_str().unwrap();
    let json = body_json(get(app, &format!("/api/v1/product-bundles/{bundle_id}/items")).await).await;
    assert_eq!(json["totalElements"], 1);
    assert_eq!(json["content"][0]["sortOrder"], 1);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_name_returns_400() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        "/api/v1/categories",
        json!({"name": "", "categoryCode": "X"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn end_date_before_launch_date_returns_400() {
    let app = common::build_test_app();
    let category = create_category(&app, "C").await;

    let response = post_json(
        app,
        "/api/v1/products",
        json!({
            "productCategoryId": category["id"],
            "name": "Backwards",
            "productCode": "BACK",
            "productType": "LOAN",
            "launchDate": "2025-06-01",
            "endDate": "2025-01-01",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn invariants_are_checked_after_merge() {
    let app = common::build_test_app();
    let category = create_category(&app, "C").await;
    let product = create(
        &app,
        "/api/v1/products",
        json!({
            "productCategoryId": category["id"],
            "name": "Term loan",
            "productCode": "LOAN-1",
            "productType": "LOAN",
            "launchDate": "2025-06-01",
        }),
    )
    .await;
    let id = product["id"].as_str().unwrap();

    let response = put_json(
        app,
        &format!("/api/v1/products/{id}"),
        json!({"endDate": "2025-01-01"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fixed_fee_component_requires_amount() {
    let app = common::build_test_app();
    let category = create_category(&app, "C").await;
    let product = create_product(&app, &category["id"], "P").await;
    let structure = create(
        &app,
        "/api/v1/fee-structures",
        json!({
            "productId": product["id"],
            "name": "Fees",
            "feeStructureType": "FLAT",
            "effectiveDate": "2025-01-01",
        }),
    )
    .await;

    let response = post_json(
        app,
        "/api/v1/fee-components",
        json!({
            "feeStructureId": structure["id"],
            "componentName": "Wire fee",
            "feeType": "TRANSACTION",
            "calculationMethod": "FIXED",
            "frequency": "PER_TRANSACTION",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn product_cannot_relate_to_itself() {
    let app = common::build_test_app();
    let category = create_category(&app, "C").await;
    let product = create_product(&app, &category["id"], "P").await;

    let response = post_json(
        app,
        "/api/v1/product-relationships",
        json!({
            "productId": product["id"],
            "relatedProductId": product["id"],
            "relationshipType": "UPGRADE",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_returns_400() {
    let app = common::build_test_app();
    let response = post_raw(app, "/api/v1/categories", "{\"name\": ").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn missing_required_field_returns_400() {
    let app = common::build_test_app();
    let response = post_json(app, "/api/v1/categories", json!({"name": "No code"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_id_returns_400() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/products/not-a-uuid").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}
