//! PostgreSQL repository tests.
//!
//! `#[sqlx::test]` gives every test its own database, created from
//! `DATABASE_URL` and migrated before the test body runs.

use assert_matches::assert_matches;
use rust_decimal::Decimal;
use sqlx::PgPool;

use catalog_core::entity::EntityKind;
use catalog_core::pagination::PageRequest;
use catalog_core::types::new_id;
use catalog_db::models::category::{CreateProductCategory, ProductCategory};
use catalog_db::models::enums::{CalculationMethod, FeeFrequency, FeeStructureType, FeeType};
use catalog_db::models::enums::{ProductStatus, ProductType};
use catalog_db::models::enums::PricingType;
use catalog_db::models::fee::{CreateFeeComponent, CreateFeeStructure, FeeComponent, FeeStructure};
use catalog_db::models::pricing::{CreateProductPricing, ProductPricing};
use catalog_db::models::product::{CreateProduct, Product, UpdateProduct};
use catalog_db::record::{CatalogRecord, FilterClause, ListQuery};
use catalog_db::repositories::CatalogRepo;
use catalog_db::StoreError;

fn unique_code(prefix: &str) -> String {
    format!("{prefix}-{}", &new_id().simple().to_string()[20..])
}

fn category() -> ProductCategory {
    ProductCategory::from_create(
        new_id(),
        CreateProductCategory {
            name: "Cards".into(),
            category_code: unique_code("CAT"),
            description: None,
            parent_category_id: None,
            is_active: None,
        },
        chrono::Utc::now(),
    )
}

fn product(category_id: uuid::Uuid) -> Product {
    Product::from_create(
        new_id(),
        CreateProduct {
            product_category_id: category_id,
            product_subtype_id: None,
            name: "Platinum Card".into(),
            product_code: unique_code("PRD"),
            description: Some("Premium credit card".into()),
            product_type: ProductType::Card,
            status: None,
            currency_code: Some("GBP".into()),
            launch_date: None,
            end_date: None,
        },
        chrono::Utc::now(),
    )
}

#[sqlx::test(migrations = "./migrations")]
async fn postgres_crud_flow(pool: PgPool) {
    let cat = CatalogRepo::create(&pool, &category()).await.unwrap();
    let created = CatalogRepo::create(&pool, &product(cat.id)).await.unwrap();
    assert_eq!(created.status, ProductStatus::Draft);
    assert_eq!(created.product_type, ProductType::Card);

    let fetched: Product = CatalogRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .expect("product should exist");
    assert_eq!(fetched.product_code, created.product_code);
    assert_eq!(fetched.description.as_deref(), Some("Premium credit card"));

    let mut changed = fetched.clone();
    changed.apply_update(
        UpdateProduct {
            status: Some(ProductStatus::Active),
            ..Default::default()
        },
        chrono::Utc::now(),
    );
    let updated = CatalogRepo::update(&pool, &changed)
        .await
        .unwrap()
        .expect("row should be updated");
    assert_eq!(updated.status, ProductStatus::Active);
    assert_eq!(updated.name, "Platinum Card");

    let query = ListQuery::new(
        vec![
            FilterClause::eq("product_category_id", cat.id),
            FilterClause::eq("status", ProductStatus::Active),
        ],
        PageRequest::default(),
    );
    let page = CatalogRepo::list::<Product>(&pool, &query).await.unwrap();
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].id, created.id);

    assert!(CatalogRepo::delete(&pool, EntityKind::Product, created.id)
        .await
        .unwrap());
    assert!(!CatalogRepo::exists(&pool, EntityKind::Product, created.id)
        .await
        .unwrap());
    assert!(CatalogRepo::delete(&pool, EntityKind::Category, cat.id)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn postgres_unique_and_restrict_violations_are_classified(pool: PgPool) {
    let cat = CatalogRepo::create(&pool, &category()).await.unwrap();
    let mut duplicate = category();
    duplicate.category_code = cat.category_code.clone();
    let err: StoreError = CatalogRepo::create(&pool, &duplicate).await.unwrap_err().into();
    assert_matches!(err, StoreError::UniqueViolation(name) if name == "uq_product_categories_category_code");

    let p = CatalogRepo::create(&pool, &product(cat.id)).await.unwrap();
    let err: StoreError = CatalogRepo::delete(&pool, EntityKind::Category, cat.id)
        .await
        .unwrap_err()
        .into();
    assert_matches!(err, StoreError::ReferenceViolation(_));

    CatalogRepo::delete(&pool, EntityKind::Product, p.id).await.unwrap();
    CatalogRepo::delete(&pool, EntityKind::Category, cat.id).await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn postgres_delete_cascades_through_fee_structures(pool: PgPool) {
    let now = chrono::Utc::now();
    let cat = CatalogRepo::create(&pool, &category()).await.unwrap();
    let p = CatalogRepo::create(&pool, &product(cat.id)).await.unwrap();
    let structure = CatalogRepo::create(
        &pool,
        &FeeStructure::from_create(
            new_id(),
            CreateFeeStructure {
                product_id: p.id,
                name: "Annual fees".into(),
                fee_structure_type: FeeStructureType::Flat,
                description: None,
                effective_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                expiration_date: None,
            },
            now,
        ),
    )
    .await
    .unwrap();
    let component = CatalogRepo::create(
        &pool,
        &FeeComponent::from_create(
            new_id(),
            CreateFeeComponent {
                fee_structure_id: structure.id,
                component_name: "Annual fee".into(),
                fee_type: FeeType::Maintenance,
                calculation_method: CalculationMethod::Fixed,
                amount: Some(Decimal::new(9500, 2)),
                rate: None,
                currency_code: Some("GBP".into()),
                frequency: FeeFrequency::Annual,
                min_amount: None,
                max_amount: None,
            },
            now,
        ),
    )
    .await
    .unwrap();
    assert_eq!(component.amount, Some(Decimal::new(9500, 2)));

    CatalogRepo::delete(&pool, EntityKind::Product, p.id).await.unwrap();
    assert!(!CatalogRepo::exists(&pool, FeeStructure::KIND, structure.id)
        .await
        .unwrap());
    assert!(!CatalogRepo::exists(&pool, FeeComponent::KIND, component.id)
        .await
        .unwrap());

    CatalogRepo::delete(&pool, EntityKind::Category, cat.id).await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn postgres_stores_values_at_the_numeric_column_bounds(pool: PgPool) {
    let cat = CatalogRepo::create(&pool, &category()).await.unwrap();
    let p = CatalogRepo::create(&pool, &product(cat.id)).await.unwrap();

    let widest: Decimal = "999999999999999.9999".parse().unwrap();
    let pricing = ProductPricing::from_create(
        new_id(),
        CreateProductPricing {
            product_id: p.id,
            pricing_type: PricingType::Fixed,
            amount: widest,
            currency_code: "GBP".into(),
            interest_rate: Some("999.999999".parse().unwrap()),
            effective_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            expiry_date: None,
            is_active: None,
        },
        chrono::Utc::now(),
    );
    assert!(pricing.check_invariants().is_ok());

    let stored = CatalogRepo::create(&pool, &pricing).await.unwrap();
    assert_eq!(stored.amount, widest);
    assert_eq!(stored.interest_rate, Some("999.999999".parse().unwrap()));
}
