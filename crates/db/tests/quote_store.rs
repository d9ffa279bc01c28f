use chrono::Utc;
use uuid::Uuid;

use vquotes_core::domain::catalog::{BodyTypeId, SizeId};
use vquotes_core::domain::pricing::FeatureType;
use vquotes_core::domain::quote::{ConditionFlags, QuoteId, QuoteRecord, VehicleDescription};
use vquotes_db::repositories::{
    CatalogRepository, PricingRepository, QuoteRepository, RepositoryError, SqlCatalogRepository,
    SqlPricingRepository, SqlQuoteRepository,
};
use vquotes_core::config::DatabaseConfig;
use vquotes_db::{connect, migrations, seed_demo_data, DbPool};

async fn seeded_pool() -> DbPool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        timeout_secs: 30,
    };
    let pool = connect(&config).await.expect("connect");
    migrations::run_pending(&pool).await.expect("migrate");
    seed_demo_data(&pool).await.expect("seed");
    pool
}

fn civic_record(id: &str) -> QuoteRecord {
    QuoteRecord {
        id: QuoteId(id.to_string()),
        configuration_id: None,
        vehicle: VehicleDescription {
            year: "2015".to_string(),
            make: "Honda".to_string(),
            model: "Civic".to_string(),
            body_type: "Sedan".to_string(),
            size: "Compact".to_string(),
        },
        body_type_id: BodyTypeId(2),
        size_id: SizeId(2),
        conditions: ConditionFlags { has_key: true, ..ConditionFlags::default() },
        offered_quote: 150,
        message: "This is our final offer.".to_string(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn catalog_lookup_resolves_seeded_names_exactly() {
    let pool = seeded_pool().await;
    let catalog = SqlCatalogRepository::new(pool.clone());

    let sedan = catalog.find_body_type("Sedan").await.expect("lookup").expect("seeded");
    assert_eq!(sedan.name, "Sedan");

    let compact = catalog.find_size("Compact").await.expect("lookup").expect("seeded");
    assert_eq!(compact.name, "Compact");

    assert!(catalog.find_body_type("sedan").await.expect("lookup").is_none());
    assert!(catalog.find_size("Gigantic").await.expect("lookup").is_none());

    pool.close().await;
}

#[tokio::test]
async fn registered_vehicles_are_denormalized_to_names() {
    let pool = seeded_pool().await;
    let catalog = SqlCatalogRepository::new(pool.clone());

    let registered = catalog.load_registered_vehicles().await.expect("load");

    let civic_2020 = registered
        .iter()
        .find(|vehicle| {
            vehicle.make == "Honda"
                && vehicle.model == "Civic"
                && vehicle.body_type == "Sedan"
                && vehicle.size == "Compact"
                && vehicle.year == "2020"
        })
        .expect("seeded 2020 Civic Sedan Compact");

    assert!(civic_2020.id.0 > 0);
    assert_eq!(registered.len(), 15, "every seeded style year is one configuration");

    pool.close().await;
}

#[tokio::test]
async fn pricing_snapshot_rows_decode_into_typed_rules() {
    let pool = seeded_pool().await;
    let pricing = SqlPricingRepository::new(pool.clone());

    let rules = pricing.load_rules().await.expect("load rules");
    let engine_rule = rules
        .iter()
        .find(|rule| rule.feature_type == FeatureType::HasEngine && rule.feature_value == "false")
        .expect("seeded engine deduction");
    assert_eq!(engine_rule.price_modifier, -500);

    let overrides = pricing.load_overrides().await.expect("load overrides");
    assert_eq!(overrides.len(), 1);
    assert_eq!(overrides[0].price, 4000);

    pool.close().await;
}

#[tokio::test]
async fn seeding_twice_does_not_duplicate_reference_data() {
    let pool = seeded_pool().await;
    seed_demo_data(&pool).await.expect("second seed is idempotent");

    let pricing = SqlPricingRepository::new(pool.clone());
    assert_eq!(pricing.load_overrides().await.expect("load").len(), 1);

    let catalog = SqlCatalogRepository::new(pool.clone());
    assert_eq!(catalog.load_registered_vehicles().await.expect("load").len(), 15);

    pool.close().await;
}

#[tokio::test]
async fn quote_records_round_trip_through_the_store() {
    let pool = seeded_pool().await;
    let quotes = SqlQuoteRepository::new(pool.clone());

    let record = civic_record(&Uuid::new_v4().to_string());
    quotes.insert(record.clone()).await.expect("insert");

    let listed = quotes.list_all().await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, record.id);
    assert_eq!(listed[0].vehicle, record.vehicle);
    assert_eq!(listed[0].conditions, record.conditions);
    assert_eq!(listed[0].offered_quote, 150);
    assert_eq!(listed[0].configuration_id, None);

    pool.close().await;
}

#[tokio::test]
async fn duplicate_quote_id_surfaces_as_unique_violation() {
    let pool = seeded_pool().await;
    let quotes = SqlQuoteRepository::new(pool.clone());

    let id = Uuid::new_v4().to_string();
    quotes.insert(civic_record(&id)).await.expect("first insert");

    let error = quotes.insert(civic_record(&id)).await.expect_err("duplicate insert");
    assert!(matches!(error, RepositoryError::UniqueViolation(_)));

    pool.close().await;
}
