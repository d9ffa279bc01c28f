use async_trait::async_trait;
use tokio::sync::RwLock;

use vquotes_core::domain::catalog::{BodyType, RegisteredVehicle, Size};
use vquotes_core::domain::pricing::{PriceOverride, PricingRule};
use vquotes_core::domain::quote::QuoteRecord;

use super::{CatalogRepository, PricingRepository, QuoteRepository, RepositoryError};

/// In-memory catalog used by tests. Reference data is fixed at construction,
/// matching the engine's read-only view of the real catalog.
#[derive(Default)]
pub struct InMemoryCatalogRepository {
    body_types: Vec<BodyType>,
    sizes: Vec<Size>,
    registered: Vec<RegisteredVehicle>,
}

impl InMemoryCatalogRepository {
    pub fn new(
        body_types: Vec<BodyType>,
        sizes: Vec<Size>,
        registered: Vec<RegisteredVehicle>,
    ) -> Self {
        Self { body_types, sizes, registered }
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn find_body_type(&self, name: &str) -> Result<Option<BodyType>, RepositoryError> {
        Ok(self.body_types.iter().find(|body_type| body_type.name == name).cloned())
    }

    async fn find_size(&self, name: &str) -> Result<Option<Size>, RepositoryError> {
        Ok(self.sizes.iter().find(|size| size.name == name).cloned())
    }

    async fn load_registered_vehicles(&self) -> Result<Vec<RegisteredVehicle>, RepositoryError> {
        Ok(self.registered.clone())
    }
}

#[derive(Default)]
pub struct InMemoryPricingRepository {
    rules: Vec<PricingRule>,
    overrides: Vec<PriceOverride>,
}

impl InMemoryPricingRepository {
    pub fn new(rules: Vec<PricingRule>, overrides: Vec<PriceOverride>) -> Self {
        Self { rules, overrides }
    }
}

#[async_trait]
impl PricingRepository for InMemoryPricingRepository {
    async fn load_rules(&self) -> Result<Vec<PricingRule>, RepositoryError> {
        Ok(self.rules.clone())
    }

    async fn load_overrides(&self) -> Result<Vec<PriceOverride>, RepositoryError> {
        Ok(self.overrides.clone())
    }
}

#[derive(Default)]
pub struct InMemoryQuoteRepository {
    records: RwLock<Vec<QuoteRecord>>,
}

#[async_trait]
impl QuoteRepository for InMemoryQuoteRepository {
    async fn insert(&self, record: QuoteRecord) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        if records.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::UniqueViolation(format!(
                "quote id `{}` already exists",
                record.id.0
            )));
        }
        records.push(record);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<QuoteRecord>, RepositoryError> {
        Ok(self.records.read().await.clone())
    }
}
