use async_trait::async_trait;
use thiserror::Error;

use vquotes_core::domain::catalog::{BodyType, RegisteredVehicle, Size};
use vquotes_core::domain::pricing::{PriceOverride, PricingRule};
use vquotes_core::domain::quote::QuoteRecord;

pub mod catalog;
pub mod memory;
pub mod pricing;
pub mod quote;

pub use catalog::SqlCatalogRepository;
pub use memory::{InMemoryCatalogRepository, InMemoryPricingRepository, InMemoryQuoteRepository};
pub use pricing::SqlPricingRepository;
pub use quote::SqlQuoteRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(sqlx::Error),
    #[error("unique constraint violation: {0}")]
    UniqueViolation(String),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            if db_error.is_unique_violation() {
                return Self::UniqueViolation(db_error.message().to_string());
            }
        }
        Self::Database(error)
    }
}

/// Read access to catalog reference data. Mutated only by administrative
/// flows outside this service; the engine treats it as immutable.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Exact, case-sensitive lookup. `None` is fatal to the enclosing quote
    /// request: the caller referenced a body type the catalog does not have.
    async fn find_body_type(&self, name: &str) -> Result<Option<BodyType>, RepositoryError>;
    async fn find_size(&self, name: &str) -> Result<Option<Size>, RepositoryError>;
    async fn load_registered_vehicles(&self) -> Result<Vec<RegisteredVehicle>, RepositoryError>;
}

/// Read access to pricing rules and configuration-specific overrides, loaded
/// in full per evaluation to snapshot the calculation inputs.
#[async_trait]
pub trait PricingRepository: Send + Sync {
    async fn load_rules(&self) -> Result<Vec<PricingRule>, RepositoryError>;
    async fn load_overrides(&self) -> Result<Vec<PriceOverride>, RepositoryError>;
}

/// Append-only quote history. One insert per successful calculation, no
/// updates or deletes.
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn insert(&self, record: QuoteRecord) -> Result<(), RepositoryError>;
    async fn list_all(&self) -> Result<Vec<QuoteRecord>, RepositoryError>;
}
