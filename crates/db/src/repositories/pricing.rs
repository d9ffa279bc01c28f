use async_trait::async_trait;
use sqlx::Row;

use vquotes_core::domain::catalog::ConfigurationId;
use vquotes_core::domain::pricing::{FeatureType, PriceOverride, PricingRule};

use super::{PricingRepository, RepositoryError};
use crate::DbPool;

pub struct SqlPricingRepository {
    pool: DbPool,
}

impl SqlPricingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PricingRepository for SqlPricingRepository {
    async fn load_rules(&self) -> Result<Vec<PricingRule>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT feature_type, feature_value, price_modifier FROM quote_rules ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let raw_feature_type: String = row.try_get("feature_type").map_err(decode)?;
                let feature_type: FeatureType = raw_feature_type
                    .parse()
                    .map_err(|error: vquotes_core::UnknownFeatureType| {
                        RepositoryError::Decode(error.to_string())
                    })?;

                Ok(PricingRule {
                    feature_type,
                    feature_value: row.try_get("feature_value").map_err(decode)?,
                    price_modifier: row.try_get("price_modifier").map_err(decode)?,
                })
            })
            .collect()
    }

    async fn load_overrides(&self) -> Result<Vec<PriceOverride>, RepositoryError> {
        let rows =
            sqlx::query("SELECT model_style_year_id, price FROM quote_overrides ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|row| {
                Ok(PriceOverride {
                    configuration_id: ConfigurationId(
                        row.try_get("model_style_year_id").map_err(decode)?,
                    ),
                    price: row.try_get("price").map_err(decode)?,
                })
            })
            .collect()
    }
}

fn decode(error: sqlx::Error) -> RepositoryError {
    RepositoryError::Decode(error.to_string())
}
