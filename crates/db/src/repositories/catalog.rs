use async_trait::async_trait;
use sqlx::Row;

use vquotes_core::domain::catalog::{
    BodyType, BodyTypeId, ConfigurationId, RegisteredVehicle, Size, SizeId,
};

use super::{CatalogRepository, RepositoryError};
use crate::DbPool;

pub struct SqlCatalogRepository {
    pool: DbPool,
}

impl SqlCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for SqlCatalogRepository {
    async fn find_body_type(&self, name: &str) -> Result<Option<BodyType>, RepositoryError> {
        let row = sqlx::query("SELECT id, name FROM body_types WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            Ok(BodyType {
                id: BodyTypeId(row.try_get("id").map_err(decode)?),
                name: row.try_get("name").map_err(decode)?,
            })
        })
        .transpose()
    }

    async fn find_size(&self, name: &str) -> Result<Option<Size>, RepositoryError> {
        let row = sqlx::query("SELECT id, name FROM sizes WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            Ok(Size {
                id: SizeId(row.try_get("id").map_err(decode)?),
                name: row.try_get("name").map_err(decode)?,
            })
        })
        .transpose()
    }

    async fn load_registered_vehicles(&self) -> Result<Vec<RegisteredVehicle>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT msy.id, mk.name AS make, m.name AS model,
                   bt.name AS body_type, s.name AS size, msy.year
            FROM model_style_years msy
            JOIN model_styles ms ON ms.id = msy.model_style_id
            JOIN models m ON m.id = ms.model_id
            JOIN makes mk ON mk.id = m.make_id
            JOIN body_types bt ON bt.id = ms.body_type_id
            JOIN sizes s ON s.id = ms.size_id
            ORDER BY msy.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(RegisteredVehicle {
                    id: ConfigurationId(row.try_get("id").map_err(decode)?),
                    make: row.try_get("make").map_err(decode)?,
                    model: row.try_get("model").map_err(decode)?,
                    body_type: row.try_get("body_type").map_err(decode)?,
                    size: row.try_get("size").map_err(decode)?,
                    year: row.try_get("year").map_err(decode)?,
                })
            })
            .collect()
    }
}

fn decode(error: sqlx::Error) -> RepositoryError {
    RepositoryError::Decode(error.to_string())
}
