use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use vquotes_core::domain::catalog::{BodyTypeId, ConfigurationId, SizeId};
use vquotes_core::domain::quote::{
    ConditionFlags, QuoteId, QuoteRecord, VehicleDescription,
};

use super::{QuoteRepository, RepositoryError};
use crate::DbPool;

pub struct SqlQuoteRepository {
    pool: DbPool,
}

impl SqlQuoteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuoteRepository for SqlQuoteRepository {
    async fn insert(&self, record: QuoteRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO quotes (
                id, model_style_year_id, year, make, model, body_type_id, size_id,
                it_moves, has_all_wheels, has_alloy_wheels, has_all_tires, has_key,
                has_title, requires_pickup, has_engine, has_transmission,
                has_complete_interior, offered_quote, message, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id.0)
        .bind(record.configuration_id.map(|id| id.0))
        .bind(&record.vehicle.year)
        .bind(&record.vehicle.make)
        .bind(&record.vehicle.model)
        .bind(record.body_type_id.0)
        .bind(record.size_id.0)
        .bind(record.conditions.it_moves)
        .bind(record.conditions.has_all_wheels)
        .bind(record.conditions.has_alloy_wheels)
        .bind(record.conditions.has_all_tires)
        .bind(record.conditions.has_key)
        .bind(record.conditions.has_title)
        .bind(record.conditions.requires_pickup)
        .bind(record.conditions.has_engine)
        .bind(record.conditions.has_transmission)
        .bind(record.conditions.has_complete_interior)
        .bind(record.offered_quote)
        .bind(&record.message)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<QuoteRecord>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT q.id, q.model_style_year_id, q.year, q.make, q.model,
                   q.body_type_id, q.size_id, bt.name AS body_type, s.name AS size,
                   q.it_moves, q.has_all_wheels, q.has_alloy_wheels, q.has_all_tires,
                   q.has_key, q.has_title, q.requires_pickup, q.has_engine,
                   q.has_transmission, q.has_complete_interior,
                   q.offered_quote, q.message, q.created_at
            FROM quotes q
            JOIN body_types bt ON bt.id = q.body_type_id
            JOIN sizes s ON s.id = q.size_id
            ORDER BY q.created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_record).collect()
    }
}

fn decode_record(row: &SqliteRow) -> Result<QuoteRecord, RepositoryError> {
    let raw_created_at: String = row.try_get("created_at").map_err(decode)?;
    let created_at = DateTime::parse_from_rfc3339(&raw_created_at)
        .map_err(|error| {
            RepositoryError::Decode(format!("invalid created_at `{raw_created_at}`: {error}"))
        })?
        .with_timezone(&Utc);

    Ok(QuoteRecord {
        id: QuoteId(row.try_get("id").map_err(decode)?),
        configuration_id: row
            .try_get::<Option<i64>, _>("model_style_year_id")
            .map_err(decode)?
            .map(ConfigurationId),
        vehicle: VehicleDescription {
            year: row.try_get("year").map_err(decode)?,
            make: row.try_get("make").map_err(decode)?,
            model: row.try_get("model").map_err(decode)?,
            body_type: row.try_get("body_type").map_err(decode)?,
            size: row.try_get("size").map_err(decode)?,
        },
        body_type_id: BodyTypeId(row.try_get("body_type_id").map_err(decode)?),
        size_id: SizeId(row.try_get("size_id").map_err(decode)?),
        conditions: ConditionFlags {
            it_moves: row.try_get("it_moves").map_err(decode)?,
            has_all_wheels: row.try_get("has_all_wheels").map_err(decode)?,
            has_alloy_wheels: row.try_get("has_alloy_wheels").map_err(decode)?,
            has_all_tires: row.try_get("has_all_tires").map_err(decode)?,
            has_key: row.try_get("has_key").map_err(decode)?,
            has_title: row.try_get("has_title").map_err(decode)?,
            requires_pickup: row.try_get("requires_pickup").map_err(decode)?,
            has_engine: row.try_get("has_engine").map_err(decode)?,
            has_transmission: row.try_get("has_transmission").map_err(decode)?,
            has_complete_interior: row.try_get("has_complete_interior").map_err(decode)?,
        },
        offered_quote: row.try_get("offered_quote").map_err(decode)?,
        message: row.try_get("message").map_err(decode)?,
        created_at,
    })
}

fn decode(error: sqlx::Error) -> RepositoryError {
    RepositoryError::Decode(error.to_string())
}
