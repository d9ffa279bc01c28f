use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

#[cfg(test)]
mod tests {
    use sqlx::Row;
    use vquotes_core::config::DatabaseConfig;

    use super::run_pending;
    use crate::{connect, DbPool};

    async fn memory_pool() -> DbPool {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            timeout_secs: 30,
        };
        connect(&config).await.expect("connect")
    }

    const MANAGED_SCHEMA_OBJECTS: &[&str] = &[
        "body_types",
        "sizes",
        "makes",
        "models",
        "model_styles",
        "model_style_years",
        "quote_rules",
        "quote_overrides",
        "quotes",
        "idx_models_make_id",
        "idx_model_styles_model_id",
        "idx_model_style_years_model_style_id",
        "idx_quotes_created_at",
        "idx_quotes_model_style_year_id",
    ];

    #[tokio::test]
    async fn migrations_create_every_managed_schema_object() {
        let pool = memory_pool().await;
        run_pending(&pool).await.expect("run migrations");

        for object in MANAGED_SCHEMA_OBJECTS {
            let count = sqlx::query(
                "SELECT COUNT(*) AS count FROM sqlite_master WHERE name = ?",
            )
            .bind(object)
            .fetch_one(&pool)
            .await
            .expect("query sqlite_master")
            .get::<i64, _>("count");

            assert_eq!(count, 1, "schema object `{object}` should exist after migrations");
        }

        pool.close().await;
    }

    #[tokio::test]
    async fn migrations_are_idempotent_on_rerun() {
        let pool = memory_pool().await;
        run_pending(&pool).await.expect("first run");
        run_pending(&pool).await.expect("second run is a no-op");
        pool.close().await;
    }

    #[tokio::test]
    async fn seed_migration_loads_the_catalog_reference_rows() {
        let pool = memory_pool().await;
        run_pending(&pool).await.expect("run migrations");

        let body_types: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM body_types")
            .fetch_one(&pool)
            .await
            .expect("count body types");
        let sizes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sizes")
            .fetch_one(&pool)
            .await
            .expect("count sizes");

        assert_eq!(body_types, 9);
        assert_eq!(sizes, 4);

        pool.close().await;
    }
}
