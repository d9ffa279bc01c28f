use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;
use vquotes_core::config::DatabaseConfig;

pub type DbPool = sqlx::SqlitePool;

/// Open a SQLite pool sized and timed from the `database` config section.
///
/// Every connection gets the same pragmas: foreign keys on (the catalog and
/// quote tables rely on referential actions), WAL so listing reads do not
/// block the quote insert path, and a busy timeout derived from
/// `timeout_secs` so contending writers queue instead of failing immediately.
pub async fn connect(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let timeout_secs = config.timeout_secs.max(1);
    let busy_timeout_ms = timeout_secs.saturating_mul(1_000).min(60_000);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(Duration::from_secs(timeout_secs))
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA foreign_keys = ON").execute(&mut *conn).await?;
                sqlx::query("PRAGMA journal_mode = WAL").execute(&mut *conn).await?;
                let busy_timeout = format!("PRAGMA busy_timeout = {busy_timeout_ms}");
                sqlx::query(&busy_timeout).execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect(&config.url)
        .await
}

#[cfg(test)]
mod tests {
    use vquotes_core::config::DatabaseConfig;

    use super::connect;

    fn memory_config(timeout_secs: u64) -> DatabaseConfig {
        DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            timeout_secs,
        }
    }

    #[tokio::test]
    async fn pragmas_follow_the_database_config() {
        let pool = connect(&memory_config(7)).await.expect("connect");

        let foreign_keys: i64 =
            sqlx::query_scalar("PRAGMA foreign_keys").fetch_one(&pool).await.expect("pragma");
        assert_eq!(foreign_keys, 1);

        let busy_timeout: i64 =
            sqlx::query_scalar("PRAGMA busy_timeout").fetch_one(&pool).await.expect("pragma");
        assert_eq!(busy_timeout, 7_000);

        pool.close().await;
    }

    #[tokio::test]
    async fn busy_timeout_is_capped_for_very_long_acquire_timeouts() {
        let pool = connect(&memory_config(300)).await.expect("connect");

        let busy_timeout: i64 =
            sqlx::query_scalar("PRAGMA busy_timeout").fetch_one(&pool).await.expect("pragma");
        assert_eq!(busy_timeout, 60_000);

        pool.close().await;
    }
}
