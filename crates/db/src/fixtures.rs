use sqlx::Row;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Deterministic demo catalog: one (make, model, body type, size) style per
/// row, registered for the listed years. Used by `vquotes seed` and the
/// integration tests; safe to re-run, every insert is idempotent.
const SEED_STYLES: &[SeedStyle] = &[
    SeedStyle {
        make: "Honda",
        model: "Civic",
        body_type: "Sedan",
        size: "Compact",
        years: &["2018", "2019", "2020", "2021", "2022"],
    },
    SeedStyle {
        make: "Honda",
        model: "Civic",
        body_type: "Hatchback",
        size: "Compact",
        years: &["2019", "2020", "2021"],
    },
    SeedStyle {
        make: "Toyota",
        model: "Corolla",
        body_type: "Sedan",
        size: "Compact",
        years: &["2017", "2018", "2019", "2020"],
    },
    SeedStyle {
        make: "Ford",
        model: "F-150",
        body_type: "Truck",
        size: "Full Size",
        years: &["2016", "2017", "2018"],
    },
];

/// Demo pricing rules. At most one row per (feature type, feature value);
/// values with no rule intentionally price at zero adjustment.
const SEED_RULES: &[(&str, &str, i64)] = &[
    ("it_moves", "true", 250),
    ("has_key", "true", 100),
    ("has_title", "false", -400),
    ("requires_pickup", "true", -150),
    ("has_engine", "false", -500),
    ("has_transmission", "false", -300),
    ("has_complete_interior", "true", 200),
];

/// Demo override: the 2020 Honda Civic Sedan Compact always quotes 4000.
const SEED_OVERRIDE: SeedOverride = SeedOverride {
    make: "Honda",
    model: "Civic",
    body_type: "Sedan",
    size: "Compact",
    year: "2020",
    price: 4000,
};

struct SeedStyle {
    make: &'static str,
    model: &'static str,
    body_type: &'static str,
    size: &'static str,
    years: &'static [&'static str],
}

struct SeedOverride {
    make: &'static str,
    model: &'static str,
    body_type: &'static str,
    size: &'static str,
    year: &'static str,
    price: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub makes: usize,
    pub models: usize,
    pub styles: usize,
    pub configurations: usize,
    pub rules: usize,
    pub overrides: usize,
}

/// Load the deterministic demo dataset on top of the migrated schema.
pub async fn seed_demo_data(pool: &DbPool) -> Result<SeedSummary, RepositoryError> {
    let mut summary = SeedSummary::default();
    let mut seen_makes = Vec::new();
    let mut seen_models = Vec::new();

    for style in SEED_STYLES {
        let make_id = ensure_make(pool, style.make).await?;
        if !seen_makes.contains(&make_id) {
            seen_makes.push(make_id);
        }

        let model_id = ensure_model(pool, make_id, style.model).await?;
        if !seen_models.contains(&model_id) {
            seen_models.push(model_id);
        }

        let style_id = ensure_style(pool, model_id, style.body_type, style.size).await?;
        summary.styles += 1;

        for year in style.years {
            ensure_style_year(pool, style_id, year).await?;
            summary.configurations += 1;
        }
    }

    summary.makes = seen_makes.len();
    summary.models = seen_models.len();

    for (feature_type, feature_value, price_modifier) in SEED_RULES {
        sqlx::query(
            "INSERT OR IGNORE INTO quote_rules (feature_type, feature_value, price_modifier)
             VALUES (?, ?, ?)",
        )
        .bind(feature_type)
        .bind(feature_value)
        .bind(price_modifier)
        .execute(pool)
        .await?;
        summary.rules += 1;
    }

    let configuration_id = find_configuration_id(
        pool,
        SEED_OVERRIDE.make,
        SEED_OVERRIDE.model,
        SEED_OVERRIDE.body_type,
        SEED_OVERRIDE.size,
        SEED_OVERRIDE.year,
    )
    .await?;
    sqlx::query(
        "INSERT OR IGNORE INTO quote_overrides (model_style_year_id, price) VALUES (?, ?)",
    )
    .bind(configuration_id)
    .bind(SEED_OVERRIDE.price)
    .execute(pool)
    .await?;
    summary.overrides = 1;

    Ok(summary)
}

async fn ensure_make(pool: &DbPool, name: &str) -> Result<i64, RepositoryError> {
    sqlx::query("INSERT OR IGNORE INTO makes (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await?;

    let row = sqlx::query("SELECT id FROM makes WHERE name = ?")
        .bind(name)
        .fetch_one(pool)
        .await?;
    row.try_get("id").map_err(|error| RepositoryError::Decode(error.to_string()))
}

async fn ensure_model(pool: &DbPool, make_id: i64, name: &str) -> Result<i64, RepositoryError> {
    sqlx::query("INSERT OR IGNORE INTO models (make_id, name) VALUES (?, ?)")
        .bind(make_id)
        .bind(name)
        .execute(pool)
        .await?;

    let row = sqlx::query("SELECT id FROM models WHERE make_id = ? AND name = ?")
        .bind(make_id)
        .bind(name)
        .fetch_one(pool)
        .await?;
    row.try_get("id").map_err(|error| RepositoryError::Decode(error.to_string()))
}

async fn ensure_style(
    pool: &DbPool,
    model_id: i64,
    body_type: &str,
    size: &str,
) -> Result<i64, RepositoryError> {
    sqlx::query(
        "INSERT OR IGNORE INTO model_styles (model_id, body_type_id, size_id)
         SELECT ?, bt.id, s.id FROM body_types bt, sizes s
         WHERE bt.name = ? AND s.name = ?",
    )
    .bind(model_id)
    .bind(body_type)
    .bind(size)
    .execute(pool)
    .await?;

    let row = sqlx::query(
        "SELECT ms.id FROM model_styles ms
         JOIN body_types bt ON bt.id = ms.body_type_id
         JOIN sizes s ON s.id = ms.size_id
         WHERE ms.model_id = ? AND bt.name = ? AND s.name = ?",
    )
    .bind(model_id)
    .bind(body_type)
    .bind(size)
    .fetch_one(pool)
    .await?;
    row.try_get("id").map_err(|error| RepositoryError::Decode(error.to_string()))
}

async fn ensure_style_year(
    pool: &DbPool,
    style_id: i64,
    year: &str,
) -> Result<(), RepositoryError> {
    sqlx::query("INSERT OR IGNORE INTO model_style_years (model_style_id, year) VALUES (?, ?)")
        .bind(style_id)
        .bind(year)
        .execute(pool)
        .await?;
    Ok(())
}

async fn find_configuration_id(
    pool: &DbPool,
    make: &str,
    model: &str,
    body_type: &str,
    size: &str,
    year: &str,
) -> Result<i64, RepositoryError> {
    let row = sqlx::query(
        "SELECT msy.id FROM model_style_years msy
         JOIN model_styles ms ON ms.id = msy.model_style_id
         JOIN models m ON m.id = ms.model_id
         JOIN makes mk ON mk.id = m.make_id
         JOIN body_types bt ON bt.id = ms.body_type_id
         JOIN sizes s ON s.id = ms.size_id
         WHERE mk.name = ? AND m.name = ? AND bt.name = ? AND s.name = ? AND msy.year = ?",
    )
    .bind(make)
    .bind(model)
    .bind(body_type)
    .bind(size)
    .bind(year)
    .fetch_one(pool)
    .await?;
    row.try_get("id").map_err(|error| RepositoryError::Decode(error.to_string()))
}
