//! Read-only catalog listing endpoints.
//!
//! - `GET /api/makes`: list vehicle makes
//! - `GET /api/makes/{id}/models`: list a make's models with their styles
//!
//! Catalog administration (creating makes, models, styles) happens outside
//! this service; these routes only expose what the pricing engine can match.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::Row;
use tracing::error;
use vquotes_db::DbPool;

#[derive(Clone)]
struct CatalogState {
    db_pool: DbPool,
}

#[derive(Debug, Serialize)]
pub struct MakeResource {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSpecification {
    pub id: i64,
    pub name: String,
    pub styles: Vec<ModelSpecificationStyle>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSpecificationStyle {
    pub body_type: String,
    pub size: String,
    pub years: Vec<String>,
}

pub fn router(db_pool: DbPool) -> Router {
    Router::new()
        .route("/api/makes", get(list_makes))
        .route("/api/makes/{make_id}/models", get(list_models))
        .with_state(CatalogState { db_pool })
}

async fn list_makes(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<MakeResource>>, StatusCode> {
    let rows = sqlx::query("SELECT id, name FROM makes ORDER BY name")
        .fetch_all(&state.db_pool)
        .await
        .map_err(internal)?;

    let makes = rows
        .into_iter()
        .map(|row| {
            Ok(MakeResource {
                id: row.try_get("id").map_err(internal)?,
                name: row.try_get("name").map_err(internal)?,
            })
        })
        .collect::<Result<Vec<_>, StatusCode>>()?;

    Ok(Json(makes))
}

async fn list_models(
    Path(make_id): Path<i64>,
    State(state): State<CatalogState>,
) -> Result<Json<Vec<ModelSpecification>>, StatusCode> {
    let make_exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM makes WHERE id = ?")
        .bind(make_id)
        .fetch_one(&state.db_pool)
        .await
        .map_err(internal)?;
    if make_exists == 0 {
        return Err(StatusCode::NOT_FOUND);
    }

    let model_rows = sqlx::query("SELECT id, name FROM models WHERE make_id = ? ORDER BY name")
        .bind(make_id)
        .fetch_all(&state.db_pool)
        .await
        .map_err(internal)?;

    let mut models = Vec::with_capacity(model_rows.len());
    for model_row in model_rows {
        let model_id: i64 = model_row.try_get("id").map_err(internal)?;
        let name: String = model_row.try_get("name").map_err(internal)?;

        let style_rows = sqlx::query(
            r#"
            SELECT ms.id, bt.name AS body_type, s.name AS size
            FROM model_styles ms
            JOIN body_types bt ON bt.id = ms.body_type_id
            JOIN sizes s ON s.id = ms.size_id
            WHERE ms.model_id = ?
            ORDER BY ms.id
            "#,
        )
        .bind(model_id)
        .fetch_all(&state.db_pool)
        .await
        .map_err(internal)?;

        let mut styles = Vec::with_capacity(style_rows.len());
        for style_row in style_rows {
            let style_id: i64 = style_row.try_get("id").map_err(internal)?;
            let years: Vec<String> = sqlx::query_scalar(
                "SELECT year FROM model_style_years WHERE model_style_id = ? ORDER BY year",
            )
            .bind(style_id)
            .fetch_all(&state.db_pool)
            .await
            .map_err(internal)?;

            styles.push(ModelSpecificationStyle {
                body_type: style_row.try_get("body_type").map_err(internal)?,
                size: style_row.try_get("size").map_err(internal)?,
                years,
            });
        }

        models.push(ModelSpecification { id: model_id, name, styles });
    }

    Ok(Json(models))
}

fn internal(error: impl std::fmt::Display) -> StatusCode {
    error!(
        event_name = "catalog.listing.failed",
        error = %error,
        "catalog listing query failed"
    );
    StatusCode::INTERNAL_SERVER_ERROR
}
