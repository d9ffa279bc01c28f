//! Quote submission and history endpoints.
//!
//! - `POST /api/quotes`: calculate, persist, and return a cash offer
//! - `GET  /api/quotes`: list every persisted quote (pass-through read)

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use vquotes_core::domain::quote::{QuoteId, QuoteRecord, QuoteRequest, SubmittedQuote};
use vquotes_core::engine::offer::{compute_offer, PricingSnapshot};
use vquotes_core::errors::{ApplicationError, DomainError, InterfaceError};
use vquotes_db::repositories::{
    CatalogRepository, PricingRepository, QuoteRepository, RepositoryError,
};

/// Orchestrates one quote request in two explicit phases: snapshot the
/// pricing inputs and run the pure engine, then persist the outcome. Catalog
/// lookup failures abort before anything is written.
pub struct QuoteService {
    catalog: Arc<dyn CatalogRepository>,
    pricing: Arc<dyn PricingRepository>,
    quotes: Arc<dyn QuoteRepository>,
    default_offer: i64,
}

impl QuoteService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        pricing: Arc<dyn PricingRepository>,
        quotes: Arc<dyn QuoteRepository>,
        default_offer: i64,
    ) -> Self {
        Self { catalog, pricing, quotes, default_offer }
    }

    pub async fn submit(&self, request: QuoteRequest) -> Result<SubmittedQuote, ApplicationError> {
        let body_type = self
            .catalog
            .find_body_type(&request.vehicle.body_type)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| DomainError::UnknownBodyType {
                name: request.vehicle.body_type.clone(),
            })?;
        let size = self
            .catalog
            .find_size(&request.vehicle.size)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| DomainError::UnknownSize { name: request.vehicle.size.clone() })?;

        let snapshot = PricingSnapshot {
            registered: self
                .catalog
                .load_registered_vehicles()
                .await
                .map_err(map_repository_error)?,
            overrides: self.pricing.load_overrides().await.map_err(map_repository_error)?,
            rules: self.pricing.load_rules().await.map_err(map_repository_error)?,
        };

        let outcome = compute_offer(&request, &snapshot, self.default_offer);

        let record = QuoteRecord {
            id: QuoteId(Uuid::new_v4().to_string()),
            configuration_id: outcome.configuration,
            vehicle: request.vehicle,
            body_type_id: body_type.id,
            size_id: size.id,
            conditions: request.conditions,
            offered_quote: outcome.amount,
            message: outcome.message,
            created_at: Utc::now(),
        };
        self.quotes.insert(record.clone()).await.map_err(map_repository_error)?;

        info!(
            event_name = "quotes.offer.persisted",
            quote_id = %record.id.0,
            offered_quote = record.offered_quote,
            matched = record.configuration_id.is_some(),
            source = ?outcome.source,
            floored = outcome.floored,
            "quote calculated and stored"
        );

        Ok(SubmittedQuote::from_record(&record))
    }

    pub async fn list(&self) -> Result<Vec<SubmittedQuote>, ApplicationError> {
        let records = self.quotes.list_all().await.map_err(map_repository_error)?;
        Ok(records.iter().map(SubmittedQuote::from_record).collect())
    }
}

fn map_repository_error(error: RepositoryError) -> ApplicationError {
    match error {
        RepositoryError::UniqueViolation(message) => ApplicationError::Conflict(message),
        other => ApplicationError::Persistence(other.to_string()),
    }
}

#[derive(Clone)]
struct QuotesState {
    service: Arc<QuoteService>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub correlation_id: String,
}

pub fn router(service: Arc<QuoteService>) -> Router {
    Router::new()
        .route("/api/quotes", get(list_quotes).post(submit_quote))
        .with_state(QuotesState { service })
}

async fn submit_quote(
    State(state): State<QuotesState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<SubmittedQuote>, (StatusCode, Json<ErrorBody>)> {
    let correlation_id = Uuid::new_v4().to_string();
    state
        .service
        .submit(request)
        .await
        .map(Json)
        .map_err(|error| reject(error, correlation_id))
}

async fn list_quotes(
    State(state): State<QuotesState>,
) -> Result<Json<Vec<SubmittedQuote>>, (StatusCode, Json<ErrorBody>)> {
    let correlation_id = Uuid::new_v4().to_string();
    state.service.list().await.map(Json).map_err(|error| reject(error, correlation_id))
}

fn reject(error: ApplicationError, correlation_id: String) -> (StatusCode, Json<ErrorBody>) {
    warn!(
        event_name = "quotes.request.rejected",
        correlation_id = %correlation_id,
        error = %error,
        "quote request rejected"
    );

    let interface = error.into_interface(correlation_id);
    let status = match &interface {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::Conflict { .. } => StatusCode::CONFLICT,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = ErrorBody {
        error: interface.to_string(),
        correlation_id: interface.correlation_id().to_string(),
    };
    (status, Json(body))
}
