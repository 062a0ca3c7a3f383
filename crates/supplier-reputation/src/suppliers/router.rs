use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{JobReference, QuoteExtraction, SupplierId};
use super::repository::{QuoteLedger, RepositoryError, StatsRepository, SupplierRepository};
use super::service::{SupplierReputationService, SupplierServiceError};

const DEFAULT_LEADERBOARD_LIMIT: usize = 25;
const MAX_LEADERBOARD_LIMIT: usize = 200;

type SharedService<R, L, S> = Arc<SupplierReputationService<R, L, S>>;

/// Body accepted by the quote processing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessQuoteRequest {
    #[serde(default)]
    pub job: Option<String>,
    pub extraction: QuoteExtraction,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

/// Router builder exposing supplier scoring and reputation queries.
pub fn supplier_router<R, L, S>(service: SharedService<R, L, S>) -> Router
where
    R: SupplierRepository + 'static,
    L: QuoteLedger + 'static,
    S: StatsRepository + 'static,
{
    Router::new()
        .route("/api/v1/suppliers", get(leaderboard_handler::<R, L, S>))
        .route(
            "/api/v1/suppliers/quotes",
            post(process_quote_handler::<R, L, S>),
        )
        .route(
            "/api/v1/suppliers/:supplier_id",
            get(reputation_handler::<R, L, S>),
        )
        .route(
            "/api/v1/suppliers/:supplier_id/stats",
            get(stats_handler::<R, L, S>),
        )
        .route(
            "/api/v1/suppliers/:supplier_id/quotes",
            get(history_handler::<R, L, S>),
        )
        .route(
            "/api/v1/suppliers/:supplier_id/insight",
            get(insight_handler::<R, L, S>),
        )
        .with_state(service)
}

pub(crate) async fn process_quote_handler<R, L, S>(
    State(service): State<SharedService<R, L, S>>,
    axum::Json(request): axum::Json<ProcessQuoteRequest>,
) -> Response
where
    R: SupplierRepository + 'static,
    L: QuoteLedger + 'static,
    S: StatsRepository + 'static,
{
    let job = request
        .job
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(JobReference);

    match service.process_supplier_quote(job, &request.extraction) {
        Ok(processed) => (StatusCode::CREATED, axum::Json(processed.view())).into_response(),
        Err(error) => error_response(error, None),
    }
}

pub(crate) async fn reputation_handler<R, L, S>(
    State(service): State<SharedService<R, L, S>>,
    Path(supplier_id): Path<String>,
) -> Response
where
    R: SupplierRepository + 'static,
    L: QuoteLedger + 'static,
    S: StatsRepository + 'static,
{
    let id = SupplierId(supplier_id);
    match service.reputation(&id) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error, Some(&id)),
    }
}

pub(crate) async fn stats_handler<R, L, S>(
    State(service): State<SharedService<R, L, S>>,
    Path(supplier_id): Path<String>,
) -> Response
where
    R: SupplierRepository + 'static,
    L: QuoteLedger + 'static,
    S: StatsRepository + 'static,
{
    let id = SupplierId(supplier_id);
    match service.stats(&id) {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(error) => error_response(error, Some(&id)),
    }
}

pub(crate) async fn history_handler<R, L, S>(
    State(service): State<SharedService<R, L, S>>,
    Path(supplier_id): Path<String>,
) -> Response
where
    R: SupplierRepository + 'static,
    L: QuoteLedger + 'static,
    S: StatsRepository + 'static,
{
    let id = SupplierId(supplier_id);
    match service.quote_history(&id) {
        Ok(history) => (StatusCode::OK, axum::Json(history)).into_response(),
        Err(error) => error_response(error, Some(&id)),
    }
}

pub(crate) async fn insight_handler<R, L, S>(
    State(service): State<SharedService<R, L, S>>,
    Path(supplier_id): Path<String>,
) -> Response
where
    R: SupplierRepository + 'static,
    L: QuoteLedger + 'static,
    S: StatsRepository + 'static,
{
    let id = SupplierId(supplier_id);
    match service.insight(&id) {
        Ok(insight) => (StatusCode::OK, axum::Json(insight)).into_response(),
        Err(error) => error_response(error, Some(&id)),
    }
}

pub(crate) async fn leaderboard_handler<R, L, S>(
    State(service): State<SharedService<R, L, S>>,
    Query(query): Query<LeaderboardQuery>,
) -> Response
where
    R: SupplierRepository + 'static,
    L: QuoteLedger + 'static,
    S: StatsRepository + 'static,
{
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .min(MAX_LEADERBOARD_LIMIT);

    match service.leaderboard(limit) {
        Ok(suppliers) => (StatusCode::OK, axum::Json(suppliers)).into_response(),
        Err(error) => error_response(error, None),
    }
}

fn error_response(error: SupplierServiceError, supplier_id: Option<&SupplierId>) -> Response {
    match error {
        SupplierServiceError::Validation(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        SupplierServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({
                "error": "supplier not found",
                "supplier_id": supplier_id.map(|id| id.0.clone()),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        SupplierServiceError::Repository(RepositoryError::Conflict) => {
            let payload = json!({
                "error": "supplier record conflict",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
