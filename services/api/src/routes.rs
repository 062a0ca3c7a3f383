use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use supplier_reputation::error::AppError;
use supplier_reputation::suppliers::{
    supplier_router, EnrichmentOutcome, ExtractionCsvImporter, JobReference, QuoteLedger,
    StatsRepository, SupplierRepository, SupplierReputationService,
};

#[derive(Debug, Serialize)]
pub(crate) struct ImportResponse {
    pub(crate) rows: usize,
    pub(crate) scored: usize,
    pub(crate) skipped: usize,
    pub(crate) degraded: usize,
    pub(crate) outcomes: Vec<EnrichmentOutcome>,
}

pub(crate) fn with_supplier_routes<R, L, S>(
    service: Arc<SupplierReputationService<R, L, S>>,
) -> axum::Router
where
    R: SupplierRepository + 'static,
    L: QuoteLedger + 'static,
    S: StatsRepository + 'static,
{
    let import = axum::Router::new()
        .route(
            "/api/v1/suppliers/import",
            axum::routing::post(import_endpoint::<R, L, S>),
        )
        .with_state(service.clone());

    supplier_router(service)
        .merge(import)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Replays a CSV batch of extractions. Rows without a `job` column get a row-numbered reference.
pub(crate) async fn import_endpoint<R, L, S>(
    State(service): State<Arc<SupplierReputationService<R, L, S>>>,
    body: String,
) -> Result<Json<ImportResponse>, AppError>
where
    R: SupplierRepository + 'static,
    L: QuoteLedger + 'static,
    S: StatsRepository + 'static,
{
    let rows = ExtractionCsvImporter::from_reader(Cursor::new(body.into_bytes()))?;

    let mut response = ImportResponse {
        rows: rows.len(),
        scored: 0,
        skipped: 0,
        degraded: 0,
        outcomes: Vec::with_capacity(rows.len()),
    };

    for (index, row) in rows.into_iter().enumerate() {
        let job = row
            .job
            .unwrap_or_else(|| JobReference(format!("import-row-{}", index + 1)));
        let outcome = service.enrich_job(job, &row.extraction);
        match &outcome {
            EnrichmentOutcome::Scored(_) => response.scored += 1,
            EnrichmentOutcome::Skipped { .. } => response.skipped += 1,
            EnrichmentOutcome::Degraded { .. } => response.degraded += 1,
        }
        response.outcomes.push(outcome);
    }

    Ok(Json(response))
}
