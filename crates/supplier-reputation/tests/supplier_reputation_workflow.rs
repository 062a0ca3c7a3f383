//! End-to-end scenarios for supplier scoring, identity resolution, and reputation tracking.
//!
//! Everything here goes through the public service facade, the HTTP router, and the CSV
//! importer, the same surfaces the API binary wires together.

mod common {
    use std::sync::Arc;

    use supplier_reputation::suppliers::{
        InMemorySupplierStore, QuoteExtraction, ReputationConfig, SupplierReputationService,
    };

    pub(super) type Service = SupplierReputationService<
        InMemorySupplierStore,
        InMemorySupplierStore,
        InMemorySupplierStore,
    >;

    pub(super) fn service() -> (Arc<Service>, Arc<InMemorySupplierStore>) {
        let store = Arc::new(InMemorySupplierStore::new());
        let service = Arc::new(SupplierReputationService::with_store(
            store.clone(),
            ReputationConfig::default(),
        ));
        (service, store)
    }

    pub(super) fn extraction(name: &str, tax_id: Option<&str>, total: f64) -> QuoteExtraction {
        QuoteExtraction {
            supplier_name: Some(name.to_string()),
            tax_id: tax_id.map(str::to_string),
            email: Some("quotes@example.com".to_string()),
            quote_date: Some("2025-05-01".to_string()),
            quote_number: Some("Q-1".to_string()),
            total_amount: Some(total),
            has_breakdown: true,
            has_inclusions: true,
            ..QuoteExtraction::default()
        }
    }
}

use std::sync::Arc;
use std::thread;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::*;
use supplier_reputation::suppliers::{
    supplier_router, ConfidenceLevel, EnrichmentOutcome, ExtractionCsvImporter, JobReference,
    QuoteLedger, ReputationAggregator, StatsRepository, SupplierRepository,
};

#[test]
fn supplier_reputation_evolves_across_jobs() {
    let (service, store) = service();

    let first = service
        .process_supplier_quote(
            Some(JobReference("job-1".to_string())),
            &extraction("Harbour Electrical", Some("51824753556"), 4_000.0),
        )
        .expect("first quote");
    let first_score = first.quote.scores.total;
    assert_eq!(first.supplier.reputation_score, first_score);

    let mut sloppy = extraction("harbour electrical pty", Some("51 824 753 556"), 5_000.0);
    sloppy.vague_phrase_count = 4;
    sloppy.has_provisional_sum = true;
    let second = service
        .process_supplier_quote(Some(JobReference("job-2".to_string())), &sloppy)
        .expect("second quote");

    assert_eq!(second.supplier.id, first.supplier.id);
    let expected = ReputationAggregator::default().blend(first_score, second.quote.scores.total);
    assert_eq!(second.supplier.reputation_score, expected);
    assert!(second.supplier.reputation_score < first_score);
    assert_eq!(second.supplier.confidence, ConfidenceLevel::Med);
    assert_eq!(second.stats.price_change_pct_vs_last, 25.0);
    assert_eq!(second.stats.median_total_amount, 4_500.0);

    let history = store.for_supplier(&first.supplier.id).expect("ledger");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].job, Some(JobReference("job-2".to_string())));
    assert_eq!(store.list().expect("suppliers").len(), 1);
}

#[test]
fn concurrent_quotes_for_one_supplier_are_all_counted() {
    const WRITERS: usize = 8;
    const QUOTES_PER_WRITER: usize = 5;
    let (service, store) = service();

    thread::scope(|scope| {
        for writer in 0..WRITERS {
            let service = Arc::clone(&service);
            scope.spawn(move || {
                for index in 0..QUOTES_PER_WRITER {
                    let total = 1_000.0 + (writer * QUOTES_PER_WRITER + index) as f64;
                    service
                        .process_supplier_quote(
                            None,
                            &extraction("Concurrent Plumbing", Some("12 345 678 901"), total),
                        )
                        .expect("quote processed");
                }
            });
        }
    });

    let expected = (WRITERS * QUOTES_PER_WRITER) as u32;
    let suppliers = store.list().expect("suppliers");
    assert_eq!(suppliers.len(), 1);

    let supplier = &suppliers[0];
    assert_eq!(supplier.quote_count, expected);
    assert_eq!(supplier.confidence, ConfidenceLevel::High);
    assert_eq!(
        store.for_supplier(&supplier.id).expect("ledger").len(),
        expected as usize
    );

    let stats = store
        .fetch_stats(&supplier.id)
        .expect("stats")
        .expect("stats row");
    assert_eq!(stats.quote_sample_size, expected);
    assert_eq!(stats.min_total_amount, 1_000.0);
    assert_eq!(stats.max_total_amount, 1_000.0 + (expected - 1) as f64);
}

#[test]
fn concurrent_first_quotes_by_name_create_one_supplier() {
    let (service, store) = service();

    thread::scope(|scope| {
        for _ in 0..6 {
            let service = Arc::clone(&service);
            scope.spawn(move || {
                service
                    .process_supplier_quote(None, &extraction("Brand New Tiling", None, 800.0))
                    .expect("quote processed");
            });
        }
    });

    let suppliers = store.list().expect("suppliers");
    assert_eq!(suppliers.len(), 1);
    assert_eq!(suppliers[0].quote_count, 6);
}

#[test]
fn enrichment_never_fails_the_job() {
    let (service, store) = service();

    let outcome = service.enrich_job(
        JobReference("job-9".to_string()),
        &extraction("", Some("999"), 100.0),
    );
    assert!(matches!(outcome, EnrichmentOutcome::Skipped { .. }));
    assert!(store.list().expect("suppliers").is_empty());

    let outcome = service.enrich_job(
        JobReference("job-10".to_string()),
        &extraction("Tidy Gardens", None, 640.0),
    );
    let json = serde_json::to_value(&outcome).expect("serializes");
    assert_eq!(json["outcome"], json!("scored"));
    assert_eq!(json["supplier"]["name"], json!("Tidy Gardens"));
}

#[test]
fn csv_batches_feed_the_same_pipeline() {
    let (service, store) = service();
    let csv = "\
job,supplierName,abn,email,totalAmount,hasBreakdown,hasInclusions,vaguePhraseCount
job-1,Harbour Electrical,51 824 753 556,quotes@harbour.example,\"$4,000\",yes,yes,0
job-2,Harbour Electrical,51824753556,,\"$5,000.00\",no,yes,3
job-3,,,,900,,,
";

    let rows = ExtractionCsvImporter::from_reader(csv.as_bytes()).expect("csv parses");
    assert_eq!(rows.len(), 3);

    let outcomes: Vec<_> = rows
        .into_iter()
        .map(|row| {
            service.enrich_job(
                row.job.unwrap_or_else(|| JobReference("unknown".to_string())),
                &row.extraction,
            )
        })
        .collect();

    assert!(matches!(outcomes[0], EnrichmentOutcome::Scored(_)));
    assert!(matches!(outcomes[1], EnrichmentOutcome::Scored(_)));
    assert!(matches!(outcomes[2], EnrichmentOutcome::Skipped { .. }));

    let suppliers = store.list().expect("suppliers");
    assert_eq!(suppliers.len(), 1);
    assert_eq!(suppliers[0].quote_count, 2);
    assert_eq!(suppliers[0].tax_id.as_deref(), Some("51824753556"));
}

#[tokio::test]
async fn http_surface_round_trips_a_quote() {
    let (service, _) = service();
    let router = supplier_router(service);

    let body = json!({
        "job": "job-http",
        "extraction": {
            "supplierName": "Route Electrical",
            "taxId": "98765432100",
            "totalAmount": 1500,
            "hasSpecificScope": true,
        },
    });
    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/suppliers/quotes")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).expect("json")))
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    let supplier_id = created["supplier"]["supplier_id"]
        .as_str()
        .expect("supplier id")
        .to_string();

    let response = router
        .oneshot(
            Request::get(format!("/api/v1/suppliers/{supplier_id}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let view = read_json(response).await;
    assert_eq!(view["name"], json!("Route Electrical"));
    assert_eq!(view["total_quotes_seen"], json!(1));
    assert_eq!(view["confidence"], json!("LOW"));
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
