use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::suppliers::domain::{
    QuoteExtraction, QuoteId, Supplier, SupplierId, SupplierQuote, SupplierStats,
};
use crate::suppliers::repository::{
    QuoteLedger, RepositoryError, StatsRepository, SupplierRepository,
};
use crate::suppliers::store::InMemorySupplierStore;
use crate::suppliers::{ReputationConfig, SupplierReputationService};

pub(super) type MemoryService = SupplierReputationService<
    InMemorySupplierStore,
    InMemorySupplierStore,
    InMemorySupplierStore,
>;

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// Fully populated extraction scoring 1000.
pub(super) fn complete_extraction() -> QuoteExtraction {
    QuoteExtraction {
        supplier_name: Some("Harbour Electrical".to_string()),
        trading_name: Some("Harbour Electrical Pty Ltd".to_string()),
        tax_id: Some("51824753556".to_string()),
        phone: Some("02 9000 0000".to_string()),
        email: Some("quotes@harbour.example".to_string()),
        address: Some("12 Wharf St, Sydney NSW".to_string()),
        quote_date: Some("2025-05-28".to_string()),
        quote_number: Some("Q-1042".to_string()),
        total_amount: Some(4_500.0),
        currency: Some("AUD".to_string()),
        trade_category: Some("electrical".to_string()),
        raw_text: Some("QUOTE Q-1042 switchboard upgrade ...".to_string()),
        has_breakdown: true,
        has_inclusions: true,
        has_exclusions: true,
        has_specific_scope: true,
        vague_phrase_count: 0,
        has_provisional_sum: false,
        lump_sum_multi_step: false,
        has_broad_risk_exclusion: false,
    }
}

/// Only the required fields: completeness 130, clarity 0, risk 300, total 430.
pub(super) fn minimal_extraction(name: &str, total_amount: f64) -> QuoteExtraction {
    QuoteExtraction {
        supplier_name: Some(name.to_string()),
        total_amount: Some(total_amount),
        ..QuoteExtraction::default()
    }
}

pub(super) fn extraction_with_tax_id(name: &str, tax_id: &str, total_amount: f64) -> QuoteExtraction {
    QuoteExtraction {
        tax_id: Some(tax_id.to_string()),
        ..minimal_extraction(name, total_amount)
    }
}

pub(super) fn build_service() -> (MemoryService, Arc<InMemorySupplierStore>) {
    let store = Arc::new(InMemorySupplierStore::new());
    let service = SupplierReputationService::with_store(store.clone(), ReputationConfig::default());
    (service, store)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Store whose every operation fails, standing in for an offline database.
pub(super) struct UnavailableStore;

fn offline() -> RepositoryError {
    RepositoryError::Unavailable("database offline".to_string())
}

impl SupplierRepository for UnavailableStore {
    fn insert(&self, _supplier: Supplier) -> Result<Supplier, RepositoryError> {
        Err(offline())
    }

    fn update(&self, _supplier: Supplier) -> Result<(), RepositoryError> {
        Err(offline())
    }

    fn remove(&self, _id: &SupplierId) -> Result<(), RepositoryError> {
        Err(offline())
    }

    fn fetch(&self, _id: &SupplierId) -> Result<Option<Supplier>, RepositoryError> {
        Err(offline())
    }

    fn find_by_tax_id(&self, _tax_id: &str) -> Result<Option<Supplier>, RepositoryError> {
        Err(offline())
    }

    fn find_by_name(&self, _name_key: &str) -> Result<Option<Supplier>, RepositoryError> {
        Err(offline())
    }

    fn list(&self) -> Result<Vec<Supplier>, RepositoryError> {
        Err(offline())
    }
}

impl QuoteLedger for UnavailableStore {
    fn append(&self, _quote: SupplierQuote) -> Result<SupplierQuote, RepositoryError> {
        Err(offline())
    }

    fn fetch_quote(&self, _id: &QuoteId) -> Result<Option<SupplierQuote>, RepositoryError> {
        Err(offline())
    }

    fn for_supplier(
        &self,
        _supplier_id: &SupplierId,
    ) -> Result<Vec<SupplierQuote>, RepositoryError> {
        Err(offline())
    }
}

impl StatsRepository for UnavailableStore {
    fn upsert(&self, _stats: SupplierStats) -> Result<(), RepositoryError> {
        Err(offline())
    }

    fn fetch_stats(
        &self,
        _supplier_id: &SupplierId,
    ) -> Result<Option<SupplierStats>, RepositoryError> {
        Err(offline())
    }
}

/// Ledger that refuses writes so tests can observe a failure after the supplier write.
#[derive(Default)]
pub(super) struct ReadOnlyLedger;

impl QuoteLedger for ReadOnlyLedger {
    fn append(&self, _quote: SupplierQuote) -> Result<SupplierQuote, RepositoryError> {
        Err(RepositoryError::Unavailable("ledger is read only".to_string()))
    }

    fn fetch_quote(&self, _id: &QuoteId) -> Result<Option<SupplierQuote>, RepositoryError> {
        Ok(None)
    }

    fn for_supplier(
        &self,
        _supplier_id: &SupplierId,
    ) -> Result<Vec<SupplierQuote>, RepositoryError> {
        Ok(Vec::new())
    }
}

/// Ledger over a real store whose appends can be switched off mid-test.
pub(super) struct SwitchableLedger {
    inner: Arc<InMemorySupplierStore>,
    refuse: AtomicBool,
}

impl SwitchableLedger {
    pub(super) fn new(inner: Arc<InMemorySupplierStore>) -> Self {
        Self {
            inner,
            refuse: AtomicBool::new(false),
        }
    }

    pub(super) fn refuse_appends(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }
}

impl QuoteLedger for SwitchableLedger {
    fn append(&self, quote: SupplierQuote) -> Result<SupplierQuote, RepositoryError> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("ledger is read only".to_string()));
        }
        self.inner.append(quote)
    }

    fn fetch_quote(&self, id: &QuoteId) -> Result<Option<SupplierQuote>, RepositoryError> {
        self.inner.fetch_quote(id)
    }

    fn for_supplier(
        &self,
        supplier_id: &SupplierId,
    ) -> Result<Vec<SupplierQuote>, RepositoryError> {
        self.inner.for_supplier(supplier_id)
    }
}
