use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use supplier_reputation::error::AppError;
use supplier_reputation::suppliers::{
    InMemorySupplierStore, QuoteExtraction, ReputationConfig, SupplierReputationService,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type MemoryService =
    SupplierReputationService<InMemorySupplierStore, InMemorySupplierStore, InMemorySupplierStore>;

/// Service backed by a single in-process store for suppliers, ledger, and stats.
pub(crate) fn build_service(config: &ReputationConfig) -> Arc<MemoryService> {
    let store = Arc::new(InMemorySupplierStore::new());
    Arc::new(SupplierReputationService::with_store(store, config.clone()))
}

pub(crate) fn load_extraction(path: &Path) -> Result<QuoteExtraction, AppError> {
    let raw = std::fs::read_to_string(path)?;
    parse_extraction(&raw)
}

pub(crate) fn parse_extraction(raw: &str) -> Result<QuoteExtraction, AppError> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_extraction_json() {
        let extraction = parse_extraction(
            r#"{"supplierName": "Harbour Electrical", "abn": "51 824 753 556", "totalAmount": 4500, "hasBreakdown": true}"#,
        )
        .expect("parses");

        assert_eq!(extraction.supplier_name.as_deref(), Some("Harbour Electrical"));
        assert_eq!(extraction.tax_id.as_deref(), Some("51 824 753 556"));
        assert_eq!(extraction.total_amount, Some(4500.0));
        assert!(extraction.has_breakdown);
        assert!(!extraction.has_exclusions);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            parse_extraction("{\"totalAmount\": \"lots\"}"),
            Err(AppError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            load_extraction(Path::new("/nonexistent/extraction.json")),
            Err(AppError::Io(_))
        ));
    }
}
