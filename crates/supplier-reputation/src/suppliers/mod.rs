//! Supplier scoring and incremental reputation.
//!
//! An extraction flows through validation and the quote scorer, is matched to a canonical
//! supplier, folded into that supplier's reputation, appended to the quote ledger, and
//! finally replayed into the supplier's stats row.

pub mod domain;
pub mod identity;
pub mod import;
pub mod locks;
pub mod reputation;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod stats;
pub mod store;
pub mod validation;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    ConfidenceLevel, JobReference, QuoteExtraction, QuoteId, ScoreBreakdown, Supplier,
    SupplierDetails, SupplierId, SupplierQuote, SupplierStats,
};
pub use identity::{IdentityResolver, Resolution};
pub use import::{ExtractionCsvImporter, ExtractionImportError, ImportedExtraction};
pub use reputation::{ReputationAggregator, ReputationConfig};
pub use repository::{QuoteLedger, RepositoryError, StatsRepository, SupplierRepository};
pub use router::supplier_router;
pub use scoring::{QuoteScorer, ScoreComponent, ScoreFactor, ScoredQuote, ScoringConfig};
pub use service::{
    EnrichmentOutcome, ProcessedQuote, SupplierReputationService, SupplierServiceError,
};
pub use stats::StatisticsTracker;
pub use store::InMemorySupplierStore;
pub use validation::ValidationError;
pub use views::{ProcessedQuoteView, QuoteHistoryEntry, SupplierInsight, SupplierReputationView};
