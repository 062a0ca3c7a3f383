use super::domain::{QuoteId, Supplier, SupplierId, SupplierQuote, SupplierStats};

/// Storage for canonical supplier records.
pub trait SupplierRepository: Send + Sync {
    /// Insert a new supplier. Fails with `Conflict` when the id or tax id is already taken.
    fn insert(&self, supplier: Supplier) -> Result<Supplier, RepositoryError>;
    fn update(&self, supplier: Supplier) -> Result<(), RepositoryError>;
    /// Only used to undo a creation whose first quote never reached the ledger.
    fn remove(&self, id: &SupplierId) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SupplierId) -> Result<Option<Supplier>, RepositoryError>;
    /// Exact match on the whitespace-free tax id.
    fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Supplier>, RepositoryError>;
    /// Exact match on the lowercased, trimmed name. The oldest supplier wins on duplicates.
    fn find_by_name(&self, name_key: &str) -> Result<Option<Supplier>, RepositoryError>;
    fn list(&self) -> Result<Vec<Supplier>, RepositoryError>;
}

/// Append-only record of every scored quote.
pub trait QuoteLedger: Send + Sync {
    /// Append a quote, assigning its ledger sequence number.
    fn append(&self, quote: SupplierQuote) -> Result<SupplierQuote, RepositoryError>;
    fn fetch_quote(&self, id: &QuoteId) -> Result<Option<SupplierQuote>, RepositoryError>;
    /// All quotes for a supplier, newest (highest sequence) first.
    fn for_supplier(&self, supplier_id: &SupplierId)
        -> Result<Vec<SupplierQuote>, RepositoryError>;
}

/// Cache of per-supplier aggregates, one row per supplier.
pub trait StatsRepository: Send + Sync {
    fn upsert(&self, stats: SupplierStats) -> Result<(), RepositoryError>;
    fn fetch_stats(&self, supplier_id: &SupplierId)
        -> Result<Option<SupplierStats>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
