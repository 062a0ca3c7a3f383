use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::domain::{QuoteId, Supplier, SupplierId, SupplierQuote, SupplierStats};
use super::repository::{QuoteLedger, RepositoryError, StatsRepository, SupplierRepository};

/// Process-local store backing all three repositories.
#[derive(Debug, Default)]
pub struct InMemorySupplierStore {
    state: Mutex<StoreState>,
}

#[derive(Debug, Default)]
struct StoreState {
    suppliers: Vec<Supplier>,
    quotes: Vec<SupplierQuote>,
    stats: HashMap<SupplierId, SupplierStats>,
}

impl InMemorySupplierStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("supplier store lock poisoned".to_string()))
    }

    pub fn quote_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.state()?.quotes.len())
    }
}

impl SupplierRepository for InMemorySupplierStore {
    fn insert(&self, supplier: Supplier) -> Result<Supplier, RepositoryError> {
        let mut state = self.state()?;
        let duplicate = state.suppliers.iter().any(|existing| {
            existing.id == supplier.id
                || (supplier.tax_id.is_some() && existing.tax_id == supplier.tax_id)
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        state.suppliers.push(supplier.clone());
        Ok(supplier)
    }

    fn update(&self, supplier: Supplier) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        let tax_id_taken = supplier.tax_id.is_some()
            && state
                .suppliers
                .iter()
                .any(|existing| existing.id != supplier.id && existing.tax_id == supplier.tax_id);
        if tax_id_taken {
            return Err(RepositoryError::Conflict);
        }

        match state
            .suppliers
            .iter_mut()
            .find(|existing| existing.id == supplier.id)
        {
            Some(slot) => {
                *slot = supplier;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn remove(&self, id: &SupplierId) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        let before = state.suppliers.len();
        state.suppliers.retain(|supplier| &supplier.id != id);
        if state.suppliers.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn fetch(&self, id: &SupplierId) -> Result<Option<Supplier>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .suppliers
            .iter()
            .find(|supplier| &supplier.id == id)
            .cloned())
    }

    fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Supplier>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .suppliers
            .iter()
            .find(|supplier| supplier.tax_id.as_deref() == Some(tax_id))
            .cloned())
    }

    fn find_by_name(&self, name_key: &str) -> Result<Option<Supplier>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .suppliers
            .iter()
            .find(|supplier| supplier.name_key() == name_key)
            .cloned())
    }

    fn list(&self) -> Result<Vec<Supplier>, RepositoryError> {
        Ok(self.state()?.suppliers.clone())
    }
}

impl QuoteLedger for InMemorySupplierStore {
    fn append(&self, mut quote: SupplierQuote) -> Result<SupplierQuote, RepositoryError> {
        let mut state = self.state()?;
        if state.quotes.iter().any(|existing| existing.id == quote.id) {
            return Err(RepositoryError::Conflict);
        }
        quote.sequence = state.quotes.len() as u64 + 1;
        state.quotes.push(quote.clone());
        Ok(quote)
    }

    fn fetch_quote(&self, id: &QuoteId) -> Result<Option<SupplierQuote>, RepositoryError> {
        let state = self.state()?;
        Ok(state.quotes.iter().find(|quote| &quote.id == id).cloned())
    }

    fn for_supplier(
        &self,
        supplier_id: &SupplierId,
    ) -> Result<Vec<SupplierQuote>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .quotes
            .iter()
            .rev()
            .filter(|quote| &quote.supplier_id == supplier_id)
            .cloned()
            .collect())
    }
}

impl StatsRepository for InMemorySupplierStore {
    fn upsert(&self, stats: SupplierStats) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        state.stats.insert(stats.supplier_id.clone(), stats);
        Ok(())
    }

    fn fetch_stats(
        &self,
        supplier_id: &SupplierId,
    ) -> Result<Option<SupplierStats>, RepositoryError> {
        let state = self.state()?;
        Ok(state.stats.get(supplier_id).cloned())
    }
}
