use super::domain::{Supplier, SupplierDetails, SupplierId};
use super::repository::{RepositoryError, SupplierRepository};

/// Outcome of mapping a quote's supplier details onto a canonical supplier.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Existing(Supplier),
    Created(Supplier),
}

impl Resolution {
    pub fn supplier(&self) -> &Supplier {
        match self {
            Resolution::Existing(supplier) | Resolution::Created(supplier) => supplier,
        }
    }

    pub fn into_supplier(self) -> Supplier {
        match self {
            Resolution::Existing(supplier) | Resolution::Created(supplier) => supplier,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Resolution::Created(_))
    }
}

/// Finds or creates the supplier a quote belongs to.
///
/// Precedence is tax id, then case-insensitive exact name. A tax id match wins even when the
/// names differ. Names are never matched loosely, so two spellings of one business without a
/// tax id stay two suppliers.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

impl IdentityResolver {
    pub fn find<R>(
        &self,
        repository: &R,
        details: &SupplierDetails,
    ) -> Result<Option<Supplier>, RepositoryError>
    where
        R: SupplierRepository + ?Sized,
    {
        match details.tax_id.as_deref() {
            Some(tax_id) => repository.find_by_tax_id(tax_id),
            None => repository.find_by_name(&details.name_key()),
        }
    }

    /// Resolve `details`, inserting a supplier seeded from `quote_total` when nothing matches.
    pub fn resolve<R, F>(
        &self,
        repository: &R,
        details: &SupplierDetails,
        quote_total: u16,
        new_id: F,
    ) -> Result<Resolution, RepositoryError>
    where
        R: SupplierRepository + ?Sized,
        F: FnOnce() -> SupplierId,
    {
        if let Some(existing) = self.find(repository, details)? {
            return Ok(Resolution::Existing(existing));
        }

        let seeded = Supplier::seeded(new_id(), details, quote_total);
        let stored = repository.insert(seeded)?;
        Ok(Resolution::Created(stored))
    }
}
