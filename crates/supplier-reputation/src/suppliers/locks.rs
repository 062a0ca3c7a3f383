use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::domain::SupplierId;

/// Serializes writers touching the same supplier.
///
/// Lock order is always identity, then supplier. The identity lock only covers the
/// lookup-or-create step so two first quotes for one business cannot both insert.
#[derive(Debug, Default)]
pub struct SupplierLocks {
    identity: Mutex<()>,
    suppliers: Mutex<HashMap<SupplierId, Arc<Mutex<()>>>>,
}

impl SupplierLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        self.identity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn supplier(&self, id: &SupplierId) -> Arc<Mutex<()>> {
        let mut registry = self
            .suppliers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        registry
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

pub(crate) fn hold(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_supplier_shares_one_lock() {
        let locks = SupplierLocks::new();
        let a = locks.supplier(&SupplierId("sup-1".to_string()));
        let b = locks.supplier(&SupplierId("sup-1".to_string()));
        let c = locks.supplier(&SupplierId("sup-2".to_string()));

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
