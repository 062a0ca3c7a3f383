use serde::{Deserialize, Serialize};

use super::domain::{ConfidenceLevel, Supplier, SupplierDetails, MAX_SCORE};
use super::repository::{RepositoryError, SupplierRepository};

const DEFAULT_BLEND_WEIGHT: f64 = 0.7;
const DEFAULT_CURRENCY: &str = "AUD";

/// Settings for how quotes fold into a supplier's longitudinal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationConfig {
    /// Weight of the newest quote in the moving average; history gets `1 - blend_weight`.
    pub blend_weight: f64,
    /// Currency recorded on ledger entries whose extraction did not name one.
    pub default_currency: String,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            blend_weight: DEFAULT_BLEND_WEIGHT,
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// Single write path for existing supplier records.
#[derive(Debug, Clone)]
pub struct ReputationAggregator {
    blend_weight: f64,
}

impl Default for ReputationAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_BLEND_WEIGHT)
    }
}

impl ReputationAggregator {
    pub fn new(blend_weight: f64) -> Self {
        let sanitized = if blend_weight.is_finite() && blend_weight > 0.0 && blend_weight <= 1.0 {
            blend_weight
        } else {
            DEFAULT_BLEND_WEIGHT
        };

        Self {
            blend_weight: sanitized,
        }
    }

    pub fn from_config(config: &ReputationConfig) -> Self {
        Self::new(config.blend_weight)
    }

    pub fn blend_weight(&self) -> f64 {
        self.blend_weight
    }

    /// Exponential moving average of the previous reputation and the new quote total.
    pub fn blend(&self, previous_score: u16, quote_total: u16) -> u16 {
        let blended = self.blend_weight * f64::from(quote_total)
            + (1.0 - self.blend_weight) * f64::from(previous_score);
        blended.round().clamp(0.0, f64::from(MAX_SCORE)) as u16
    }

    /// Fold one more quote into `supplier` without persisting it.
    pub fn apply(&self, supplier: &mut Supplier, details: &SupplierDetails, quote_total: u16) {
        supplier.reputation_score = self.blend(supplier.reputation_score, quote_total);
        supplier.quote_count = supplier.quote_count.saturating_add(1);
        supplier.confidence = supplier
            .confidence
            .max(ConfidenceLevel::for_quote_count(supplier.quote_count));
        supplier.last_seen_at = supplier.last_seen_at.max(details.last_seen_at);

        backfill(&mut supplier.trading_name, &details.trading_name);
        backfill(&mut supplier.phone, &details.phone);
        backfill(&mut supplier.email, &details.email);
        backfill(&mut supplier.address, &details.address);
    }

    /// Apply and persist. Repository failures propagate untouched.
    pub fn fold<R>(
        &self,
        repository: &R,
        mut supplier: Supplier,
        details: &SupplierDetails,
        quote_total: u16,
    ) -> Result<Supplier, RepositoryError>
    where
        R: SupplierRepository + ?Sized,
    {
        self.apply(&mut supplier, details, quote_total);
        repository.update(supplier.clone())?;
        Ok(supplier)
    }
}

// Existing contact data is never replaced by a later extraction.
fn backfill(slot: &mut Option<String>, candidate: &Option<String>) {
    if slot.is_none() {
        slot.clone_from(candidate);
    }
}
