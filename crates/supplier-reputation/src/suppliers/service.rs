use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

use super::domain::{
    name_key, normalize_tax_id, JobReference, QuoteExtraction, QuoteId, Supplier, SupplierId,
    SupplierQuote, SupplierStats,
};
use super::identity::{IdentityResolver, Resolution};
use super::locks::{hold, SupplierLocks};
use super::reputation::{ReputationAggregator, ReputationConfig};
use super::repository::{QuoteLedger, RepositoryError, StatsRepository, SupplierRepository};
use super::scoring::{QuoteScorer, ScoreComponent, ScoringConfig};
use super::stats::StatisticsTracker;
use super::validation::{validate_extraction, ValidationError};
use super::views::{ProcessedQuoteView, QuoteHistoryEntry, SupplierInsight, SupplierReputationView};

/// Service composing the scorer, identity resolver, aggregator, ledger, and stats tracker.
pub struct SupplierReputationService<R, L, S> {
    suppliers: Arc<R>,
    ledger: Arc<L>,
    stats: Arc<S>,
    scorer: QuoteScorer,
    resolver: IdentityResolver,
    aggregator: ReputationAggregator,
    tracker: StatisticsTracker,
    locks: SupplierLocks,
    default_currency: String,
}

static SUPPLIER_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static QUOTE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_supplier_id() -> SupplierId {
    let id = SUPPLIER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SupplierId(format!("sup-{id:06}"))
}

fn next_quote_id() -> QuoteId {
    let id = QUOTE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    QuoteId(format!("quote-{id:06}"))
}

impl<T> SupplierReputationService<T, T, T>
where
    T: SupplierRepository + QuoteLedger + StatsRepository + 'static,
{
    /// Convenience constructor for stores that implement every repository.
    pub fn with_store(store: Arc<T>, config: ReputationConfig) -> Self {
        Self::new(store.clone(), store.clone(), store, config)
    }
}

impl<R, L, S> SupplierReputationService<R, L, S>
where
    R: SupplierRepository + 'static,
    L: QuoteLedger + 'static,
    S: StatsRepository + 'static,
{
    pub fn new(suppliers: Arc<R>, ledger: Arc<L>, stats: Arc<S>, config: ReputationConfig) -> Self {
        Self::with_scoring(suppliers, ledger, stats, config, ScoringConfig::default())
    }

    pub fn with_scoring(
        suppliers: Arc<R>,
        ledger: Arc<L>,
        stats: Arc<S>,
        config: ReputationConfig,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            suppliers,
            ledger,
            stats,
            scorer: QuoteScorer::new(scoring),
            resolver: IdentityResolver,
            aggregator: ReputationAggregator::from_config(&config),
            tracker: StatisticsTracker,
            locks: SupplierLocks::new(),
            default_currency: config.default_currency,
        }
    }

    pub fn scorer(&self) -> &QuoteScorer {
        &self.scorer
    }

    /// Score an extraction and fold it into its supplier's reputation, ledger, and stats.
    ///
    /// Validation happens before any write. Writes for one supplier are serialized, so the
    /// blend always starts from the latest persisted score. A ledger failure rolls the supplier
    /// write back before the error is returned.
    pub fn process_supplier_quote(
        &self,
        job: Option<JobReference>,
        extraction: &QuoteExtraction,
    ) -> Result<ProcessedQuote, SupplierServiceError> {
        let now = Utc::now();
        let validated = validate_extraction(extraction)?;
        let scored = self.scorer.score_validated(&validated, now);
        let total = scored.scores.total;

        let identity = self.locks.identity();
        let resolution =
            self.resolver
                .resolve(&*self.suppliers, &scored.supplier, total, next_supplier_id)?;
        let created = resolution.is_created();
        let supplier_lock = self.locks.supplier(&resolution.supplier().id);
        // A new supplier stays behind the identity lock until its first quote is on the
        // ledger, so nobody can resolve a record that may still be rolled back.
        let (identity, _supplier_guard) = if created {
            let guard = hold(&supplier_lock);
            (Some(identity), guard)
        } else {
            drop(identity);
            (None, hold(&supplier_lock))
        };

        let (supplier, previous) = match resolution {
            Resolution::Created(supplier) => (supplier, None),
            Resolution::Existing(stale) => {
                let current = self
                    .suppliers
                    .fetch(&stale.id)?
                    .ok_or(RepositoryError::NotFound)?;
                let updated = self.aggregator.fold(
                    &*self.suppliers,
                    current.clone(),
                    &scored.supplier,
                    total,
                )?;
                (updated, Some(current))
            }
        };

        let appended = self.ledger.append(SupplierQuote {
            id: next_quote_id(),
            supplier_id: supplier.id.clone(),
            job: job.clone(),
            quote_number: validated.fields.quote_number.clone(),
            quote_date: validated.quote_date(),
            total_amount: validated.total_amount,
            currency: validated
                .fields
                .currency
                .clone()
                .unwrap_or_else(|| self.default_currency.clone()),
            trade_category: validated.fields.trade_category.clone(),
            raw_text: validated.fields.raw_text.clone(),
            scores: scored.scores,
            recorded_at: now,
            sequence: 0,
        });
        let quote = match appended {
            Ok(quote) => quote,
            Err(err) => {
                self.roll_back(&supplier.id, previous);
                return Err(err.into());
            }
        };
        drop(identity);

        if created {
            info!(
                supplier_id = %supplier.id,
                tax_id = supplier.tax_id.as_deref().unwrap_or("-"),
                "new supplier seeded from quote"
            );
        }

        let stats = self
            .tracker
            .refresh(&*self.ledger, &*self.stats, &supplier.id, now)?;

        info!(
            supplier_id = %supplier.id,
            quote_id = %quote.id,
            job = job.as_ref().map(|job| job.0.as_str()).unwrap_or("-"),
            quote_total = total,
            reputation = supplier.reputation_score,
            quotes_seen = supplier.quote_count,
            confidence = supplier.confidence.label(),
            "supplier quote processed"
        );

        Ok(ProcessedQuote {
            supplier,
            quote,
            stats,
            created,
            components: scored.components,
        })
    }

    /// Undo the supplier write for a quote the ledger refused: restore the previous record,
    /// or remove a supplier created for this quote. The ledger stays the source of truth.
    fn roll_back(&self, id: &SupplierId, previous: Option<Supplier>) {
        let restored = match previous {
            Some(previous) => self.suppliers.update(previous),
            None => self.suppliers.remove(id),
        };

        match restored {
            Ok(()) => warn!(supplier_id = %id, "supplier write rolled back after ledger failure"),
            Err(err) => error!(
                supplier_id = %id,
                error = %err,
                "supplier rollback failed; record is ahead of its ledger"
            ),
        }
    }

    /// Best-effort wrapper for the analysis pipeline: failures are logged and reported as
    /// an outcome instead of an error so report delivery is never blocked on enrichment.
    pub fn enrich_job(&self, job: JobReference, extraction: &QuoteExtraction) -> EnrichmentOutcome {
        match self.process_supplier_quote(Some(job.clone()), extraction) {
            Ok(processed) => EnrichmentOutcome::Scored(Box::new(processed.view())),
            Err(SupplierServiceError::Validation(err)) => {
                warn!(job = %job, error = %err, "supplier scoring skipped");
                EnrichmentOutcome::Skipped {
                    reason: err.to_string(),
                }
            }
            Err(err) => {
                warn!(job = %job, error = %err, "supplier scoring degraded");
                EnrichmentOutcome::Degraded {
                    reason: err.to_string(),
                }
            }
        }
    }

    pub fn supplier(&self, id: &SupplierId) -> Result<Supplier, SupplierServiceError> {
        let supplier = self
            .suppliers
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(supplier)
    }

    pub fn reputation(
        &self,
        id: &SupplierId,
    ) -> Result<SupplierReputationView, SupplierServiceError> {
        let supplier = self.supplier(id)?;
        Ok(SupplierReputationView::from(&supplier))
    }

    pub fn stats(&self, id: &SupplierId) -> Result<SupplierStats, SupplierServiceError> {
        let stats = self
            .stats
            .fetch_stats(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(stats)
    }

    /// Ledger history for a supplier, newest first, without raw document text.
    pub fn quote_history(
        &self,
        id: &SupplierId,
    ) -> Result<Vec<QuoteHistoryEntry>, SupplierServiceError> {
        self.supplier(id)?;
        let quotes = self.ledger.for_supplier(id)?;
        Ok(quotes.iter().map(QuoteHistoryEntry::from).collect())
    }

    pub fn insight(&self, id: &SupplierId) -> Result<SupplierInsight, SupplierServiceError> {
        let supplier = self.supplier(id)?;
        let stats = self.stats.fetch_stats(id)?;
        Ok(SupplierInsight::new(&supplier, stats))
    }

    /// Look a supplier up with the same precedence as quote processing, without creating.
    pub fn find_supplier(
        &self,
        tax_id: Option<&str>,
        name: Option<&str>,
    ) -> Result<Option<Supplier>, SupplierServiceError> {
        if let Some(tax_id) = tax_id.and_then(normalize_tax_id) {
            return Ok(self.suppliers.find_by_tax_id(&tax_id)?);
        }

        match name.map(name_key).filter(|key| !key.is_empty()) {
            Some(key) => Ok(self.suppliers.find_by_name(&key)?),
            None => Ok(None),
        }
    }

    /// Suppliers ranked by reputation, then evidence, then name.
    pub fn leaderboard(
        &self,
        limit: usize,
    ) -> Result<Vec<SupplierReputationView>, SupplierServiceError> {
        let mut suppliers = self.suppliers.list()?;
        suppliers.sort_by(|a, b| {
            b.reputation_score
                .cmp(&a.reputation_score)
                .then_with(|| b.quote_count.cmp(&a.quote_count))
                .then_with(|| a.name_key().cmp(&b.name_key()))
        });

        Ok(suppliers
            .iter()
            .take(limit)
            .map(SupplierReputationView::from)
            .collect())
    }
}

/// Everything written for one processed quote.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedQuote {
    pub supplier: Supplier,
    pub quote: SupplierQuote,
    pub stats: SupplierStats,
    pub created: bool,
    pub components: Vec<ScoreComponent>,
}

impl ProcessedQuote {
    pub fn view(&self) -> ProcessedQuoteView {
        ProcessedQuoteView {
            created_supplier: self.created,
            supplier: SupplierReputationView::from(&self.supplier),
            quote: QuoteHistoryEntry::from(&self.quote),
            stats: self.stats.clone(),
            components: self.components.clone(),
        }
    }
}

/// Result of best-effort enrichment of an analysis job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EnrichmentOutcome {
    Scored(Box<ProcessedQuoteView>),
    Skipped { reason: String },
    Degraded { reason: String },
}

impl EnrichmentOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, EnrichmentOutcome::Degraded { .. })
    }
}

/// Error raised by the supplier reputation service.
#[derive(Debug, thiserror::Error)]
pub enum SupplierServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
