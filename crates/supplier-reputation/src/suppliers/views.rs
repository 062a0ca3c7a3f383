use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::domain::{
    ConfidenceLevel, JobReference, QuoteId, ScoreBreakdown, Supplier, SupplierId, SupplierQuote,
    SupplierStats,
};
use super::scoring::ScoreComponent;

/// Read-only reputation summary consumed by reporting and chat narratives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierReputationView {
    pub supplier_id: SupplierId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    pub reputation_score: u16,
    pub risk_score: u8,
    pub total_quotes_seen: u32,
    pub confidence: ConfidenceLevel,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl From<&Supplier> for SupplierReputationView {
    fn from(supplier: &Supplier) -> Self {
        Self {
            supplier_id: supplier.id.clone(),
            name: supplier.name.clone(),
            tax_id: supplier.tax_id.clone(),
            reputation_score: supplier.reputation_score,
            risk_score: supplier.risk_score(),
            total_quotes_seen: supplier.quote_count,
            confidence: supplier.confidence,
            first_seen_at: supplier.first_seen_at,
            last_seen_at: supplier.last_seen_at,
        }
    }
}

/// Ledger projection without the raw document text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteHistoryEntry {
    pub quote_id: QuoteId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<JobReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_date: Option<NaiveDate>,
    pub total_amount: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_category: Option<String>,
    pub scores: ScoreBreakdown,
    pub recorded_at: DateTime<Utc>,
}

impl From<&SupplierQuote> for QuoteHistoryEntry {
    fn from(quote: &SupplierQuote) -> Self {
        Self {
            quote_id: quote.id.clone(),
            job: quote.job.clone(),
            quote_number: quote.quote_number.clone(),
            quote_date: quote.quote_date,
            total_amount: quote.total_amount,
            currency: quote.currency.clone(),
            trade_category: quote.trade_category.clone(),
            scores: quote.scores,
            recorded_at: quote.recorded_at,
        }
    }
}

/// Reputation plus pricing context, phrased for a narrative consumer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierInsight {
    pub reputation: SupplierReputationView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<SupplierStats>,
    pub pricing_trend: String,
}

impl SupplierInsight {
    pub fn new(supplier: &Supplier, stats: Option<SupplierStats>) -> Self {
        let pricing_trend = pricing_trend(stats.as_ref());
        Self {
            reputation: SupplierReputationView::from(supplier),
            stats,
            pricing_trend,
        }
    }
}

pub fn pricing_trend(stats: Option<&SupplierStats>) -> String {
    let Some(stats) = stats else {
        return "no pricing history recorded".to_string();
    };

    if stats.quote_sample_size < 2 {
        return format!(
            "single quote on record at {:.2}; no prior quote to compare",
            stats.last_total_amount
        );
    }

    let change = stats.price_change_pct_vs_last;
    let direction = if change > 0.0 {
        format!("pricing up {:.1}% vs previous quote", change)
    } else if change < 0.0 {
        format!("pricing down {:.1}% vs previous quote", change.abs())
    } else {
        "pricing unchanged vs previous quote".to_string()
    };

    format!(
        "{direction}; median {:.2} across {} quotes",
        stats.median_total_amount, stats.quote_sample_size
    )
}

/// Response for a processed quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedQuoteView {
    pub created_supplier: bool,
    pub supplier: SupplierReputationView,
    pub quote: QuoteHistoryEntry,
    pub stats: SupplierStats,
    pub components: Vec<ScoreComponent>,
}
