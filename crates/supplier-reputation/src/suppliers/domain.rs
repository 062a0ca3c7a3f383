use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound of both a single quote's total score and a supplier's reputation.
pub const MAX_SCORE: u16 = 1000;

/// Identifier wrapper for canonical supplier records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SupplierId(pub String);

impl fmt::Display for SupplierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for ledger entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteId(pub String);

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to the analysis job a quote came from. Used for traceability only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobReference(pub String);

impl fmt::Display for JobReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structured fields pulled from a quote document by the upstream extraction step.
///
/// Everything is optional on the wire; `supplier_name` and `total_amount` are required by
/// the scorer and checked before anything is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteExtraction {
    pub supplier_name: Option<String>,
    pub trading_name: Option<String>,
    #[serde(alias = "abn")]
    pub tax_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub quote_date: Option<String>,
    pub quote_number: Option<String>,
    pub total_amount: Option<f64>,
    pub currency: Option<String>,
    pub trade_category: Option<String>,
    pub raw_text: Option<String>,
    pub has_breakdown: bool,
    pub has_inclusions: bool,
    pub has_exclusions: bool,
    pub has_specific_scope: bool,
    pub vague_phrase_count: u32,
    pub has_provisional_sum: bool,
    pub lump_sum_multi_step: bool,
    pub has_broad_risk_exclusion: bool,
}

/// Per-quote score triple plus the derived total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub completeness: u16,
    pub clarity: u16,
    pub risk: u16,
    pub total: u16,
}

/// Normalized supplier projection produced alongside a quote's scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierDetails {
    pub name: String,
    pub trading_name: Option<String>,
    pub tax_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub last_seen_at: DateTime<Utc>,
}

impl SupplierDetails {
    /// Key used for name-based identity when no tax id is known.
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }
}

/// Case-insensitive exact-match key for supplier names.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Tax ids are compared with all whitespace removed ("12 345 678 901" == "12345678901").
pub fn normalize_tax_id(raw: &str) -> Option<String> {
    let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        None
    } else {
        Some(compact)
    }
}

/// Monotonic tier describing how much evidence backs a supplier's reputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    Low,
    Med,
    High,
}

impl ConfidenceLevel {
    /// Tier implied by the number of quotes observed so far.
    pub const fn for_quote_count(count: u32) -> Self {
        if count >= 3 {
            ConfidenceLevel::High
        } else if count >= 2 {
            ConfidenceLevel::Med
        } else {
            ConfidenceLevel::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "LOW",
            ConfidenceLevel::Med => "MED",
            ConfidenceLevel::High => "HIGH",
        }
    }
}

/// Canonical identity for a business that has issued quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub trading_name: Option<String>,
    pub tax_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub quote_count: u32,
    pub reputation_score: u16,
    pub confidence: ConfidenceLevel,
}

impl Supplier {
    /// Seed a supplier from its first scored quote.
    pub fn seeded(id: SupplierId, details: &SupplierDetails, first_total: u16) -> Self {
        Self {
            id,
            name: details.name.clone(),
            trading_name: details.trading_name.clone(),
            tax_id: details.tax_id.clone(),
            phone: details.phone.clone(),
            email: details.email.clone(),
            address: details.address.clone(),
            first_seen_at: details.last_seen_at,
            last_seen_at: details.last_seen_at,
            quote_count: 1,
            reputation_score: first_total.min(MAX_SCORE),
            confidence: ConfidenceLevel::Low,
        }
    }

    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }

    /// Reputation expressed as a 0-100 risk figure for narrative consumers.
    pub fn risk_score(&self) -> u8 {
        let score = self.reputation_score.min(MAX_SCORE);
        (100 - score / 10) as u8
    }
}

/// One scored observation of a supplier's pricing. Immutable once appended to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierQuote {
    pub id: QuoteId,
    pub supplier_id: SupplierId,
    pub job: Option<JobReference>,
    pub quote_number: Option<String>,
    pub quote_date: Option<NaiveDate>,
    pub total_amount: f64,
    pub currency: String,
    pub trade_category: Option<String>,
    pub raw_text: Option<String>,
    pub scores: ScoreBreakdown,
    pub recorded_at: DateTime<Utc>,
    /// Ledger append order; assigned by the ledger.
    pub sequence: u64,
}

/// Denormalized aggregate over one supplier's quote history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierStats {
    pub supplier_id: SupplierId,
    pub last_total_amount: f64,
    pub median_total_amount: f64,
    pub min_total_amount: f64,
    pub max_total_amount: f64,
    pub last_quote_date: Option<NaiveDate>,
    pub price_change_pct_vs_last: f64,
    pub quote_sample_size: u32,
    pub computed_at: DateTime<Utc>,
}
