mod config;
mod rules;

pub use config::ScoringConfig;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{QuoteExtraction, ScoreBreakdown, SupplierDetails};
use super::validation::{validate_extraction, ValidatedExtraction, ValidationError};

/// Stateless scorer applying the integrity rubric to an extraction.
#[derive(Debug, Clone, Default)]
pub struct QuoteScorer {
    config: ScoringConfig,
}

impl QuoteScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Validate and score an extraction. `now` becomes the supplier's `last_seen_at`.
    pub fn score(
        &self,
        extraction: &QuoteExtraction,
        now: DateTime<Utc>,
    ) -> Result<ScoredQuote, ValidationError> {
        let validated = validate_extraction(extraction)?;
        Ok(self.score_validated(&validated, now))
    }

    pub fn score_validated(
        &self,
        extraction: &ValidatedExtraction,
        now: DateTime<Utc>,
    ) -> ScoredQuote {
        let (scores, components) = rules::score_extraction(extraction, &self.config);
        let fields = &extraction.fields;

        ScoredQuote {
            scores,
            components,
            supplier: SupplierDetails {
                name: extraction.supplier_name.clone(),
                trading_name: fields.trading_name.clone(),
                tax_id: fields.tax_id.clone(),
                phone: fields.phone.clone(),
                email: fields.email.clone(),
                address: fields.address.clone(),
                last_seen_at: now,
            },
        }
    }
}

/// Rubric line item, kept so a report can explain where points were won or lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: i16,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    SupplierName,
    TaxId,
    Contact,
    Address,
    QuoteDate,
    QuoteNumber,
    TotalAmount,
    Breakdown,
    Inclusions,
    Exclusions,
    SpecificScope,
    VagueLanguage,
    ProvisionalSum,
    LumpSumOnly,
    BroadRiskExclusion,
}

/// Scorer output: the score triple and the normalized supplier projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredQuote {
    pub scores: ScoreBreakdown,
    pub components: Vec<ScoreComponent>,
    pub supplier: SupplierDetails,
}
