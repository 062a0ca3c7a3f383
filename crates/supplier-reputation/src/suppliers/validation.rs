use chrono::{DateTime, NaiveDate};

use super::domain::{normalize_tax_id, QuoteExtraction};

/// Reasons an extraction is rejected before any scoring or persistence happens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("extraction is missing the supplier name")]
    MissingSupplierName,
    #[error("extraction is missing the quote total amount")]
    MissingTotalAmount,
    #[error("quote total amount must be finite and non-negative, found {0}")]
    InvalidTotalAmount(f64),
}

/// Extraction that passed validation, with blank text fields collapsed to `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedExtraction {
    pub supplier_name: String,
    pub total_amount: f64,
    pub fields: QuoteExtraction,
}

impl ValidatedExtraction {
    pub fn quote_date(&self) -> Option<NaiveDate> {
        self.fields.quote_date.as_deref().and_then(parse_quote_date)
    }
}

pub fn validate_extraction(
    extraction: &QuoteExtraction,
) -> Result<ValidatedExtraction, ValidationError> {
    let mut fields = extraction.clone();
    fields.supplier_name = clean(fields.supplier_name);
    fields.trading_name = clean(fields.trading_name);
    fields.tax_id = fields.tax_id.as_deref().and_then(normalize_tax_id);
    fields.phone = clean(fields.phone);
    fields.email = clean(fields.email);
    fields.address = clean(fields.address);
    fields.quote_date = clean(fields.quote_date);
    fields.quote_number = clean(fields.quote_number);
    fields.currency = clean(fields.currency).map(|code| code.to_ascii_uppercase());
    fields.trade_category = clean(fields.trade_category);
    fields.raw_text = fields.raw_text.filter(|text| !text.trim().is_empty());

    let supplier_name = fields
        .supplier_name
        .clone()
        .ok_or(ValidationError::MissingSupplierName)?;
    let total_amount = fields
        .total_amount
        .ok_or(ValidationError::MissingTotalAmount)?;
    if !total_amount.is_finite() || total_amount < 0.0 {
        return Err(ValidationError::InvalidTotalAmount(total_amount));
    }

    Ok(ValidatedExtraction {
        supplier_name,
        total_amount,
        fields,
    })
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Quote dates arrive in whatever shape the document used; unparseable dates are dropped
/// from the ledger record but still count as "present" for completeness scoring.
pub fn parse_quote_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    const FORMATS: [&str; 5] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d %B %Y", "%d %b %Y"];
    FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}
