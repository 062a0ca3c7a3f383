use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::super::domain::{JobReference, QuoteExtraction};
use super::ImportedExtraction;

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ImportedExtraction>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<ExtractionRow>() {
        let row = record?;
        rows.push(row.into_imported());
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractionRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    job: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    supplier_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    trading_name: Option<String>,
    #[serde(default, alias = "abn", deserialize_with = "empty_string_as_none")]
    tax_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    phone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    address: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    quote_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    quote_number: Option<String>,
    #[serde(default, deserialize_with = "optional_amount")]
    total_amount: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    currency: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    trade_category: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    has_breakdown: bool,
    #[serde(default, deserialize_with = "flag")]
    has_inclusions: bool,
    #[serde(default, deserialize_with = "flag")]
    has_exclusions: bool,
    #[serde(default, deserialize_with = "flag")]
    has_specific_scope: bool,
    #[serde(default, deserialize_with = "count")]
    vague_phrase_count: u32,
    #[serde(default, deserialize_with = "flag")]
    has_provisional_sum: bool,
    #[serde(default, deserialize_with = "flag")]
    lump_sum_multi_step: bool,
    #[serde(default, deserialize_with = "flag")]
    has_broad_risk_exclusion: bool,
}

impl ExtractionRow {
    fn into_imported(self) -> ImportedExtraction {
        ImportedExtraction {
            job: self.job.map(JobReference),
            extraction: QuoteExtraction {
                supplier_name: self.supplier_name,
                trading_name: self.trading_name,
                tax_id: self.tax_id,
                phone: self.phone,
                email: self.email,
                address: self.address,
                quote_date: self.quote_date,
                quote_number: self.quote_number,
                total_amount: self.total_amount,
                currency: self.currency,
                trade_category: self.trade_category,
                raw_text: None,
                has_breakdown: self.has_breakdown,
                has_inclusions: self.has_inclusions,
                has_exclusions: self.has_exclusions,
                has_specific_scope: self.has_specific_scope,
                vague_phrase_count: self.vague_phrase_count,
                has_provisional_sum: self.has_provisional_sum,
                lump_sum_multi_step: self.lump_sum_multi_step,
                has_broad_risk_exclusion: self.has_broad_risk_exclusion,
            },
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = empty_string_as_none(deserializer)? else {
        return Ok(None);
    };

    let cleaned: String = raw
        .chars()
        .filter(|ch| !matches!(ch, '$' | ',' | ' '))
        .collect();
    cleaned
        .parse::<f64>()
        .map(Some)
        .map_err(|_| serde::de::Error::custom(format!("invalid amount '{raw}'")))
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = empty_string_as_none(deserializer)? else {
        return Ok(false);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected a yes/no flag, found '{other}'"
        ))),
    }
}

fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = empty_string_as_none(deserializer)? else {
        return Ok(0);
    };

    raw.trim()
        .parse::<u32>()
        .map_err(|_| serde::de::Error::custom(format!("invalid count '{raw}'")))
}
