mod parser;

use std::io::Read;
use std::path::Path;

use super::domain::{JobReference, QuoteExtraction};

#[derive(Debug)]
pub enum ExtractionImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ExtractionImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionImportError::Io(err) => {
                write!(f, "failed to read extraction batch: {}", err)
            }
            ExtractionImportError::Csv(err) => {
                write!(f, "invalid extraction CSV data: {}", err)
            }
        }
    }
}

impl std::error::Error for ExtractionImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractionImportError::Io(err) => Some(err),
            ExtractionImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExtractionImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ExtractionImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// One CSV row: the extraction plus the job it came from, when the export named one.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedExtraction {
    pub job: Option<JobReference>,
    pub extraction: QuoteExtraction,
}

/// Reads batches of extractions exported by the analysis pipeline.
///
/// Columns use the same camelCase names as the JSON payload (`supplierName`, `abn` or
/// `taxId`, `totalAmount`, `hasBreakdown`, ...). Blank cells are absent fields.
pub struct ExtractionCsvImporter;

impl ExtractionCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<ImportedExtraction>, ExtractionImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<ImportedExtraction>, ExtractionImportError> {
        Ok(parser::parse_rows(reader)?)
    }
}
