//! Import of owner applications from the form tool's CSV export.

mod parser;

use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::workflows::owner_applications::domain::ApplicationRecord;
use crate::workflows::owner_applications::registry::Registry;

use parser::ColumnLayout;

#[derive(Debug)]
pub enum FormExportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn { column: &'static str },
    DuplicateColumn { column: String },
    MissingApplicationId { row: u64 },
    InvalidStatus { row: u64, value: String },
    InvalidTimestamp { row: u64, value: String },
}

impl std::fmt::Display for FormExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormExportError::Io(err) => write!(f, "failed to read form export: {}", err),
            FormExportError::Csv(err) => write!(f, "invalid form export CSV data: {}", err),
            FormExportError::MissingColumn { column } => {
                write!(f, "form export is missing the '{}' column", column)
            }
            FormExportError::DuplicateColumn { column } => {
                write!(f, "form export has more than one '{}' column", column)
            }
            FormExportError::MissingApplicationId { row } => {
                write!(f, "row {} has no application id", row)
            }
            FormExportError::InvalidStatus { row, value } => write!(
                f,
                "row {} has status '{}', expected completed or partial",
                row, value
            ),
            FormExportError::InvalidTimestamp { row, value } => write!(
                f,
                "row {} has submission time '{}', expected RFC 3339 or YYYY-MM-DD",
                row, value
            ),
        }
    }
}

impl std::error::Error for FormExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormExportError::Io(err) => Some(err),
            FormExportError::Csv(err) => Some(err),
            FormExportError::MissingColumn { .. }
            | FormExportError::DuplicateColumn { .. }
            | FormExportError::MissingApplicationId { .. }
            | FormExportError::InvalidStatus { .. }
            | FormExportError::InvalidTimestamp { .. } => None,
        }
    }
}

impl From<std::io::Error> for FormExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for FormExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Builds application records from a form export. Columns named after a
/// registered question become typed answers; every other column becomes a
/// record attribute that rules can target.
pub struct FormExportImporter;

impl FormExportImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        registry: &Registry,
    ) -> Result<Vec<ApplicationRecord>, FormExportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, registry)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        registry: &Registry,
    ) -> Result<Vec<ApplicationRecord>, FormExportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let layout = ColumnLayout::from_headers(&headers, registry)?;
        let mut records = Vec::new();

        for (index, row) in csv_reader.records().enumerate() {
            let row = row?;
            let line = row
                .position()
                .map(|position| position.line())
                .unwrap_or(index as u64 + 2);
            records.push(layout.parse_row(&row, line)?);
        }

        info!(
            applications = records.len(),
            answer_columns = layout.answer_columns(),
            "imported form export"
        );
        Ok(records)
    }
}
