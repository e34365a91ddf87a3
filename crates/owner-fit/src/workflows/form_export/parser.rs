use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use csv::StringRecord;

use super::FormExportError;
use crate::workflows::owner_applications::domain::{
    ApplicationRecord, ApplicationStatus, FieldValue, QuestionKind,
};
use crate::workflows::owner_applications::registry::Registry;

pub(crate) const APPLICATION_ID_COLUMN: &str = "Application ID";
pub(crate) const STATUS_COLUMN: &str = "Status";
pub(crate) const SUBMITTED_AT_COLUMN: &str = "Submitted At";

#[derive(Debug)]
enum ColumnTarget {
    Answer(QuestionKind),
    Attribute,
}

#[derive(Debug)]
struct FieldColumn {
    index: usize,
    name: String,
    target: ColumnTarget,
}

/// Where each known column sits in the export, resolved once from the header.
#[derive(Debug)]
pub(crate) struct ColumnLayout {
    id: usize,
    status: usize,
    submitted_at: Option<usize>,
    fields: Vec<FieldColumn>,
}

impl ColumnLayout {
    pub(crate) fn from_headers(
        headers: &StringRecord,
        registry: &Registry,
    ) -> Result<Self, FormExportError> {
        if let Some(column) = duplicate_header(headers) {
            return Err(FormExportError::DuplicateColumn { column });
        }

        let find = |name: &str| headers.iter().position(|header| header.eq_ignore_ascii_case(name));

        let id = find(APPLICATION_ID_COLUMN).ok_or(FormExportError::MissingColumn {
            column: APPLICATION_ID_COLUMN,
        })?;
        let status = find(STATUS_COLUMN).ok_or(FormExportError::MissingColumn {
            column: STATUS_COLUMN,
        })?;
        let submitted_at = find(SUBMITTED_AT_COLUMN);

        let fields = headers
            .iter()
            .enumerate()
            .filter(|(index, header)| {
                *index != id && *index != status && Some(*index) != submitted_at && !header.is_empty()
            })
            .map(|(index, header)| {
                let question = registry
                    .questions()
                    .find(|question| question.id.0.eq_ignore_ascii_case(header));
                match question {
                    Some(question) => FieldColumn {
                        index,
                        name: question.id.0.clone(),
                        target: ColumnTarget::Answer(question.kind.clone()),
                    },
                    None => FieldColumn {
                        index,
                        name: header.to_string(),
                        target: ColumnTarget::Attribute,
                    },
                }
            })
            .collect();

        Ok(Self {
            id,
            status,
            submitted_at,
            fields,
        })
    }

    pub(crate) fn answer_columns(&self) -> usize {
        self.fields
            .iter()
            .filter(|column| matches!(column.target, ColumnTarget::Answer(_)))
            .count()
    }

    pub(crate) fn parse_row(
        &self,
        row: &StringRecord,
        line: u64,
    ) -> Result<ApplicationRecord, FormExportError> {
        let cell = |index: usize| row.get(index).unwrap_or("");

        let id = cell(self.id);
        if id.is_empty() {
            return Err(FormExportError::MissingApplicationId { row: line });
        }

        let raw_status = cell(self.status);
        let status =
            ApplicationStatus::parse(raw_status).ok_or_else(|| FormExportError::InvalidStatus {
                row: line,
                value: raw_status.to_string(),
            })?;

        let mut record = ApplicationRecord::new(id, status);

        if let Some(index) = self.submitted_at {
            let raw = cell(index);
            if !raw.is_empty() {
                let at = parse_timestamp(raw).ok_or_else(|| FormExportError::InvalidTimestamp {
                    row: line,
                    value: raw.to_string(),
                })?;
                record.submitted_at = Some(at);
            }
        }

        for column in &self.fields {
            let raw = cell(column.index);
            if raw.is_empty() {
                continue;
            }
            match &column.target {
                ColumnTarget::Answer(kind) => {
                    record
                        .answers
                        .insert(column.name.clone(), coerce_answer(kind, raw));
                }
                ColumnTarget::Attribute => {
                    record
                        .attributes
                        .insert(column.name.clone(), coerce_attribute(raw));
                }
            }
        }

        Ok(record)
    }
}

// Headers are compared the same way columns are resolved: trimmed by the
// reader, then ignoring ASCII case.
fn duplicate_header(headers: &StringRecord) -> Option<String> {
    let mut seen = HashSet::new();
    headers
        .iter()
        .filter(|header| !header.is_empty())
        .find(|header| !seen.insert(header.to_ascii_lowercase()))
        .map(str::to_string)
}

/// Coerces a cell by the question's type. Cells that do not fit stay text so
/// scoring treats them as unscoreable instead of guessing.
pub(crate) fn coerce_answer(kind: &QuestionKind, raw: &str) -> FieldValue {
    match kind {
        QuestionKind::Boolean => parse_flag(raw)
            .map(FieldValue::Boolean)
            .unwrap_or_else(|| FieldValue::text(raw)),
        QuestionKind::Number => parse_number(raw)
            .map(FieldValue::Number)
            .unwrap_or_else(|| FieldValue::text(raw)),
        QuestionKind::Select { .. } | QuestionKind::Text => FieldValue::text(raw),
    }
}

/// Attributes carry no declared type. Digits stay numbers, so `1` and `0` are
/// never read as flags here.
pub(crate) fn coerce_attribute(raw: &str) -> FieldValue {
    if let Some(flag) = parse_flag_word(raw) {
        return FieldValue::Boolean(flag);
    }
    match parse_number(raw) {
        Some(number) => FieldValue::Number(number),
        None => FieldValue::text(raw),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" => Some(true),
        "0" => Some(false),
        other => parse_flag_word(other),
    }
}

fn parse_flag_word(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" => Some(true),
        "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
