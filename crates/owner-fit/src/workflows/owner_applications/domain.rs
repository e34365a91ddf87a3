use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for submitted owner applications.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for scoring questions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub String);

/// Identifier wrapper for disqualifying rules.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RuleId(pub String);

/// Scalar value carried by answers, record attributes, and rule operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub const fn type_label(&self) -> &'static str {
        match self {
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "text",
        }
    }

    /// Loose truthiness used when scoring boolean questions.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Boolean(value) => *value,
            FieldValue::Number(value) => *value != 0.0 && !value.is_nan(),
            FieldValue::Text(value) => !value.is_empty(),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Answer shape a question expects. Select questions own their option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    Boolean,
    Number,
    Select { options: Vec<String> },
    Text,
}

impl QuestionKind {
    pub const fn label(&self) -> &'static str {
        match self {
            QuestionKind::Boolean => "boolean",
            QuestionKind::Number => "number",
            QuestionKind::Select { .. } => "select",
            QuestionKind::Text => "text",
        }
    }

    pub fn options(&self) -> &[String] {
        match self {
            QuestionKind::Select { options } => options,
            _ => &[],
        }
    }
}

/// Weighted scoring criterion shown on the owner application form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub label: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl Question {
    pub fn new(id: &str, label: &str, kind: QuestionKind, weight: f64) -> Self {
        Self {
            id: QuestionId(id.to_string()),
            label: label.to_string(),
            kind,
            weight,
            order: None,
        }
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }
}

/// Comparison applied by a disqualifying rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleOperator {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
}

impl RuleOperator {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::GreaterThan,
            Self::GreaterOrEqual,
            Self::LessThan,
            Self::LessOrEqual,
            Self::Equal,
            Self::NotEqual,
        ]
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::GreaterThan => ">",
            Self::GreaterOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|operator| operator.symbol() == symbol.trim())
    }

    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Equal | Self::NotEqual)
    }

    /// Whether `left <op> right` holds given the ordering of left against right.
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::GreaterThan => ordering == Ordering::Greater,
            Self::GreaterOrEqual => ordering != Ordering::Less,
            Self::LessThan => ordering == Ordering::Less,
            Self::LessOrEqual => ordering != Ordering::Greater,
            Self::Equal => ordering == Ordering::Equal,
            Self::NotEqual => ordering != Ordering::Equal,
        }
    }
}

/// Hard elimination criterion evaluated before any scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub label: String,
    pub field: String,
    pub operator: RuleOperator,
    pub value: FieldValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl Rule {
    pub fn new(
        id: &str,
        label: &str,
        field: &str,
        operator: RuleOperator,
        value: impl Into<FieldValue>,
    ) -> Self {
        Self {
            id: RuleId(id.to_string()),
            label: label.to_string(),
            field: field.to_string(),
            operator,
            value: value.into(),
            order: None,
        }
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn describe(&self) -> String {
        format!(
            "{} ({} {} {})",
            self.label,
            self.field,
            self.operator.symbol(),
            display_value(&self.value)
        )
    }
}

fn display_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Boolean(flag) => flag.to_string(),
        FieldValue::Number(number) => number.to_string(),
        FieldValue::Text(text) => format!("\"{text}\""),
    }
}

/// Form completion state; only completed applications receive a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Partial,
    Completed,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Partial => "partial",
            ApplicationStatus::Completed => "completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "partial" => Some(Self::Partial),
            "completed" | "complete" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Owner application as captured by the form surface.
///
/// Extra top-level keys on the serialized object are scalar attributes that
/// rules can target alongside answers. `null` values are treated as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawApplicationRecord")]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub status: ApplicationStatus,
    pub answers: BTreeMap<String, FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, FieldValue>,
}

impl ApplicationRecord {
    pub fn new(id: &str, status: ApplicationStatus) -> Self {
        Self {
            id: ApplicationId(id.to_string()),
            status,
            answers: BTreeMap::new(),
            submitted_at: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_answer(mut self, question_id: &str, value: impl Into<FieldValue>) -> Self {
        self.answers.insert(question_id.to_string(), value.into());
        self
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn submitted_at(mut self, at: DateTime<Utc>) -> Self {
        self.submitted_at = Some(at);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == ApplicationStatus::Completed
    }

    /// Answers shadow top-level attributes of the same name.
    pub fn resolve_field(&self, field: &str) -> Option<&FieldValue> {
        self.answers
            .get(field)
            .or_else(|| self.attributes.get(field))
    }
}

#[derive(Debug, Deserialize)]
struct RawApplicationRecord {
    id: ApplicationId,
    status: ApplicationStatus,
    #[serde(default)]
    answers: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    submitted_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    attributes: BTreeMap<String, serde_json::Value>,
}

impl TryFrom<RawApplicationRecord> for ApplicationRecord {
    type Error = String;

    fn try_from(raw: RawApplicationRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: raw.id,
            status: raw.status,
            answers: scalar_map("answer", raw.answers)?,
            submitted_at: raw.submitted_at,
            attributes: scalar_map("attribute", raw.attributes)?,
        })
    }
}

fn scalar_map(
    kind: &str,
    raw: BTreeMap<String, serde_json::Value>,
) -> Result<BTreeMap<String, FieldValue>, String> {
    let mut values = BTreeMap::new();
    for (key, value) in raw {
        let scalar = match value {
            serde_json::Value::Null => continue,
            serde_json::Value::Bool(flag) => FieldValue::Boolean(flag),
            serde_json::Value::Number(number) => match number.as_f64() {
                Some(number) => FieldValue::Number(number),
                None => return Err(format!("{kind} '{key}' is not representable as f64")),
            },
            serde_json::Value::String(text) => FieldValue::Text(text),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                return Err(format!("{kind} '{key}' must be a scalar value"));
            }
        };
        values.insert(key, scalar);
    }
    Ok(values)
}

/// Discrete fit classification shown on dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitBand {
    Perfect,
    Great,
    Issues,
    Bad,
}

impl FitBand {
    pub const fn ordered() -> [Self; 4] {
        [Self::Perfect, Self::Great, Self::Issues, Self::Bad]
    }

    pub const fn key(self) -> &'static str {
        match self {
            FitBand::Perfect => "perfect",
            FitBand::Great => "great",
            FitBand::Issues => "issues",
            FitBand::Bad => "bad",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|band| band.key().eq_ignore_ascii_case(raw.trim()))
    }

    /// Board position; not-evaluated records rank after every band.
    pub const fn rank(band: Option<Self>) -> u8 {
        match band {
            Some(FitBand::Perfect) => 0,
            Some(FitBand::Great) => 1,
            Some(FitBand::Issues) => 2,
            Some(FitBand::Bad) => 3,
            None => 4,
        }
    }
}

/// Result of evaluating one application against a registry snapshot.
///
/// Fields are private so a disqualified verdict can only carry the `bad` band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    band: Option<FitBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disqualified_by_rule_id: Option<RuleId>,
}

impl Verdict {
    pub const fn not_evaluated() -> Self {
        Self {
            band: None,
            disqualified_by_rule_id: None,
        }
    }

    pub fn disqualified(rule_id: RuleId) -> Self {
        Self {
            band: Some(FitBand::Bad),
            disqualified_by_rule_id: Some(rule_id),
        }
    }

    pub const fn scored(band: FitBand) -> Self {
        Self {
            band: Some(band),
            disqualified_by_rule_id: None,
        }
    }

    pub const fn band(&self) -> Option<FitBand> {
        self.band
    }

    pub fn disqualified_by_rule_id(&self) -> Option<&RuleId> {
        self.disqualified_by_rule_id.as_ref()
    }

    pub fn is_evaluated(&self) -> bool {
        self.band.is_some()
    }
}
