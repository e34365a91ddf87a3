//! Question and rule registry backing owner application screening.
//!
//! Integrity is enforced when the registry is mutated so evaluation never has
//! to reject configuration at scoring time.

mod definition;
mod shared;

pub use definition::{RegistryDefinition, RuleDefinition};
pub use shared::SharedRegistry;

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use super::domain::{FieldValue, Question, QuestionKind, Rule};

/// Which registry collection an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Question,
    Rule,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Question => write!(f, "question"),
            EntryKind::Rule => write!(f, "rule"),
        }
    }
}

/// Error enumeration for registry mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("{kind} '{id}' already exists")]
    DuplicateIdentifier { kind: EntryKind, id: String },
    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntryKind, id: String },
    #[error("invalid rule '{id}': {reason}")]
    InvalidRule { id: String, reason: String },
    #[error("invalid question '{id}': {reason}")]
    InvalidQuestion { id: String, reason: String },
}

trait CatalogEntry: Clone {
    const KIND: EntryKind;

    fn key(&self) -> &str;
    fn order(&self) -> Option<u32>;
}

impl CatalogEntry for Question {
    const KIND: EntryKind = EntryKind::Question;

    fn key(&self) -> &str {
        &self.id.0
    }

    fn order(&self) -> Option<u32> {
        self.order
    }
}

impl CatalogEntry for Rule {
    const KIND: EntryKind = EntryKind::Rule;

    fn key(&self) -> &str {
        &self.id.0
    }

    fn order(&self) -> Option<u32> {
        self.order
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    sequence: u64,
    item: T,
}

/// Entries keyed by id plus the derived listing order.
#[derive(Debug, Clone)]
struct Catalog<T> {
    entries: BTreeMap<String, Slot<T>>,
    listing: Vec<String>,
    next_sequence: u64,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            listing: Vec::new(),
            next_sequence: 0,
        }
    }
}

impl<T: CatalogEntry> Catalog<T> {
    fn get(&self, id: &str) -> Option<&T> {
        self.entries.get(id).map(|slot| &slot.item)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn insert(&mut self, item: T) -> Result<(), RegistryError> {
        if self.entries.contains_key(item.key()) {
            return Err(RegistryError::DuplicateIdentifier {
                kind: T::KIND,
                id: item.key().to_string(),
            });
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries
            .insert(item.key().to_string(), Slot { sequence, item });
        self.rebuild_listing();
        Ok(())
    }

    fn replace(&mut self, item: T) -> Result<(), RegistryError> {
        match self.entries.get_mut(item.key()) {
            Some(slot) => {
                slot.item = item;
                self.rebuild_listing();
                Ok(())
            }
            None => Err(RegistryError::NotFound {
                kind: T::KIND,
                id: item.key().to_string(),
            }),
        }
    }

    fn remove(&mut self, id: &str) -> Result<T, RegistryError> {
        let slot = self
            .entries
            .remove(id)
            .ok_or_else(|| RegistryError::NotFound {
                kind: T::KIND,
                id: id.to_string(),
            })?;
        self.rebuild_listing();
        Ok(slot.item)
    }

    fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.listing
            .iter()
            .filter_map(|id| self.entries.get(id).map(|slot| &slot.item))
    }

    // Explicit order first (ascending, ties by insertion), then unordered
    // entries in insertion order.
    fn rebuild_listing(&mut self) {
        let mut keyed: Vec<(bool, u32, u64, &String)> = self
            .entries
            .iter()
            .map(|(id, slot)| {
                let order = slot.item.order();
                (order.is_none(), order.unwrap_or(0), slot.sequence, id)
            })
            .collect();
        keyed.sort();
        self.listing = keyed.into_iter().map(|(_, _, _, id)| id.clone()).collect();
    }
}

/// Current set of scoring questions and disqualifying rules.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    questions: Catalog<Question>,
    rules: Catalog<Rule>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_question(&mut self, question: Question) -> Result<(), RegistryError> {
        validate_question(&question)?;
        debug!(question_id = %question.id.0, kind = question.kind.label(), "adding question");
        self.questions.insert(question)
    }

    pub fn update_question(&mut self, question: Question) -> Result<(), RegistryError> {
        validate_question(&question)?;
        debug!(question_id = %question.id.0, "updating question");
        self.questions.replace(question)
    }

    pub fn remove_question(&mut self, id: &str) -> Result<Question, RegistryError> {
        debug!(question_id = id, "removing question");
        self.questions.remove(id)
    }

    pub fn add_rule(&mut self, rule: Rule) -> Result<(), RegistryError> {
        validate_rule(&rule)?;
        debug!(rule_id = %rule.id.0, field = %rule.field, "adding rule");
        self.rules.insert(rule)
    }

    pub fn update_rule(&mut self, rule: Rule) -> Result<(), RegistryError> {
        validate_rule(&rule)?;
        debug!(rule_id = %rule.id.0, "updating rule");
        self.rules.replace(rule)
    }

    pub fn remove_rule(&mut self, id: &str) -> Result<Rule, RegistryError> {
        debug!(rule_id = id, "removing rule");
        self.rules.remove(id)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.get(id)
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.get(id)
    }

    /// Questions in listing order. Each call starts a fresh pass.
    pub fn questions(&self) -> impl Iterator<Item = &Question> + '_ {
        self.questions.iter()
    }

    /// Rules in evaluation order. Each call starts a fresh pass.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> + '_ {
        self.rules.iter()
    }

    pub fn list_questions(&self) -> Vec<Question> {
        self.questions().cloned().collect()
    }

    pub fn list_rules(&self) -> Vec<Rule> {
        self.rules().cloned().collect()
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

/// Besides empty ids and labels, rejects weights that are negative or not
/// finite and select questions whose option list is empty or has blanks.
fn validate_question(question: &Question) -> Result<(), RegistryError> {
    let invalid = |reason: &str| RegistryError::InvalidQuestion {
        id: question.id.0.clone(),
        reason: reason.to_string(),
    };

    if question.id.0.trim().is_empty() {
        return Err(invalid("id must not be empty"));
    }
    if question.label.trim().is_empty() {
        return Err(invalid("label must not be empty"));
    }
    if !question.weight.is_finite() || question.weight < 0.0 {
        return Err(invalid("weight must be a finite, non-negative number"));
    }
    if let QuestionKind::Select { options } = &question.kind {
        if options.is_empty() {
            return Err(invalid("select questions need at least one option"));
        }
        if options.iter().any(|option| option.trim().is_empty()) {
            return Err(invalid("select options must not be blank"));
        }
    }

    Ok(())
}

/// Besides empty ids, labels, and fields, rejects operands the comparison could
/// never satisfy: non-finite numbers, and booleans paired with an ordering
/// operator. Both would otherwise never match at evaluation time.
fn validate_rule(rule: &Rule) -> Result<(), RegistryError> {
    let invalid = |reason: &str| RegistryError::InvalidRule {
        id: rule.id.0.clone(),
        reason: reason.to_string(),
    };

    if rule.id.0.trim().is_empty() {
        return Err(invalid("id must not be empty"));
    }
    if rule.label.trim().is_empty() {
        return Err(invalid("label must not be empty"));
    }
    if rule.field.trim().is_empty() {
        return Err(invalid("field must not be empty"));
    }
    match &rule.value {
        FieldValue::Number(value) if !value.is_finite() => {
            Err(invalid("numeric operand must be finite"))
        }
        FieldValue::Boolean(_) if !rule.operator.is_equality() => Err(invalid(&format!(
            "boolean operand only supports == and !=, found {}",
            rule.operator.symbol()
        ))),
        _ => Ok(()),
    }
}
