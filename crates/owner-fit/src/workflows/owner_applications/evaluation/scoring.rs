use super::super::domain::{ApplicationRecord, FieldValue, Question, QuestionKind};
use super::super::registry::Registry;
use super::config::EvaluationConfig;

/// Running totals for the weighted fit index.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct FitTally {
    pub weighted_score: f64,
    pub total_weight: f64,
}

impl FitTally {
    pub fn fit_index(&self) -> f64 {
        if self.total_weight > 0.0 {
            self.weighted_score / self.total_weight
        } else {
            0.0
        }
    }
}

/// Score every answered question, reporting each scored one to `observe`.
///
/// Unanswered questions and answers that do not fit the question type are
/// left out of both the numerator and the denominator.
pub(crate) fn tally<F>(
    record: &ApplicationRecord,
    registry: &Registry,
    config: &EvaluationConfig,
    mut observe: F,
) -> FitTally
where
    F: FnMut(&Question, f64),
{
    let mut tally = FitTally::default();

    for question in registry.questions() {
        let Some(answer) = record.answers.get(&question.id.0) else {
            continue;
        };
        let Some(score) = answer_score(&question.kind, answer, config) else {
            continue;
        };

        tally.weighted_score += score * question.weight;
        tally.total_weight += question.weight;
        observe(question, score);
    }

    tally
}

pub(crate) fn answer_score(
    kind: &QuestionKind,
    answer: &FieldValue,
    config: &EvaluationConfig,
) -> Option<f64> {
    match (kind, answer) {
        (QuestionKind::Boolean, answer) => Some(if answer.is_truthy() { 1.0 } else { 0.0 }),
        (QuestionKind::Number, FieldValue::Number(value)) if value.is_finite() => {
            Some((value / config.number_scale).min(1.0))
        }
        (QuestionKind::Number, _) => None,
        (QuestionKind::Select { .. } | QuestionKind::Text, FieldValue::Text(text)) => {
            Some(if text.trim().is_empty() {
                0.0
            } else {
                config.text_answer_score
            })
        }
        (QuestionKind::Select { .. } | QuestionKind::Text, _) => None,
    }
}
