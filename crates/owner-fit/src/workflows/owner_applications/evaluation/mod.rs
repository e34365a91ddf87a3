mod config;
mod policy;
mod rules;
mod scoring;

pub use config::{BandThresholds, EvaluationConfig, DEFAULT_NUMBER_SCALE, DEFAULT_TEXT_ANSWER_SCORE};

use super::domain::{ApplicationId, ApplicationRecord, QuestionId, Verdict};
use super::registry::Registry;
use serde::Serialize;
use tracing::trace;

/// Evaluate a record with the default scoring dials.
pub fn evaluate(record: &ApplicationRecord, registry: &Registry) -> Verdict {
    policy::decide_verdict(record, registry, &EvaluationConfig::default())
}

/// Stateless evaluator that applies the scoring configuration to records.
#[derive(Debug, Clone, Default)]
pub struct EvaluationEngine {
    config: EvaluationConfig,
}

impl EvaluationEngine {
    pub fn new(config: EvaluationConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn verdict(&self, record: &ApplicationRecord, registry: &Registry) -> Verdict {
        policy::decide_verdict(record, registry, &self.config)
    }

    /// Same verdict as [`EvaluationEngine::verdict`] plus the audit trail.
    pub fn score(&self, record: &ApplicationRecord, registry: &Registry) -> EvaluationOutcome {
        if !record.is_completed() {
            return EvaluationOutcome::without_score(record, Verdict::not_evaluated());
        }

        if let Some(rule) = rules::first_disqualifier(record, registry) {
            trace!(application_id = %record.id.0, rule_id = %rule.id.0, "disqualified");
            return EvaluationOutcome::without_score(record, Verdict::disqualified(rule.id.clone()));
        }

        let mut components = Vec::new();
        let tally = scoring::tally(record, registry, &self.config, |question, score| {
            components.push(ScoreComponent {
                question_id: question.id.clone(),
                question_type: question.kind.label(),
                score,
                weight: question.weight,
                weighted_score: score * question.weight,
            });
        });
        let fit_index = tally.fit_index();
        let band = policy::band_for(fit_index, &self.config.thresholds);
        trace!(application_id = %record.id.0, fit_index, band = band.key(), "scored");

        EvaluationOutcome {
            application_id: record.id.clone(),
            verdict: Verdict::scored(band),
            fit_index: Some(fit_index),
            weighted_score: tally.weighted_score,
            total_weight: tally.total_weight,
            components,
        }
    }
}

/// Contribution of one answered question to the fit index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub question_id: QuestionId,
    pub question_type: &'static str,
    pub score: f64,
    pub weight: f64,
    pub weighted_score: f64,
}

/// Verdict plus the figures it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationOutcome {
    pub application_id: ApplicationId,
    pub verdict: Verdict,
    /// Absent when the record was not scored (partial or disqualified).
    pub fit_index: Option<f64>,
    pub weighted_score: f64,
    pub total_weight: f64,
    pub components: Vec<ScoreComponent>,
}

impl EvaluationOutcome {
    fn without_score(record: &ApplicationRecord, verdict: Verdict) -> Self {
        Self {
            application_id: record.id.clone(),
            verdict,
            fit_index: None,
            weighted_score: 0.0,
            total_weight: 0.0,
            components: Vec::new(),
        }
    }
}
