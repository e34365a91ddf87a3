use serde::{Deserialize, Serialize};
use tracing::warn;

/// Answers to number questions are divided by this before capping at 1.
pub const DEFAULT_NUMBER_SCALE: f64 = 10.0;
pub const DEFAULT_TEXT_ANSWER_SCORE: f64 = 0.7;

/// Inclusive lower bounds of each band, checked from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandThresholds {
    pub perfect: f64,
    pub great: f64,
    pub issues: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            perfect: 0.85,
            great: 0.65,
            issues: 0.40,
        }
    }
}

impl BandThresholds {
    pub fn is_valid(&self) -> bool {
        let within = |value: f64| value.is_finite() && (0.0..=1.0).contains(&value);
        within(self.perfect)
            && within(self.great)
            && within(self.issues)
            && self.perfect >= self.great
            && self.great >= self.issues
    }
}

/// Scoring dials applied by the evaluation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub number_scale: f64,
    pub text_answer_score: f64,
    pub thresholds: BandThresholds,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            number_scale: DEFAULT_NUMBER_SCALE,
            text_answer_score: DEFAULT_TEXT_ANSWER_SCORE,
            thresholds: BandThresholds::default(),
        }
    }
}

impl EvaluationConfig {
    /// Replace out-of-range dials with their defaults.
    pub fn sanitized(self) -> Self {
        let number_scale = if self.number_scale.is_finite() && self.number_scale > 0.0 {
            self.number_scale
        } else {
            warn!(value = self.number_scale, "number scale must be positive, using default");
            DEFAULT_NUMBER_SCALE
        };

        let text_answer_score = if self.text_answer_score.is_finite()
            && (0.0..=1.0).contains(&self.text_answer_score)
        {
            self.text_answer_score
        } else {
            warn!(
                value = self.text_answer_score,
                "text answer score must be within 0..=1, using default"
            );
            DEFAULT_TEXT_ANSWER_SCORE
        };

        let thresholds = if self.thresholds.is_valid() {
            self.thresholds
        } else {
            warn!(
                thresholds = ?self.thresholds,
                "band thresholds must descend within 0..=1, using defaults"
            );
            BandThresholds::default()
        };

        Self {
            number_scale,
            text_answer_score,
            thresholds,
        }
    }
}
