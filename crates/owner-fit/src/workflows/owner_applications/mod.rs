//! Owner application screening: question/rule registry, disqualification and
//! weighted fit scoring, and the band presentation consumed by dashboards.

pub mod domain;
pub mod evaluation;
pub mod presentation;
pub mod registry;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationId, ApplicationRecord, ApplicationStatus, FieldValue, FitBand, Question,
    QuestionId, QuestionKind, Rule, RuleId, RuleOperator, Verdict,
};
pub use evaluation::{
    evaluate, BandThresholds, EvaluationConfig, EvaluationEngine, EvaluationOutcome,
    ScoreComponent, DEFAULT_NUMBER_SCALE, DEFAULT_TEXT_ANSWER_SCORE,
};
pub use presentation::{band_color, band_label, presentation, BandPresentation};
pub use registry::{
    EntryKind, Registry, RegistryDefinition, RegistryError, RuleDefinition, SharedRegistry,
};
pub use service::{band_counts, BandCount, BoardQuery, ScreeningService, ScreeningView};
