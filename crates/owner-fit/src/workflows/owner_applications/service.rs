use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use super::domain::{ApplicationId, ApplicationRecord, FitBand, RuleId, Verdict};
use super::evaluation::{EvaluationConfig, EvaluationEngine};
use super::presentation::presentation;
use super::registry::{Registry, SharedRegistry};

/// Service composing the shared registry and the evaluation engine.
#[derive(Debug, Clone)]
pub struct ScreeningService {
    registry: SharedRegistry,
    engine: EvaluationEngine,
}

impl ScreeningService {
    pub fn new(registry: SharedRegistry, config: EvaluationConfig) -> Self {
        Self {
            registry,
            engine: EvaluationEngine::new(config),
        }
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &EvaluationEngine {
        &self.engine
    }

    /// Screen one application against the current registry snapshot.
    pub fn screen(&self, record: &ApplicationRecord) -> ScreeningView {
        let snapshot = self.registry.snapshot();
        self.view(record, &snapshot)
    }

    /// Screen many applications against a single snapshot, preserving input order.
    pub fn screen_batch(&self, records: &[ApplicationRecord]) -> Vec<ScreeningView> {
        let snapshot = self.registry.snapshot();
        let views: Vec<ScreeningView> = records
            .par_iter()
            .map(|record| self.view(record, &snapshot))
            .collect();

        info!(
            applications = views.len(),
            questions = snapshot.question_count(),
            rules = snapshot.rule_count(),
            "screened application batch"
        );
        views
    }

    /// Filtered, band-sorted listing backing the applications board.
    pub fn board(&self, records: &[ApplicationRecord], query: &BoardQuery) -> Vec<ScreeningView> {
        let mut views: Vec<ScreeningView> = self
            .screen_batch(records)
            .into_iter()
            .filter(|view| query.admits(view.band))
            .collect();

        views.sort_by(|left, right| {
            board_key(left)
                .cmp(&board_key(right))
                .then_with(|| left.application_id.cmp(&right.application_id))
        });
        views
    }

    fn view(&self, record: &ApplicationRecord, registry: &Registry) -> ScreeningView {
        let outcome = self.engine.score(record, registry);
        ScreeningView::new(record, outcome.verdict, outcome.fit_index)
    }
}

/// Band filter applied to board listings. An empty filter admits everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardQuery {
    pub bands: Vec<Option<FitBand>>,
}

impl BoardQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only(bands: impl IntoIterator<Item = Option<FitBand>>) -> Self {
        Self {
            bands: bands.into_iter().collect(),
        }
    }

    pub fn admits(&self, band: Option<FitBand>) -> bool {
        self.bands.is_empty() || self.bands.contains(&band)
    }
}

/// Dashboard-facing representation of a screened application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningView {
    pub application_id: ApplicationId,
    pub status: &'static str,
    pub band: Option<FitBand>,
    pub band_label: &'static str,
    pub band_color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disqualified_by_rule_id: Option<RuleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit_index: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl ScreeningView {
    fn new(record: &ApplicationRecord, verdict: Verdict, fit_index: Option<f64>) -> Self {
        let band = verdict.band();
        let shown = presentation(band);
        Self {
            application_id: record.id.clone(),
            status: record.status.label(),
            band,
            band_label: shown.label,
            band_color: shown.color,
            disqualified_by_rule_id: verdict.disqualified_by_rule_id().cloned(),
            fit_index,
            submitted_at: record.submitted_at,
        }
    }
}

// Band rank, then most recent submission first with undated applications last.
fn board_key(view: &ScreeningView) -> (u8, bool, Reverse<Option<DateTime<Utc>>>) {
    (
        FitBand::rank(view.band),
        view.submitted_at.is_none(),
        Reverse(view.submitted_at),
    )
}

/// Tally for one board header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BandCount {
    pub band: Option<FitBand>,
    pub label: &'static str,
    pub color: &'static str,
    pub count: usize,
}

/// Per-band tallies in board order, with not evaluated last. Empty bands are
/// included with a zero count.
pub fn band_counts(views: &[ScreeningView]) -> Vec<BandCount> {
    FitBand::ordered()
        .map(Some)
        .into_iter()
        .chain([None])
        .map(|band| {
            let shown = presentation(band);
            BandCount {
                band,
                label: shown.label,
                color: shown.color,
                count: views.iter().filter(|view| view.band == band).count(),
            }
        })
        .collect()
}
