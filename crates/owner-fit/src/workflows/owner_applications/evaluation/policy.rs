use super::super::domain::{ApplicationRecord, FitBand, Verdict};
use super::super::registry::Registry;
use super::config::{BandThresholds, EvaluationConfig};
use super::{rules, scoring};

pub(crate) fn band_for(fit_index: f64, thresholds: &BandThresholds) -> FitBand {
    if fit_index >= thresholds.perfect {
        FitBand::Perfect
    } else if fit_index >= thresholds.great {
        FitBand::Great
    } else if fit_index >= thresholds.issues {
        FitBand::Issues
    } else {
        FitBand::Bad
    }
}

/// Verdict-only path: no score components are collected.
pub(crate) fn decide_verdict(
    record: &ApplicationRecord,
    registry: &Registry,
    config: &EvaluationConfig,
) -> Verdict {
    if !record.is_completed() {
        return Verdict::not_evaluated();
    }

    if let Some(rule) = rules::first_disqualifier(record, registry) {
        return Verdict::disqualified(rule.id.clone());
    }

    let tally = scoring::tally(record, registry, config, |_, _| {});
    Verdict::scored(band_for(tally.fit_index(), &config.thresholds))
}
