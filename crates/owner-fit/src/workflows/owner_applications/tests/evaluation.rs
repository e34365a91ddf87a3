use super::common::*;
use crate::workflows::owner_applications::domain::{
    FieldValue, FitBand, Question, QuestionKind, Rule, RuleId, RuleOperator, Verdict,
};
use crate::workflows::owner_applications::registry::Registry;
use crate::workflows::owner_applications::{evaluate, EvaluationConfig, EvaluationEngine};

#[test]
fn answered_boolean_yes_is_a_perfect_fit() {
    let registry = single_question_registry(Question::new(
        "q1",
        "Owns the property outright",
        QuestionKind::Boolean,
        1.0,
    ));
    let record = completed("app-1").with_answer("q1", true);

    let verdict = evaluate(&record, &registry);

    assert_eq!(verdict, Verdict::scored(FitBand::Perfect));
    assert!(verdict.disqualified_by_rule_id().is_none());
}

#[test]
fn answered_boolean_no_is_a_bad_fit_without_disqualification() {
    let registry = single_question_registry(Question::new(
        "q1",
        "Owns the property outright",
        QuestionKind::Boolean,
        1.0,
    ));
    let record = completed("app-2").with_answer("q1", false);

    let verdict = evaluate(&record, &registry);

    assert_eq!(verdict.band(), Some(FitBand::Bad));
    assert!(verdict.disqualified_by_rule_id().is_none());
}

#[test]
fn distance_rule_disqualifies_regardless_of_answers() {
    let registry = owner_registry();
    let record = strong_owner("app-3").with_attribute("distanceMinutesFromOffice", 45);

    let verdict = evaluate(&record, &registry);

    assert_eq!(verdict.band(), Some(FitBand::Bad));
    assert_eq!(
        verdict.disqualified_by_rule_id(),
        Some(&RuleId("too_far".to_string()))
    );
}

#[test]
fn partial_records_are_never_evaluated() {
    let registry = owner_registry();
    let record = partial("app-4")
        .with_answer("currently_rented", true)
        .with_attribute("distanceMinutesFromOffice", 45)
        .with_attribute("hoa_blocks_rentals", true);

    let verdict = evaluate(&record, &registry);

    assert_eq!(verdict, Verdict::not_evaluated());
    assert!(!verdict.is_evaluated());
}

#[test]
fn weighted_mix_of_number_and_boolean_lands_in_great() {
    let mut registry = Registry::new();
    registry
        .add_question(Question::new("q1", "Units", QuestionKind::Number, 0.5))
        .expect("question added");
    registry
        .add_question(Question::new("q2", "Rented", QuestionKind::Boolean, 0.5))
        .expect("question added");
    let record = completed("app-5")
        .with_answer("q1", 5)
        .with_answer("q2", true);

    let outcome = EvaluationEngine::default().score(&record, &registry);

    assert_eq!(outcome.weighted_score, 0.75);
    assert_eq!(outcome.total_weight, 1.0);
    assert_eq!(outcome.fit_index, Some(0.75));
    assert_eq!(outcome.verdict.band(), Some(FitBand::Great));
}

#[test]
fn first_matching_rule_wins() {
    let registry = owner_registry();
    let record = strong_owner("app-6")
        .with_attribute("distanceMinutesFromOffice", 50)
        .with_attribute("hoa_blocks_rentals", true);

    let verdict = evaluate(&record, &registry);

    assert_eq!(
        verdict.disqualified_by_rule_id(),
        Some(&RuleId("too_far".to_string()))
    );
}

#[test]
fn explicit_rule_order_decides_which_rule_wins() {
    let mut registry = owner_registry();
    registry
        .update_rule(hoa_blocks_rentals_rule().with_order(1))
        .expect("rule updated");
    let record = strong_owner("app-7")
        .with_attribute("distanceMinutesFromOffice", 50)
        .with_attribute("hoa_blocks_rentals", true);

    let verdict = evaluate(&record, &registry);

    assert_eq!(
        verdict.disqualified_by_rule_id(),
        Some(&RuleId("hoa_blocks_rentals".to_string()))
    );
}

#[test]
fn rules_on_absent_fields_never_disqualify() {
    let operands = [
        FieldValue::Number(0.0),
        FieldValue::Number(-100.0),
        FieldValue::text(""),
        FieldValue::text("anything"),
        FieldValue::Boolean(false),
    ];

    for operator in RuleOperator::ordered() {
        for operand in &operands {
            if matches!(operand, FieldValue::Boolean(_)) && !operator.is_equality() {
                continue;
            }
            let mut registry = owner_registry();
            registry
                .add_rule(
                    Rule::new(
                        "missing",
                        "Targets a field nobody sends",
                        "years_owned",
                        operator,
                        operand.clone(),
                    )
                    .with_order(0),
                )
                .expect("rule added");

            let verdict = evaluate(&strong_owner("app-8"), &registry);
            assert_eq!(
                verdict,
                Verdict::scored(FitBand::Perfect),
                "{} {:?} should not fire",
                operator.symbol(),
                operand
            );
        }
    }
}

#[test]
fn falsy_but_present_values_are_still_compared() {
    let mut registry = owner_registry();
    registry
        .add_rule(Rule::new(
            "no_units",
            "Reports zero units",
            "unit_count",
            RuleOperator::Equal,
            0,
        ))
        .expect("rule added");
    registry
        .add_rule(Rule::new(
            "blank_goals",
            "Left goals blank",
            "management_goals",
            RuleOperator::Equal,
            "",
        ))
        .expect("rule added");
    registry
        .add_rule(Rule::new(
            "not_rented",
            "Property is vacant",
            "currently_rented",
            RuleOperator::Equal,
            false,
        ))
        .expect("rule added");

    let zero_units = completed("app-9").with_answer("unit_count", 0);
    let blank_goals = completed("app-10").with_answer("management_goals", "");
    let vacant = completed("app-11").with_answer("currently_rented", false);

    assert_eq!(
        evaluate(&zero_units, &registry).disqualified_by_rule_id(),
        Some(&RuleId("no_units".to_string()))
    );
    assert_eq!(
        evaluate(&blank_goals, &registry).disqualified_by_rule_id(),
        Some(&RuleId("blank_goals".to_string()))
    );
    assert_eq!(
        evaluate(&vacant, &registry).disqualified_by_rule_id(),
        Some(&RuleId("not_rented".to_string()))
    );
}

#[test]
fn answers_shadow_attributes_with_the_same_name() {
    let registry = owner_registry();
    let record = strong_owner("app-12")
        .with_answer("distanceMinutesFromOffice", 10)
        .with_attribute("distanceMinutesFromOffice", 45);

    assert_eq!(
        evaluate(&record, &registry),
        Verdict::scored(FitBand::Perfect)
    );
}

#[test]
fn mixed_type_rule_operands_do_not_match() {
    let registry = owner_registry();
    let record = strong_owner("app-13").with_attribute("distanceMinutesFromOffice", "45");

    assert_eq!(
        evaluate(&record, &registry),
        Verdict::scored(FitBand::Perfect)
    );
}

#[test]
fn unanswered_questions_are_excluded_from_weighting() {
    let record = strong_owner("app-14");
    let registry = owner_registry();
    let mut with_extra = owner_registry();
    with_extra
        .add_question(Question::new(
            "years_owned",
            "How many years have you owned it?",
            QuestionKind::Number,
            5.0,
        ))
        .expect("question added");

    let engine = EvaluationEngine::default();
    let base = engine.score(&record, &registry);
    let extra = engine.score(&record, &with_extra);

    assert_eq!(base.verdict, extra.verdict);
    assert_eq!(base.fit_index, extra.fit_index);
    assert_eq!(base.total_weight, 1.5);
    assert_eq!(extra.total_weight, 1.5);
}

#[test]
fn unscoreable_answers_are_excluded_from_weighting() {
    let registry = owner_registry();
    let record = completed("app-15")
        .with_answer("currently_rented", true)
        .with_answer("unit_count", "twelve");

    let outcome = EvaluationEngine::default().score(&record, &registry);

    assert_eq!(outcome.total_weight, 1.0);
    assert_eq!(outcome.fit_index, Some(1.0));
    assert_eq!(outcome.components.len(), 1);
}

#[test]
fn text_and_select_answers_score_partial_credit() {
    let registry = owner_registry();

    let select_only = completed("app-16").with_answer("property_type", "Condo");
    let blank_text = completed("app-17").with_answer("management_goals", "   ");

    assert_eq!(
        evaluate(&select_only, &registry),
        Verdict::scored(FitBand::Great)
    );
    assert_eq!(evaluate(&blank_text, &registry), Verdict::scored(FitBand::Bad));
}

#[test]
fn records_without_scored_answers_fall_to_bad() {
    let registry = owner_registry();
    let outcome = EvaluationEngine::default().score(&completed("app-18"), &registry);

    assert_eq!(outcome.fit_index, Some(0.0));
    assert_eq!(outcome.verdict, Verdict::scored(FitBand::Bad));
}

#[test]
fn band_boundaries_are_inclusive_lower_bounds() {
    let registry =
        single_question_registry(Question::new("units", "Units", QuestionKind::Number, 1.0));
    let band_for = |units: f64| {
        evaluate(&completed("app-19").with_answer("units", units), &registry).band()
    };

    assert_eq!(band_for(8.5), Some(FitBand::Perfect));
    assert_eq!(band_for(8.4999), Some(FitBand::Great));
    assert_eq!(band_for(6.5), Some(FitBand::Great));
    assert_eq!(band_for(6.4999), Some(FitBand::Issues));
    assert_eq!(band_for(4.0), Some(FitBand::Issues));
    assert_eq!(band_for(3.9999), Some(FitBand::Bad));
}

#[test]
fn evaluation_is_idempotent_and_leaves_inputs_untouched() {
    let registry = owner_registry();
    let record = strong_owner("app-20").with_answer("property_type", "Condo");
    let record_before = record.clone();
    let rules_before = registry.list_rules();

    let first = evaluate(&record, &registry);
    let second = evaluate(&record, &registry);

    assert_eq!(first, second);
    assert_eq!(record, record_before);
    assert_eq!(registry.list_rules(), rules_before);
}

#[test]
fn detailed_score_agrees_with_verdict() {
    let registry = owner_registry();
    let engine = EvaluationEngine::default();
    let records = [
        strong_owner("app-21"),
        strong_owner("app-22").with_attribute("hoa_blocks_rentals", true),
        partial("app-23"),
        completed("app-24").with_answer("property_type", "Townhome"),
    ];

    for record in &records {
        let outcome = engine.score(record, &registry);
        assert_eq!(outcome.verdict, engine.verdict(record, &registry));
        assert_eq!(outcome.application_id, record.id);
    }

    let disqualified = engine.score(&records[1], &registry);
    assert!(disqualified.fit_index.is_none());
    assert!(disqualified.components.is_empty());

    let strong = engine.score(&records[0], &registry);
    assert_eq!(strong.components.len(), 2);
    assert!(strong
        .components
        .iter()
        .any(|component| component.question_id.0 == "unit_count"
            && component.score == 1.0
            && component.weighted_score == 0.5));
}

#[test]
fn engine_applies_configured_number_scale() {
    let registry =
        single_question_registry(Question::new("units", "Units", QuestionKind::Number, 1.0));
    let record = completed("app-25").with_answer("units", 12);
    let engine = EvaluationEngine::new(EvaluationConfig {
        number_scale: 20.0,
        ..EvaluationConfig::default()
    });

    assert_eq!(evaluate(&record, &registry).band(), Some(FitBand::Perfect));
    assert_eq!(engine.verdict(&record, &registry).band(), Some(FitBand::Issues));
}
