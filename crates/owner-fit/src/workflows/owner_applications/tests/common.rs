use chrono::{DateTime, TimeZone, Utc};

use crate::workflows::owner_applications::domain::{
    ApplicationRecord, ApplicationStatus, Question, QuestionKind, Rule, RuleOperator,
};
use crate::workflows::owner_applications::registry::{Registry, SharedRegistry};
use crate::workflows::owner_applications::{EvaluationConfig, ScreeningService};

pub(super) fn currently_rented() -> Question {
    Question::new(
        "currently_rented",
        "Is the property currently rented?",
        QuestionKind::Boolean,
        1.0,
    )
}

pub(super) fn unit_count() -> Question {
    Question::new(
        "unit_count",
        "How many units does the property have?",
        QuestionKind::Number,
        0.5,
    )
}

pub(super) fn property_type() -> Question {
    Question::new(
        "property_type",
        "What type of property is it?",
        QuestionKind::Select {
            options: vec![
                "Single family".to_string(),
                "Multi family".to_string(),
                "Condo".to_string(),
                "Townhome".to_string(),
            ],
        },
        0.75,
    )
}

pub(super) fn management_goals() -> Question {
    Question::new(
        "management_goals",
        "What are you looking for in a property manager?",
        QuestionKind::Text,
        0.25,
    )
}

pub(super) fn too_far_rule() -> Rule {
    Rule::new(
        "too_far",
        "Property is more than 30 minutes from the office",
        "distanceMinutesFromOffice",
        RuleOperator::GreaterThan,
        30,
    )
}

pub(super) fn hoa_blocks_rentals_rule() -> Rule {
    Rule::new(
        "hoa_blocks_rentals",
        "HOA does not allow rentals",
        "hoa_blocks_rentals",
        RuleOperator::Equal,
        true,
    )
}

pub(super) fn owner_registry() -> Registry {
    let mut registry = Registry::new();
    for question in [
        currently_rented(),
        unit_count(),
        property_type(),
        management_goals(),
    ] {
        registry.add_question(question).expect("question added");
    }
    registry.add_rule(too_far_rule()).expect("rule added");
    registry
        .add_rule(hoa_blocks_rentals_rule())
        .expect("rule added");
    registry
}

pub(super) fn single_question_registry(question: Question) -> Registry {
    let mut registry = Registry::new();
    registry.add_question(question).expect("question added");
    registry
}

pub(super) fn completed(id: &str) -> ApplicationRecord {
    ApplicationRecord::new(id, ApplicationStatus::Completed)
}

pub(super) fn partial(id: &str) -> ApplicationRecord {
    ApplicationRecord::new(id, ApplicationStatus::Partial)
}

/// Nearby, rented, multi-unit owner: lands in the top band.
pub(super) fn strong_owner(id: &str) -> ApplicationRecord {
    completed(id)
        .with_answer("currently_rented", true)
        .with_answer("unit_count", 12)
        .with_attribute("distanceMinutesFromOffice", 12)
}

pub(super) fn october(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, day, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn build_service() -> ScreeningService {
    ScreeningService::new(
        SharedRegistry::new(owner_registry()),
        EvaluationConfig::default(),
    )
}
