use chrono::{DateTime, TimeZone, Utc};
use clap::Args;
use owner_fit::config::AppConfig;
use owner_fit::error::AppError;
use owner_fit::workflows::owner_applications::{
    band_label, evaluate, ApplicationRecord, ApplicationStatus, BoardQuery, Question,
    QuestionKind, Registry, RegistryError, Rule, RuleOperator, ScreeningService, SharedRegistry,
};

use crate::infra::{parse_band, BandFilter};
use crate::screen::{render_board, render_registry};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Only show these bands on the demo board; repeatable
    #[arg(long = "band", value_parser = parse_band)]
    pub(crate) bands: Vec<BandFilter>,
    /// Print the demo board as JSON
    #[arg(long)]
    pub(crate) json: bool,
    /// Skip the single-question reference checks
    #[arg(long)]
    pub(crate) skip_reference: bool,
}

pub(crate) fn run_demo(args: DemoArgs, config: &AppConfig) -> Result<(), AppError> {
    let DemoArgs {
        bands,
        json,
        skip_reference,
    } = args;

    let registry = demo_registry()?;
    let records = demo_records();

    if !json {
        println!("Owner application screening demo\n");
        render_registry(&registry);
        println!();
    }

    let service = ScreeningService::new(SharedRegistry::new(registry), config.scoring.clone());
    let query = BoardQuery::only(bands.into_iter().map(|filter| filter.0));
    let board = service.board(&records, &query);

    if json {
        println!("{}", serde_json::to_string_pretty(&board)?);
        return Ok(());
    }
    render_board(&board);

    if !skip_reference {
        println!("\nReference checks");
        for (name, outcome) in reference_checks()? {
            println!("- {name}: {outcome}");
        }
    }

    Ok(())
}

pub(crate) fn demo_registry() -> Result<Registry, RegistryError> {
    let mut registry = Registry::new();
    registry.add_question(Question::new(
        "currently_rented",
        "Is the property currently rented?",
        QuestionKind::Boolean,
        1.0,
    ))?;
    registry.add_question(Question::new(
        "unit_count",
        "How many units does the property have?",
        QuestionKind::Number,
        0.5,
    ))?;
    registry.add_question(Question::new(
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
    ))?;
    registry.add_question(Question::new(
        "management_goals",
        "What are you looking for in a property manager?",
        QuestionKind::Text,
        0.25,
    ))?;

    registry.add_rule(Rule::new(
        "too_far",
        "Property is more than 30 minutes from the office",
        "distanceMinutesFromOffice",
        RuleOperator::GreaterThan,
        30,
    ))?;
    registry.add_rule(Rule::new(
        "hoa_blocks_rentals",
        "HOA does not allow rentals",
        "hoa_blocks_rentals",
        RuleOperator::Equal,
        true,
    ))?;

    Ok(registry)
}

fn submitted(day: u32, hour: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2025, 10, day, hour, 0, 0).single()
}

fn completed(id: &str, day: u32, hour: u32) -> ApplicationRecord {
    let mut record = ApplicationRecord::new(id, ApplicationStatus::Completed);
    record.submitted_at = submitted(day, hour);
    record
}

pub(crate) fn demo_records() -> Vec<ApplicationRecord> {
    let mut unfinished = ApplicationRecord::new("app-1006", ApplicationStatus::Partial)
        .with_answer("currently_rented", true);
    unfinished.submitted_at = submitted(9, 8);

    vec![
        completed("app-1001", 6, 10)
            .with_answer("currently_rented", true)
            .with_answer("unit_count", 12)
            .with_answer("property_type", "Multi family")
            .with_answer("management_goals", "Hands-off leasing and maintenance")
            .with_attribute("distanceMinutesFromOffice", 12),
        completed("app-1002", 7, 14)
            .with_answer("currently_rented", true)
            .with_answer("unit_count", 4)
            .with_answer("property_type", "Condo")
            .with_attribute("distanceMinutesFromOffice", 20),
        completed("app-1003", 3, 9)
            .with_answer("currently_rented", false)
            .with_answer("unit_count", 10)
            .with_answer("property_type", "Townhome")
            .with_attribute("distanceMinutesFromOffice", 25),
        completed("app-1004", 8, 16)
            .with_answer("currently_rented", true)
            .with_answer("unit_count", 20)
            .with_attribute("distanceMinutesFromOffice", 45),
        completed("app-1005", 5, 11)
            .with_answer("currently_rented", true)
            .with_attribute("distanceMinutesFromOffice", 8)
            .with_attribute("hoa_blocks_rentals", true),
        unfinished,
    ]
}

/// Single-question checks that pin the scoring contract end to end.
pub(crate) fn reference_checks() -> Result<Vec<(&'static str, String)>, RegistryError> {
    let mut single = Registry::new();
    single.add_question(Question::new(
        "q1",
        "Owns the property outright",
        QuestionKind::Boolean,
        1.0,
    ))?;

    let mut distance = Registry::new();
    distance.add_rule(Rule::new(
        "too_far",
        "Property is more than 30 minutes from the office",
        "distanceMinutesFromOffice",
        RuleOperator::GreaterThan,
        30,
    ))?;

    let cases = [
        (
            "answered yes",
            ApplicationRecord::new("ref-1", ApplicationStatus::Completed).with_answer("q1", true),
            &single,
        ),
        (
            "answered no",
            ApplicationRecord::new("ref-2", ApplicationStatus::Completed).with_answer("q1", false),
            &single,
        ),
        (
            "45 minutes away",
            ApplicationRecord::new("ref-3", ApplicationStatus::Completed)
                .with_attribute("distanceMinutesFromOffice", 45),
            &distance,
        ),
        (
            "unfinished form",
            ApplicationRecord::new("ref-4", ApplicationStatus::Partial).with_answer("q1", true),
            &single,
        ),
    ];

    Ok(cases
        .into_iter()
        .map(|(name, record, registry)| {
            let verdict = evaluate(&record, registry);
            let outcome = match verdict.disqualified_by_rule_id() {
                Some(rule_id) => format!("{} (rule {})", band_label(verdict.band()), rule_id.0),
                None => band_label(verdict.band()).to_string(),
            };
            (name, outcome)
        })
        .collect())
}
