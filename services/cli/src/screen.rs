use std::path::PathBuf;

use clap::Args;
use owner_fit::config::AppConfig;
use owner_fit::error::AppError;
use owner_fit::workflows::owner_applications::{
    band_counts, BoardQuery, Question, Registry, Rule, ScreeningService, ScreeningView,
    SharedRegistry,
};

use crate::infra::{load_records, load_registry, parse_band, BandFilter};

#[derive(Args, Debug)]
pub(crate) struct ScreenArgs {
    /// Registry definition (JSON with `questions` and `rules`)
    #[arg(long)]
    pub(crate) registry: PathBuf,
    /// Application records: a form export CSV or a JSON array
    #[arg(long)]
    pub(crate) records: PathBuf,
    /// Only show these bands (perfect, great, issues, bad, not-evaluated); repeatable
    #[arg(long = "band", value_parser = parse_band)]
    pub(crate) bands: Vec<BandFilter>,
    /// Print screening views as JSON instead of the board
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RegistryArgs {
    /// Registry definition (JSON with `questions` and `rules`)
    #[arg(long)]
    pub(crate) registry: PathBuf,
}

pub(crate) fn run_screen(args: ScreenArgs, config: &AppConfig) -> Result<(), AppError> {
    let ScreenArgs {
        registry,
        records,
        bands,
        json,
    } = args;

    let registry = load_registry(&registry)?;
    let records = load_records(&records, &registry)?;
    let service = ScreeningService::new(SharedRegistry::new(registry), config.scoring.clone());
    let query = BoardQuery::only(bands.into_iter().map(|filter| filter.0));
    let board = service.board(&records, &query);

    if json {
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else {
        render_board(&board);
    }
    Ok(())
}

pub(crate) fn run_registry(args: RegistryArgs) -> Result<(), AppError> {
    let registry = load_registry(&args.registry)?;
    render_registry(&registry);
    Ok(())
}

pub(crate) fn render_board(board: &[ScreeningView]) {
    println!("Applications board ({} shown)", board.len());

    for entry in band_counts(board) {
        println!("- {}: {}", entry.label, entry.count);
    }

    if board.is_empty() {
        return;
    }

    println!();
    for view in board {
        println!("{}", board_line(view));
    }
}

pub(crate) fn board_line(view: &ScreeningView) -> String {
    let mut line = format!(
        "[{}] {} ({})",
        view.band_label, view.application_id.0, view.status
    );

    if let Some(fit_index) = view.fit_index {
        line.push_str(&format!(" fit {:.2}", fit_index));
    }
    if let Some(rule_id) = &view.disqualified_by_rule_id {
        line.push_str(&format!(" disqualified by {}", rule_id.0));
    }
    if let Some(at) = view.submitted_at {
        line.push_str(&format!(" submitted {}", at.format("%Y-%m-%d")));
    }
    line
}

pub(crate) fn render_registry(registry: &Registry) {
    println!("Questions ({})", registry.question_count());
    for (position, question) in registry.questions().enumerate() {
        println!("{}. {}", position + 1, question_line(question));
    }

    println!("\nDisqualifying rules ({}), first match wins", registry.rule_count());
    for (position, rule) in registry.rules().enumerate() {
        println!("{}. {}", position + 1, rule_line(rule));
    }
}

fn question_line(question: &Question) -> String {
    let mut line = format!(
        "{} [{}] weight {}: {}",
        question.id.0,
        question.kind.label(),
        question.weight,
        question.label
    );
    let options = question.kind.options();
    if !options.is_empty() {
        line.push_str(&format!(" (options: {})", options.join(", ")));
    }
    line
}

fn rule_line(rule: &Rule) -> String {
    format!("{}: {}", rule.id.0, rule.describe())
}
