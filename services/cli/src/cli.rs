use crate::demo::{run_demo, DemoArgs};
use crate::screen::{run_registry, run_screen, RegistryArgs, ScreenArgs};
use clap::{Parser, Subcommand};
use owner_fit::config::AppConfig;
use owner_fit::error::AppError;
use owner_fit::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "owner-fit",
    about = "Score and disqualify property-owner applications against a question and rule registry",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Screen application records and print the applications board
    Screen(ScreenArgs),
    /// Validate a registry definition and list its entries in evaluation order
    Registry(RegistryArgs),
    /// Screen built-in sample applications against a built-in registry (default command)
    Demo(DemoArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, scoring = ?config.scoring, "configuration loaded");

    match command {
        Command::Screen(args) => run_screen(args, &config),
        Command::Registry(args) => run_registry(args),
        Command::Demo(args) => run_demo(args, &config),
    }
}
