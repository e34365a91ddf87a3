mod cli;
mod demo;
mod infra;
mod screen;

use owner_fit::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
