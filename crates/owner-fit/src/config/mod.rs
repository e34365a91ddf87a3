use std::env;
use std::fmt;
use std::num::ParseFloatError;

use crate::workflows::owner_applications::{
    BandThresholds, EvaluationConfig, DEFAULT_NUMBER_SCALE, DEFAULT_TEXT_ANSWER_SCORE,
};

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub scoring: EvaluationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = BandThresholds::default();
        let scoring = EvaluationConfig {
            number_scale: number_var("SCORING_NUMBER_SCALE", DEFAULT_NUMBER_SCALE)?,
            text_answer_score: number_var("SCORING_TEXT_ANSWER_SCORE", DEFAULT_TEXT_ANSWER_SCORE)?,
            thresholds: BandThresholds {
                perfect: number_var("SCORING_PERFECT_THRESHOLD", defaults.perfect)?,
                great: number_var("SCORING_GREAT_THRESHOLD", defaults.great)?,
                issues: number_var("SCORING_ISSUES_THRESHOLD", defaults.issues)?,
            },
        }
        .sanitized();

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            scoring,
        })
    }
}

fn number_var(var: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<f64>()
            .map_err(|source| ConfigError::InvalidNumber { var, source }),
        _ => Ok(default),
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber {
        var: &'static str,
        source: ParseFloatError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { var, .. } => write!(f, "{var} must be a number"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidNumber { source, .. } => Some(source),
        }
    }
}
