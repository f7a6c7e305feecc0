//! Trending-Relay: GitHub Trending to Feishu
//!
//! This crate scrapes the GitHub Trending leaderboard, posts a summary card to a
//! Feishu chat webhook and upserts one Bitable row per repository.

pub mod config;
pub mod feishu;
pub mod pipeline;
pub mod trending;

use thiserror::Error;

/// Errors that abort a run before anything is delivered
///
/// Webhook and table failures never reach this type; the pipeline driver records
/// them in the run report as `DeliveryError` and `SyncError` outcomes.
#[derive(Debug, Error)]
pub enum TrendingError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] trending::FetchError),

    #[error("Extraction error: {0}")]
    Extract(#[from] trending::ExtractError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Trending-Relay operations
pub type Result<T> = std::result::Result<T, TrendingError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::{run_pipeline, RunReport, RunStatus};
pub use trending::{FetchRequest, Leaderboard, LeaderboardEntry, Period};
