//! Error types shared by the art crates

use thiserror::Error;

/// Raised when a list of iterations does not form a valid lineage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineageError {
    #[error("Lineage is empty")]
    Empty,

    #[error("Iteration {index} is the seed but carries a modification strategy")]
    SeedHasStrategy { index: u32 },

    #[error("Iteration {index} has no modification strategy")]
    MissingStrategy { index: u32 },

    #[error("Iteration index {index} does not follow {previous}")]
    NonIncreasingIndex { previous: u32, index: u32 },

    #[error("Iteration {index} has a timestamp earlier than its predecessor")]
    TimestampRegression { index: u32 },
}

/// Raised when a strategy tag is not one of the eight known strategies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown modification strategy: {0}")]
pub struct UnknownStrategyError(pub String);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),
}
