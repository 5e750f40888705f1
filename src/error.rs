//! Configuration errors
//!
//! The simulation itself never fails; only loading tuning or level data can.

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level {index} is invalid: {reason}")]
    InvalidLevel { index: usize, reason: String },
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
}
