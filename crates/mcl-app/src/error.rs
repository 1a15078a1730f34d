//! Error types for the mcl-app service layer.

use std::path::PathBuf;

/// Application error type wrapping the backend crates' errors behind one
/// interface for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Controller error: {0}")]
    Control(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("No samples produced (dt = {dt}, duration = {duration})")]
    NoSamples { dt: f64, duration: f64 },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for mcl-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<mcl_controls::ControlError> for AppError {
    fn from(err: mcl_controls::ControlError) -> Self {
        AppError::Control(err.to_string())
    }
}

impl From<mcl_sim::SimError> for AppError {
    fn from(err: mcl_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<mcl_results::ResultsError> for AppError {
    fn from(err: mcl_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}
