//! mcl-results: run directories and experiment artifacts.

pub mod hash;
pub mod json;
#[cfg(feature = "plots")]
pub mod plots;
pub mod run_dir;
pub mod samples_csv;
pub mod types;

pub use hash::{params_hash, short_hash};
pub use json::write_json;
pub use run_dir::RunDir;
pub use samples_csv::{BASE_COLUMNS, write_samples_csv};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Plot error: {0}")]
    Plot(String),
}
