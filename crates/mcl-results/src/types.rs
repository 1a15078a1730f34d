//! Result data types.

use serde::{Deserialize, Serialize};

pub type RunId = String;

/// Contents of `metadata.json`; makes a run directory self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub run_id: RunId,
    pub created_at_utc: String,
    /// e.g. `"sim"`.
    pub kind: String,
    pub plant: String,
    pub experiment: String,
    /// Experiment parameters (gains, timing, target, ...).
    pub params: serde_json::Value,
    pub environment: Environment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub mcl_version: String,
    pub commit: String,
    pub os: String,
    pub arch: String,
}

impl Environment {
    /// Environment of the running binary. `commit` comes from
    /// `MCL_GIT_COMMIT` at compile time, `"none"` if unset.
    pub fn current() -> Self {
        Self {
            mcl_version: env!("CARGO_PKG_VERSION").to_string(),
            commit: option_env!("MCL_GIT_COMMIT").unwrap_or("none").to_string(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }
}
