//! Application service layer for the motor control lab.
//!
//! Turns an [`ExperimentConfig`] into a simulated step experiment, reduces it
//! to [`Metrics`] and persists the run directory. The CLI is a thin shell
//! over this crate.

pub mod buildinfo;
pub mod config;
pub mod error;
pub mod metrics;
pub mod run_service;

// Re-export key types for convenience
pub use buildinfo::{BuildInfo, build_info};
pub use config::{
    ActuatorConfig, AnalysisConfig, ControllerConfig, DisturbanceConfig, ExperimentConfig,
    PlantConfig, TimingConfig,
};
pub use error::{AppError, AppResult};
pub use metrics::{Metrics, compute as compute_metrics};
pub use run_service::{RunSummary, Simulation, run_sim_step, simulate};
