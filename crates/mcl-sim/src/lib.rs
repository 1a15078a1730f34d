//! Closed-loop simulation for the motor control lab.
//!
//! Provides:
//! - the [`System`] capability trait implemented by plants and wrappers
//! - a first-order DC motor speed plant with disturbance input
//! - a step load disturbance decorator with its own simulation clock
//! - the deterministic fixed-step experiment runner

pub mod dc_motor;
pub mod disturbance;
pub mod disturbed;
pub mod error;
pub mod experiment;
pub mod system;

pub use dc_motor::DcMotor;
pub use disturbance::StepDisturbanceConfig;
pub use disturbed::{DISTURBANCE_SIGNAL, DisturbedSystem};
pub use error::{SimError, SimResult};
pub use experiment::{Sample, StepConfig, StepRun, run_step};
pub use system::{Capabilities, Signals, System};
