//! Control law and actuator-command shaping for the motor control lab.
//!
//! The crate provides two pieces that sit between a measurement and the
//! plant input:
//! - a PID controller with predictive anti-windup and a per-step [`PidTrace`]
//! - stateless command [`Modifier`]s (deadzone) composable into a [`ModifierChain`]
//!
//! Controller configuration is immutable; all mutable state lives in
//! [`PidControllerState`], either threaded through [`PidController::update`]
//! or owned by the stateful [`Pid`] wrapper.

pub mod controller;
pub mod error;
pub mod modifier;

pub use controller::{DEFAULT_OUTPUT_LIMIT, Pid, PidController, PidControllerState, PidTrace};
pub use error::{ControlError, ControlResult};
pub use modifier::{Deadzone, Modifier, ModifierChain};
