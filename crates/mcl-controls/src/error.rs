//! Error types for control system operations.

use mcl_core::CoreError;
use thiserror::Error;

/// Result type for control system operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur while configuring controllers and modifiers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Numeric validation failure from the core helpers.
    #[error(transparent)]
    Core(#[from] CoreError),
}
