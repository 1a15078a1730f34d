//! Error types for plant construction.

use mcl_core::CoreError;
use thiserror::Error;

/// Errors raised while building simulated systems.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
