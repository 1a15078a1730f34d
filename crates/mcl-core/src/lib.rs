//! mcl-core: shared foundation for the motor control lab.
//!
//! Contains:
//! - numeric (finite/positive parameter checks)
//! - timing (wall-clock stopwatch, informational only)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod timing;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use timing::Stopwatch;
