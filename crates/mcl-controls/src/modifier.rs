//! Actuator nonlinearities applied to a controller command before actuation.
//!
//! Modifiers are pure `f64 -> f64` maps. A [`ModifierChain`] applies its
//! members in order; an empty chain is the identity.

use crate::error::{ControlError, ControlResult};
use mcl_core::ensure_finite;
use std::fmt::Debug;

/// A stateless transform of an actuation command.
pub trait Modifier: Debug {
    fn modify(&self, u: f64) -> f64;
}

/// Symmetric deadzone: `sign(u) * max(0, |u| - threshold)`.
///
/// Commands with `|u| < threshold` collapse to zero; larger commands are
/// shifted toward zero by `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deadzone {
    threshold: f64,
}

impl Deadzone {
    /// # Errors
    ///
    /// Returns an error if `threshold` is negative or non-finite.
    pub fn new(threshold: f64) -> ControlResult<Self> {
        ensure_finite(threshold, "deadzone threshold")?;
        if threshold < 0.0 {
            return Err(ControlError::InvalidArg {
                what: "deadzone threshold must be non-negative",
            });
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Modifier for Deadzone {
    fn modify(&self, u: f64) -> f64 {
        let abs_u = u.abs();
        if abs_u < self.threshold {
            return 0.0;
        }
        u.signum() * (abs_u - self.threshold)
    }
}

/// Ordered composition of modifiers.
#[derive(Debug, Default)]
pub struct ModifierChain {
    modifiers: Vec<Box<dyn Modifier>>,
}

impl ModifierChain {
    /// An empty (identity) chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a modifier; it runs after the ones already in the chain.
    pub fn with(mut self, modifier: impl Modifier + 'static) -> Self {
        self.modifiers.push(Box::new(modifier));
        self
    }

    pub fn push(&mut self, modifier: Box<dyn Modifier>) {
        self.modifiers.push(modifier);
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }
}

impl FromIterator<Box<dyn Modifier>> for ModifierChain {
    fn from_iter<I: IntoIterator<Item = Box<dyn Modifier>>>(iter: I) -> Self {
        Self {
            modifiers: iter.into_iter().collect(),
        }
    }
}

impl Modifier for ModifierChain {
    fn modify(&self, u: f64) -> f64 {
        self.modifiers.iter().fold(u, |acc, m| m.modify(acc))
    }
}
