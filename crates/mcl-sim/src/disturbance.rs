//! Step load disturbance schedule.

use serde::{Deserialize, Serialize};

/// A step load disturbance: `magnitude_rpm_per_s` applied from `start_s`
/// for `duration_s` seconds (`duration_s <= 0` means until the end of the run).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StepDisturbanceConfig {
    pub enabled: bool,
    pub start_s: f64,
    /// `0` means unbounded.
    pub duration_s: f64,
    pub magnitude_rpm_per_s: f64,
}

impl StepDisturbanceConfig {
    /// Disturbance magnitude at simulation time `t` (seconds).
    ///
    /// Zero when disabled, when the magnitude is zero, before `start_s`, or at
    /// or after `start_s + duration_s` for a bounded window.
    pub fn evaluate(&self, t: f64) -> f64 {
        if !self.enabled || self.magnitude_rpm_per_s == 0.0 {
            return 0.0;
        }
        if t < self.start_s {
            return 0.0;
        }
        if self.duration_s > 0.0 && t >= self.start_s + self.duration_s {
            return 0.0;
        }
        self.magnitude_rpm_per_s
    }
}
