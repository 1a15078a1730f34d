//! PID controller with output clamping and predictive anti-windup.
//!
//! Anti-windup strategy: before touching the integrator, predict the output
//! from the current (pre-update) integral. If that prediction is already
//! saturated in the same direction as the error, the integrator is frozen
//! for this step.
//!
//! The derivative acts on the error and is zero on the first step after
//! construction or reset (no derivative kick).

use crate::error::{ControlError, ControlResult};
use mcl_core::ensure_finite;
use serde::{Deserialize, Serialize};

/// Default symmetric output limit (volts).
pub const DEFAULT_OUTPUT_LIMIT: f64 = 24.0;

/// PID controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PidController {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain.
    pub ki: f64,
    /// Derivative gain.
    pub kd: f64,
    /// Minimum output value.
    pub out_min: f64,
    /// Maximum output value.
    pub out_max: f64,
}

impl PidController {
    /// Create a PID controller with the default `±24` output limits.
    pub fn new(kp: f64, ki: f64, kd: f64) -> ControlResult<Self> {
        Self::with_limits(kp, ki, kd, -DEFAULT_OUTPUT_LIMIT, DEFAULT_OUTPUT_LIMIT)
    }

    /// Create a PID controller with explicit output limits.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is non-finite or `out_min >= out_max`.
    pub fn with_limits(
        kp: f64,
        ki: f64,
        kd: f64,
        out_min: f64,
        out_max: f64,
    ) -> ControlResult<Self> {
        ensure_finite(kp, "kp")?;
        ensure_finite(ki, "ki")?;
        ensure_finite(kd, "kd")?;
        ensure_finite(out_min, "out_min")?;
        ensure_finite(out_max, "out_max")?;
        if out_min >= out_max {
            return Err(ControlError::InvalidArg {
                what: "out_min must be less than out_max",
            });
        }
        Ok(Self {
            kp,
            ki,
            kd,
            out_min,
            out_max,
        })
    }

    /// Compute the controller output for one step.
    ///
    /// Returns the successor state and the trace; the command is `trace.out`.
    /// For `dt <= 0` the state is returned unchanged and the command is `0`.
    pub fn update(
        &self,
        state: &PidControllerState,
        target: f64,
        actual: f64,
        dt: f64,
    ) -> (PidControllerState, PidTrace) {
        let error = target - actual;
        if dt <= 0.0 {
            return (state.clone(), PidTrace::idle(target, actual, error));
        }

        let p_term = self.kp * error;

        let d_term = match state.prev_error {
            Some(prev) => self.kd * (error - prev) / dt,
            None => 0.0,
        };

        // Predict saturation using the current integrator state.
        let predicted = p_term + d_term + self.ki * state.integral;
        let sat_high = predicted >= self.out_max;
        let sat_low = predicted <= self.out_min;

        let integrated = !((sat_high && error > 0.0) || (sat_low && error < 0.0));
        let integral = if integrated {
            state.integral + error * dt
        } else {
            state.integral
        };

        let i_term = self.ki * integral;

        let out_raw = p_term + i_term + d_term;
        let out = out_raw.clamp(self.out_min, self.out_max);

        let trace = PidTrace {
            target,
            actual,
            error,
            p: p_term,
            i: i_term,
            d: d_term,
            out_raw,
            out,
            saturated: out != out_raw,
            integrated,
        };

        let next = PidControllerState {
            integral,
            prev_error: Some(error),
        };

        (next, trace)
    }
}

/// PID controller state.
///
/// `prev_error == None` is the cold state: the next step produces no
/// derivative contribution.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PidControllerState {
    /// Integral accumulator (error * seconds).
    pub integral: f64,
    /// Error seen on the previous step.
    pub prev_error: Option<f64>,
}

impl PidControllerState {
    /// Whether a previous error has been recorded.
    pub fn is_warm(&self) -> bool {
        self.prev_error.is_some()
    }
}

/// Term breakdown of one controller step, in output units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidTrace {
    pub target: f64,
    pub actual: f64,
    pub error: f64,

    pub p: f64,
    pub i: f64,
    pub d: f64,

    /// Sum before clamping.
    pub out_raw: f64,
    /// Clamped output.
    pub out: f64,
    pub saturated: bool,
    /// Whether the integrator was updated this step.
    pub integrated: bool,
}

impl PidTrace {
    fn idle(target: f64, actual: f64, error: f64) -> Self {
        Self {
            target,
            actual,
            error,
            ..Self::default()
        }
    }
}

/// Stateful PID: a [`PidController`] together with the state it advances.
#[derive(Debug, Clone, PartialEq)]
pub struct Pid {
    config: PidController,
    state: PidControllerState,
}

impl Pid {
    /// Create a cold controller.
    pub fn new(config: PidController) -> Self {
        Self {
            config,
            state: PidControllerState::default(),
        }
    }

    /// Advance one step and return the trace. The command is `trace.out`.
    pub fn step(&mut self, target: f64, actual: f64, dt: f64) -> PidTrace {
        let (next, trace) = self.config.update(&self.state, target, actual, dt);
        self.state = next;
        trace
    }

    /// Clear the integrator and return to the cold state.
    pub fn reset(&mut self) {
        self.state = PidControllerState::default();
    }

    pub fn config(&self) -> &PidController {
        &self.config
    }

    pub fn state(&self) -> &PidControllerState {
        &self.state
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn cold_step_has_no_derivative(
            kp in -50.0_f64..50.0,
            ki in -50.0_f64..50.0,
            kd in -50.0_f64..50.0,
            target in -2000.0_f64..2000.0,
            actual in -2000.0_f64..2000.0,
            dt in 1e-4_f64..1.0,
        ) {
            let config = PidController::new(kp, ki, kd).unwrap();
            let (next, tr) = config.update(&PidControllerState::default(), target, actual, dt);
            prop_assert_eq!(tr.d, 0.0);
            prop_assert!(next.is_warm());
            prop_assert!(tr.out >= config.out_min && tr.out <= config.out_max);
        }

        #[test]
        fn cold_step_without_integral_gain_is_clamped_p(
            kp in -500.0_f64..500.0,
            kd in -50.0_f64..50.0,
            target in -2000.0_f64..2000.0,
            actual in -2000.0_f64..2000.0,
            dt in 1e-4_f64..1.0,
        ) {
            let config = PidController::new(kp, 0.0, kd).unwrap();
            let (_, tr) = config.update(&PidControllerState::default(), target, actual, dt);
            prop_assert_eq!(tr.out, tr.p.clamp(config.out_min, config.out_max));
        }
    }
}
