//! Fixed-step closed-loop step-response experiment.

use crate::system::{Signals, System};
use mcl_controls::{Modifier, ModifierChain, Pid};
use mcl_core::Stopwatch;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A constant-setpoint step experiment.
#[derive(Debug, Default)]
pub struct StepConfig {
    /// Setpoint (RPM).
    pub target_rpm: f64,
    /// Fixed step size (seconds).
    pub dt: f64,
    /// Run length (seconds). The loop runs `floor(duration / dt)` steps.
    pub duration: f64,
    /// Actuator nonlinearities applied to the controller output.
    pub modifier: Option<ModifierChain>,
}

impl StepConfig {
    pub fn new(target_rpm: f64, dt: f64, duration: f64) -> Self {
        Self {
            target_rpm,
            dt,
            duration,
            modifier: None,
        }
    }

    pub fn with_modifier(mut self, modifier: ModifierChain) -> Self {
        self.modifier = Some(modifier);
        self
    }

    /// Number of steps the runner executes; `0` for non-positive or
    /// non-finite timing.
    pub fn step_count(&self) -> usize {
        if !(self.dt > 0.0 && self.duration > 0.0) {
            return 0;
        }
        let steps = (self.duration / self.dt).floor();
        if !steps.is_finite() {
            return 0;
        }
        steps as usize
    }
}

/// One recorded time step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Step start time (seconds).
    pub t: f64,
    pub dt: f64,

    pub target: f64,
    /// Measurement read at the start of the step.
    pub actual: f64,
    pub error: f64,

    /// Actuation command after modifiers.
    pub u: f64,

    pub p: f64,
    pub i: f64,
    pub d: f64,

    pub out_raw: f64,
    pub saturated: bool,
    pub integrated: bool,

    /// Supplementary signals reported by the system; `None` when it reports none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signals: Option<Signals>,
}

/// Output of [`run_step`].
#[derive(Debug, Clone)]
pub struct StepRun {
    pub samples: Vec<Sample>,
    /// Wall-clock cost of the loop; informational only.
    pub wall_time: Duration,
}

/// Upper bound on the up-front sample allocation; longer runs grow the vector.
const MAX_PREALLOCATED_SAMPLES: usize = 1 << 20;

/// Execute the closed loop and return the full time series.
///
/// Per step: observe, controller, modifiers, actuate, step, record. Returns an
/// empty series when `dt` or `duration` is non-positive or non-finite.
pub fn run_step<S: System + ?Sized>(system: &mut S, pid: &mut Pid, cfg: &StepConfig) -> StepRun {
    let stopwatch = Stopwatch::start("run_step");

    let steps = cfg.step_count();
    if steps == 0 {
        tracing::debug!(dt = cfg.dt, duration = cfg.duration, "no steps to run");
        return StepRun {
            samples: Vec::new(),
            wall_time: stopwatch.stop(),
        };
    }

    let reports_signals = system.capabilities().reports_signals;
    tracing::debug!(steps, dt = cfg.dt, target = cfg.target_rpm, "step experiment start");

    let mut samples = Vec::with_capacity(steps.min(MAX_PREALLOCATED_SAMPLES));
    for i in 0..steps {
        let t = i as f64 * cfg.dt;

        let actual = system.observe();
        let tr = pid.step(cfg.target_rpm, actual, cfg.dt);

        let u = match &cfg.modifier {
            Some(chain) => chain.modify(tr.out),
            None => tr.out,
        };

        system.actuate(u);
        system.step(cfg.dt);

        let signals = if reports_signals {
            Some(system.signals()).filter(|s| !s.is_empty())
        } else {
            None
        };

        samples.push(Sample {
            t,
            dt: cfg.dt,
            target: tr.target,
            actual: tr.actual,
            error: tr.error,
            u,
            p: tr.p,
            i: tr.i,
            d: tr.d,
            out_raw: tr.out_raw,
            saturated: tr.saturated,
            integrated: tr.integrated,
            signals,
        });
    }

    let wall_time = stopwatch.stop();
    tracing::debug!(samples = samples.len(), ?wall_time, "step experiment done");

    StepRun { samples, wall_time }
}
