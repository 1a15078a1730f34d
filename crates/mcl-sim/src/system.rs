//! The closed-loop system interface and its optional capabilities.

use std::collections::BTreeMap;

/// Supplementary named signals, keyed by stable snake_case identifiers.
///
/// Ordered so that iteration (and anything serialized from it) is deterministic.
pub type Signals = BTreeMap<String, f64>;

/// Optional capabilities a [`System`] advertises.
///
/// Callers resolve these once (at construction or before a run) instead of
/// probing the system on every step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// [`System::set_disturbance`] affects the dynamics.
    pub accepts_disturbance: bool,
    /// [`System::disturbance`] reports a meaningful value.
    pub reports_disturbance: bool,
    /// [`System::signals`] reports supplementary signals.
    pub reports_signals: bool,
}

/// Minimal closed-loop interface for simulation experiments.
///
/// `observe` returns the current measurement (e.g. velocity in RPM),
/// `actuate` applies the command (e.g. volts) for the next step and
/// `step` advances the system by `dt` seconds.
pub trait System {
    fn observe(&self) -> f64;

    fn actuate(&mut self, u: f64);

    fn step(&mut self, dt: f64);

    /// Capabilities beyond observe/actuate/step. Default: none.
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// Set an external load disturbance (RPM/s), consumed by the next `step`.
    ///
    /// Default implementation ignores the value.
    fn set_disturbance(&mut self, _rpm_per_s: f64) {}

    /// Disturbance currently set or last applied (RPM/s). Default: `0`.
    fn disturbance(&self) -> f64 {
        0.0
    }

    /// Snapshot of supplementary signals. The returned map is owned by the
    /// caller. Default: empty.
    fn signals(&self) -> Signals {
        Signals::new()
    }
}

impl<S: System + ?Sized> System for Box<S> {
    fn observe(&self) -> f64 {
        (**self).observe()
    }

    fn actuate(&mut self, u: f64) {
        (**self).actuate(u)
    }

    fn step(&mut self, dt: f64) {
        (**self).step(dt)
    }

    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }

    fn set_disturbance(&mut self, rpm_per_s: f64) {
        (**self).set_disturbance(rpm_per_s)
    }

    fn disturbance(&self) -> f64 {
        (**self).disturbance()
    }

    fn signals(&self) -> Signals {
        (**self).signals()
    }
}
