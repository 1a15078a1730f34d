//! Load disturbance injection around an arbitrary [`System`].

use crate::disturbance::StepDisturbanceConfig;
use crate::system::{Capabilities, Signals, System};

/// Signal key under which [`DisturbedSystem`] reports the applied disturbance.
pub const DISTURBANCE_SIGNAL: &str = "disturbance_rpm_per_s";

/// Wraps a system and applies a scheduled step load disturbance.
///
/// `observe` and `actuate` delegate unchanged. `step(dt)` evaluates the
/// schedule at the end of the step interval (`t + dt`), records the value,
/// pushes it into the inner system if that system accepts disturbances,
/// steps the inner system and then advances the wrapper's own clock.
///
/// Because the schedule is sampled at `t + dt`, a disturbance starting at
/// `start_s` is already active during the step that lands on `start_s`.
#[derive(Debug, Clone)]
pub struct DisturbedSystem<S> {
    inner: S,
    cfg: StepDisturbanceConfig,
    inner_accepts_disturbance: bool,

    // Internal simulation time (seconds)
    t: f64,
    last_disturbance_rpm_per_s: f64,
}

impl<S: System> DisturbedSystem<S> {
    pub fn new(inner: S, cfg: StepDisturbanceConfig) -> Self {
        let inner_accepts_disturbance = inner.capabilities().accepts_disturbance;
        Self {
            inner,
            cfg,
            inner_accepts_disturbance,
            t: 0.0,
            last_disturbance_rpm_per_s: 0.0,
        }
    }

    /// Zero the internal clock and the last reported disturbance so the
    /// wrapper can drive another experiment.
    pub fn reset_time(&mut self) {
        self.t = 0.0;
        self.last_disturbance_rpm_per_s = 0.0;
    }

    /// Internal simulation time (seconds).
    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn config(&self) -> &StepDisturbanceConfig {
        &self.cfg
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: System> System for DisturbedSystem<S> {
    fn observe(&self) -> f64 {
        self.inner.observe()
    }

    fn actuate(&mut self, u: f64) {
        self.inner.actuate(u)
    }

    fn step(&mut self, dt: f64) {
        let dist = self.cfg.evaluate(self.t + dt);
        self.last_disturbance_rpm_per_s = dist;

        if self.inner_accepts_disturbance {
            self.inner.set_disturbance(dist);
        }

        self.inner.step(dt);
        self.t += dt;
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            accepts_disturbance: false,
            reports_disturbance: true,
            reports_signals: true,
        }
    }

    fn disturbance(&self) -> f64 {
        self.last_disturbance_rpm_per_s
    }

    fn signals(&self) -> Signals {
        Signals::from([(
            DISTURBANCE_SIGNAL.to_string(),
            self.last_disturbance_rpm_per_s,
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dc_motor::DcMotor;

    const EPS: f64 = 1e-9;

    #[derive(Debug, Default)]
    struct Mock {
        observed: f64,
        actuated: f64,
        steps: usize,
    }

    impl System for Mock {
        fn observe(&self) -> f64 {
            self.observed
        }
        fn actuate(&mut self, u: f64) {
            self.actuated = u;
        }
        fn step(&mut self, _dt: f64) {
            self.steps += 1;
        }
    }

    #[derive(Debug, Default)]
    struct Receiver {
        mock: Mock,
        disturbance: f64,
    }

    impl System for Receiver {
        fn observe(&self) -> f64 {
            self.mock.observe()
        }
        fn actuate(&mut self, u: f64) {
            self.mock.actuate(u)
        }
        fn step(&mut self, dt: f64) {
            self.mock.step(dt)
        }
        fn capabilities(&self) -> Capabilities {
            Capabilities {
                accepts_disturbance: true,
                ..Capabilities::default()
            }
        }
        fn set_disturbance(&mut self, rpm_per_s: f64) {
            self.disturbance = rpm_per_s;
        }
    }

    fn schedule() -> StepDisturbanceConfig {
        StepDisturbanceConfig {
            enabled: true,
            start_s: 0.5,
            duration_s: 2.0,
            magnitude_rpm_per_s: 10.0,
        }
    }

    #[test]
    fn delegates_observe_actuate_step() {
        let mock = Mock {
            observed: 100.0,
            ..Mock::default()
        };
        let mut sys = DisturbedSystem::new(mock, StepDisturbanceConfig::default());
        assert_eq!(sys.observe(), 100.0);
        sys.actuate(5.0);
        assert_eq!(sys.inner().actuated, 5.0);
        sys.step(0.001);
        assert_eq!(sys.inner().steps, 1);
    }

    #[test]
    fn injects_scheduled_disturbance() {
        let mut sys = DisturbedSystem::new(Receiver::default(), schedule());

        // Lands on t = 0.25: before the window.
        sys.step(0.25);
        assert_eq!(sys.inner().disturbance, 0.0);

        // Lands on t = 0.5: active.
        sys.step(0.25);
        assert_eq!(sys.inner().disturbance, 10.0);
        assert_eq!(sys.disturbance(), 10.0);

        // Lands on t = 2.5: window closed.
        sys.step(2.0);
        assert_eq!(sys.inner().disturbance, 0.0);
        assert!((sys.time() - 2.5).abs() < EPS);
    }

    #[test]
    fn records_disturbance_even_if_inner_ignores_it() {
        let mut sys = DisturbedSystem::new(Mock::default(), schedule());
        sys.step(1.0);
        assert_eq!(sys.disturbance(), 10.0);
        assert_eq!(sys.signals().get(DISTURBANCE_SIGNAL), Some(&10.0));
    }

    #[test]
    fn signal_reporter() {
        let mut sys = DisturbedSystem::new(Receiver::default(), schedule());
        assert!(sys.capabilities().reports_signals);
        assert_eq!(sys.signals().get(DISTURBANCE_SIGNAL), Some(&0.0));

        sys.step(0.6);
        let mut signals = sys.signals();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[DISTURBANCE_SIGNAL], 10.0);

        // Snapshot is independent of the wrapper.
        signals.insert(DISTURBANCE_SIGNAL.to_string(), -1.0);
        assert_eq!(sys.signals()[DISTURBANCE_SIGNAL], 10.0);
    }

    #[test]
    fn reset_time() {
        let mut sys = DisturbedSystem::new(Receiver::default(), schedule());
        sys.step(1.0);
        assert_eq!(sys.disturbance(), 10.0);

        sys.reset_time();
        assert_eq!(sys.time(), 0.0);
        assert_eq!(sys.disturbance(), 0.0);

        sys.step(0.1);
        assert_eq!(sys.disturbance(), 0.0);
    }

    #[test]
    fn with_dc_motor() {
        let cfg = StepDisturbanceConfig {
            enabled: true,
            start_s: 0.0,
            duration_s: 0.0,
            magnitude_rpm_per_s: 50.0,
        };
        let mut sys = DisturbedSystem::new(DcMotor::default(), cfg);
        sys.actuate(10.0);
        sys.step(0.001);
        assert!((sys.observe() - 1.95).abs() < EPS);
        assert_eq!(sys.inner().disturbance(), 50.0);

        for _ in 1..10_000 {
            sys.step(0.001);
        }
        assert!((sys.observe() - 975.0).abs() < 0.1);
    }

    #[test]
    fn schedule_sampled_at_end_of_interval() {
        let cfg = StepDisturbanceConfig {
            enabled: true,
            start_s: 0.75,
            duration_s: 0.0,
            magnitude_rpm_per_s: 1.0,
        };
        let mut sys = DisturbedSystem::new(Mock::default(), cfg);
        let mut seen = Vec::new();
        for _ in 0..4 {
            sys.step(0.25);
            seen.push(sys.disturbance());
        }
        // The step starting at t = 0.5 lands on 0.75 and already carries it.
        assert_eq!(seen, vec![0.0, 0.0, 1.0, 1.0]);
    }
}
