//! First-order DC motor speed plant.

use crate::error::SimResult;
use crate::system::{Capabilities, System};
use mcl_core::{ensure_finite, ensure_positive};
use serde::{Deserialize, Serialize};

/// Default steady-state gain (RPM/V).
pub const DEFAULT_GAIN_RPM_PER_VOLT: f64 = 100.0;
/// Default mechanical time constant (s).
pub const DEFAULT_TAU_S: f64 = 0.5;
/// Default symmetric voltage bound (V).
pub const DEFAULT_MAX_VOLTAGE: f64 = 24.0;

/// A deliberately simple first-order speed plant with a load disturbance term:
///
/// ```text
/// dv/dt = (1/tau) * (K*V - v) - d
/// ```
///
/// where:
/// - v is the velocity (RPM)
/// - V is the applied voltage, clamped to `[-max_voltage, max_voltage]`
/// - K is the steady-state gain (RPM/V)
/// - tau is the mechanical time constant (s)
/// - d is the external load disturbance (RPM/s)
///
/// Integrated with forward Euler. Under a constant disturbance the steady state
/// is `K*V - d*tau`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DcMotor {
    /// Current velocity (RPM).
    pub velocity_rpm: f64,

    gain_rpm_per_volt: f64,
    tau_s: f64,
    max_voltage: f64,

    applied_voltage: f64,
    disturbance_rpm_per_s: f64,
}

impl Default for DcMotor {
    fn default() -> Self {
        Self {
            velocity_rpm: 0.0,
            gain_rpm_per_volt: DEFAULT_GAIN_RPM_PER_VOLT,
            tau_s: DEFAULT_TAU_S,
            max_voltage: DEFAULT_MAX_VOLTAGE,
            applied_voltage: 0.0,
            disturbance_rpm_per_s: 0.0,
        }
    }
}

impl DcMotor {
    /// Create a motor at rest.
    ///
    /// # Errors
    ///
    /// Returns an error if the gain is non-finite or `tau_s`/`max_voltage`
    /// are not strictly positive.
    pub fn new(gain_rpm_per_volt: f64, tau_s: f64, max_voltage: f64) -> SimResult<Self> {
        ensure_finite(gain_rpm_per_volt, "gain_rpm_per_volt")?;
        ensure_positive(tau_s, "tau_s")?;
        ensure_positive(max_voltage, "max_voltage")?;
        Ok(Self {
            gain_rpm_per_volt,
            tau_s,
            max_voltage,
            ..Self::default()
        })
    }

    /// Start from a non-zero velocity.
    pub fn with_velocity(mut self, velocity_rpm: f64) -> Self {
        self.velocity_rpm = velocity_rpm;
        self
    }

    pub fn gain_rpm_per_volt(&self) -> f64 {
        self.gain_rpm_per_volt
    }

    pub fn tau_s(&self) -> f64 {
        self.tau_s
    }

    pub fn max_voltage(&self) -> f64 {
        self.max_voltage
    }

    /// Voltage stored by the last `actuate`, after clamping.
    pub fn applied_voltage(&self) -> f64 {
        self.applied_voltage
    }
}

impl System for DcMotor {
    fn observe(&self) -> f64 {
        self.velocity_rpm
    }

    fn actuate(&mut self, u: f64) {
        self.applied_voltage = u.clamp(-self.max_voltage, self.max_voltage);
    }

    fn step(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }

        let target = self.gain_rpm_per_volt * self.applied_voltage;
        let alpha = dt / self.tau_s;
        self.velocity_rpm += alpha * (target - self.velocity_rpm) - self.disturbance_rpm_per_s * dt;
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            accepts_disturbance: true,
            reports_disturbance: true,
            reports_signals: false,
        }
    }

    fn set_disturbance(&mut self, rpm_per_s: f64) {
        self.disturbance_rpm_per_s = rpm_per_s;
    }

    fn disturbance(&self) -> f64 {
        self.disturbance_rpm_per_s
    }
}
