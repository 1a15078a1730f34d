//! Experiment configuration (YAML).
//!
//! Every section and field is optional; missing values take the defaults of
//! the reference step experiment (1000 RPM target, 10 s at 1 ms).

use std::path::Path;

use mcl_controls::{DEFAULT_OUTPUT_LIMIT, Deadzone, ModifierChain, PidController};
use mcl_sim::{DcMotor, StepConfig, StepDisturbanceConfig};
use mcl_sim::dc_motor::{DEFAULT_GAIN_RPM_PER_VOLT, DEFAULT_MAX_VOLTAGE, DEFAULT_TAU_S};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperimentConfig {
    pub controller: ControllerConfig,
    pub plant: PlantConfig,
    pub experiment: TimingConfig,
    pub actuator: ActuatorConfig,
    pub disturbance: DisturbanceConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub out_min: f64,
    pub out_max: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            kp: 0.02,
            ki: 0.05,
            kd: 0.0,
            out_min: -DEFAULT_OUTPUT_LIMIT,
            out_max: DEFAULT_OUTPUT_LIMIT,
        }
    }
}

impl ControllerConfig {
    pub fn build(&self) -> AppResult<PidController> {
        Ok(PidController::with_limits(
            self.kp,
            self.ki,
            self.kd,
            self.out_min,
            self.out_max,
        )?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlantConfig {
    pub gain_rpm_per_volt: f64,
    pub tau_s: f64,
    pub max_voltage: f64,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            gain_rpm_per_volt: DEFAULT_GAIN_RPM_PER_VOLT,
            tau_s: DEFAULT_TAU_S,
            max_voltage: DEFAULT_MAX_VOLTAGE,
        }
    }
}

impl PlantConfig {
    pub fn build(&self) -> AppResult<DcMotor> {
        Ok(DcMotor::new(
            self.gain_rpm_per_volt,
            self.tau_s,
            self.max_voltage,
        )?)
    }
}

/// Step experiment timing. Values must be finite; non-positive timing is
/// accepted and yields an empty run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub target_rpm: f64,
    pub duration_s: f64,
    pub dt_s: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            target_rpm: 1000.0,
            duration_s: 10.0,
            dt_s: 0.001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActuatorConfig {
    /// Deadzone threshold (V); `0` disables the modifier.
    pub deadzone_v: f64,
}

impl ActuatorConfig {
    /// One-element deadzone chain, or `None` when disabled.
    pub fn modifier_chain(&self) -> AppResult<Option<ModifierChain>> {
        if self.deadzone_v > 0.0 {
            let deadzone = Deadzone::new(self.deadzone_v)?;
            return Ok(Some(ModifierChain::new().with(deadzone)));
        }
        Ok(None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisturbanceConfig {
    pub enabled: bool,
    pub start_s: f64,
    /// `0` means until the end of the run.
    pub duration_s: f64,
    pub magnitude_rpm_per_s: f64,
}

impl Default for DisturbanceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            start_s: 5.0,
            duration_s: 2.0,
            magnitude_rpm_per_s: 50.0,
        }
    }
}

impl DisturbanceConfig {
    pub fn schedule(&self) -> StepDisturbanceConfig {
        StepDisturbanceConfig {
            enabled: self.enabled,
            start_s: self.start_s,
            duration_s: self.duration_s,
            magnitude_rpm_per_s: self.magnitude_rpm_per_s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Settling band as a fraction of |target| (0.02 = ±2%).
    pub settling_band: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            settling_band: 0.02,
        }
    }
}

impl ExperimentConfig {
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let cfg: Self = serde_yaml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check controller, plant, timing, actuator and analysis parameters.
    ///
    /// Timing only has to be finite: non-positive values produce an empty run.
    pub fn validate(&self) -> AppResult<()> {
        self.controller.build()?;
        self.plant.build()?;

        let timing = &self.experiment;
        for (name, value) in [
            ("experiment.target_rpm", timing.target_rpm),
            ("experiment.duration_s", timing.duration_s),
            ("experiment.dt_s", timing.dt_s),
        ] {
            if !value.is_finite() {
                return Err(AppError::InvalidConfig(format!(
                    "{name} must be finite (got {value})"
                )));
            }
        }

        let deadzone = self.actuator.deadzone_v;
        if !deadzone.is_finite() || deadzone < 0.0 {
            return Err(AppError::InvalidConfig(format!(
                "actuator.deadzone_v must be finite and >= 0 (got {deadzone})"
            )));
        }

        let band = self.analysis.settling_band;
        if !band.is_finite() || band < 0.0 {
            return Err(AppError::InvalidConfig(format!(
                "analysis.settling_band must be finite and >= 0 (got {band})"
            )));
        }
        if self.disturbance.enabled
            && !(self.disturbance.start_s.is_finite()
                && self.disturbance.duration_s.is_finite()
                && self.disturbance.magnitude_rpm_per_s.is_finite())
        {
            return Err(AppError::InvalidConfig(
                "disturbance parameters must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Runner configuration for this experiment.
    pub fn step_config(&self) -> AppResult<StepConfig> {
        let mut step = StepConfig::new(
            self.experiment.target_rpm,
            self.experiment.dt_s,
            self.experiment.duration_s,
        );
        if let Some(chain) = self.actuator.modifier_chain()? {
            step = step.with_modifier(chain);
        }
        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ExperimentConfig::default();
        assert_eq!(cfg.controller.kp, 0.02);
        assert_eq!(cfg.controller.ki, 0.05);
        assert_eq!(cfg.controller.out_max, 24.0);
        assert_eq!(cfg.plant.tau_s, 0.5);
        assert_eq!(cfg.experiment.target_rpm, 1000.0);
        assert_eq!(cfg.experiment.dt_s, 0.001);
        assert!(!cfg.disturbance.enabled);
        assert_eq!(cfg.disturbance.start_s, 5.0);
        assert_eq!(cfg.analysis.settling_band, 0.02);
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let cfg = ExperimentConfig::from_yaml(
            "controller:\n  kp: 0.1\nexperiment:\n  duration_s: 2.0\ndisturbance:\n  enabled: true\n",
        )
        .unwrap();
        assert_eq!(cfg.controller.kp, 0.1);
        assert_eq!(cfg.controller.ki, 0.05);
        assert_eq!(cfg.experiment.duration_s, 2.0);
        assert_eq!(cfg.experiment.dt_s, 0.001);
        assert!(cfg.disturbance.enabled);
        assert_eq!(cfg.disturbance.magnitude_rpm_per_s, 50.0);
    }

    #[test]
    fn empty_yaml_is_default() {
        let cfg = ExperimentConfig::from_yaml("{}").unwrap();
        assert_eq!(cfg, ExperimentConfig::default());
    }

    #[test]
    fn unknown_field_rejected() {
        assert!(ExperimentConfig::from_yaml("controller:\n  kq: 1.0\n").is_err());
    }

    #[test]
    fn invalid_parameters_rejected() {
        let mut cfg = ExperimentConfig::default();
        cfg.controller.out_min = 30.0;
        assert!(matches!(cfg.validate(), Err(AppError::Control(_))));

        let mut cfg = ExperimentConfig::default();
        cfg.plant.tau_s = 0.0;
        assert!(matches!(cfg.validate(), Err(AppError::Simulation(_))));

        let mut cfg = ExperimentConfig::default();
        cfg.actuator.deadzone_v = f64::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = ExperimentConfig::default();
        cfg.analysis.settling_band = -0.1;
        assert!(matches!(cfg.validate(), Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn invalid_timing_is_not_a_config_error() {
        let mut cfg = ExperimentConfig::default();
        cfg.experiment.dt_s = 0.0;
        cfg.experiment.duration_s = -1.0;
        cfg.validate().unwrap();
        assert_eq!(cfg.step_config().unwrap().step_count(), 0);
    }

    #[test]
    fn non_finite_timing_rejected() {
        let err = ExperimentConfig::from_yaml("experiment:\n  duration_s: .inf\n").unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)), "{err}");

        let mut cfg = ExperimentConfig::default();
        cfg.experiment.dt_s = f64::NAN;
        assert!(matches!(cfg.validate(), Err(AppError::InvalidConfig(_))));

        let mut cfg = ExperimentConfig::default();
        cfg.experiment.target_rpm = f64::NEG_INFINITY;
        assert!(matches!(cfg.validate(), Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn deadzone_installed_only_when_positive() {
        let mut cfg = ExperimentConfig::default();
        assert!(cfg.step_config().unwrap().modifier.is_none());

        cfg.actuator.deadzone_v = 0.5;
        let chain = cfg.step_config().unwrap().modifier.unwrap();
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn yaml_round_trip() {
        let mut cfg = ExperimentConfig::default();
        cfg.disturbance.enabled = true;
        cfg.actuator.deadzone_v = 1.5;
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        assert_eq!(ExperimentConfig::from_yaml(&yaml).unwrap(), cfg);
    }
}
