//! Step experiment execution and artifact persistence.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mcl_controls::Pid;
use mcl_results::RunDir;
use mcl_sim::{DisturbedSystem, Sample, run_step};

use crate::config::ExperimentConfig;
use crate::error::{AppError, AppResult};
use crate::metrics::{self, Metrics};

pub const RUN_KIND: &str = "sim";
pub const PLANT_NAME: &str = "dc-motor";
pub const EXPERIMENT_NAME: &str = "step";

/// In-memory result of one step experiment.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub samples: Vec<Sample>,
    pub metrics: Metrics,
    /// Wall-clock cost of the simulated loop; informational only.
    pub wall_time: Duration,
}

/// Summary of a persisted run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: String,
    pub run_dir: PathBuf,
    pub samples: usize,
    pub final_actual: f64,
    pub final_error: f64,
    pub final_u: f64,
    pub metrics: Metrics,
    pub wall_time: Duration,
}

/// Build the plant, controller and modifiers from `cfg` and run the step
/// experiment. No I/O.
///
/// Invalid timing is not an error here: the result simply has no samples.
pub fn simulate(cfg: &ExperimentConfig) -> AppResult<Simulation> {
    cfg.validate()?;

    let mut pid = Pid::new(cfg.controller.build()?);
    let plant = cfg.plant.build()?;
    let step = cfg.step_config()?;

    let run = if cfg.disturbance.enabled {
        let mut system = DisturbedSystem::new(plant, cfg.disturbance.schedule());
        run_step(&mut system, &mut pid, &step)
    } else {
        let mut system = plant;
        run_step(&mut system, &mut pid, &step)
    };

    let metrics = metrics::compute(&run.samples, cfg.analysis.settling_band);
    Ok(Simulation {
        samples: run.samples,
        metrics,
        wall_time: run.wall_time,
    })
}

/// Run the step experiment and write its run directory under `out_base`:
/// `metadata.json`, `samples.csv`, `metrics.json`, `out.log` and, with the
/// `plots` feature, `velocity.png` and `control.png`.
///
/// # Errors
///
/// [`AppError::NoSamples`] when the timing produces no steps; nothing is
/// written in that case.
pub fn run_sim_step(cfg: &ExperimentConfig, out_base: &Path) -> AppResult<RunSummary> {
    let sim = simulate(cfg)?;
    let Some(last) = sim.samples.last() else {
        return Err(AppError::NoSamples {
            dt: cfg.experiment.dt_s,
            duration: cfg.experiment.duration_s,
        });
    };

    let mut run = RunDir::create(out_base, RUN_KIND, PLANT_NAME, EXPERIMENT_NAME, cfg)?;
    let run_id = run.run_id().to_string();
    tracing::info!(run_id = %run_id, samples = sim.samples.len(), "writing run artifacts");

    run.write_samples_csv(&sim.samples)?;
    run.write_json("metrics.json", &sim.metrics)?;

    #[cfg(feature = "plots")]
    {
        mcl_results::plots::write_velocity_plot(run.path(), &sim.samples)?;
        mcl_results::plots::write_control_plot(run.path(), &sim.samples)?;
    }

    let m = &sim.metrics;
    let out = run.out();
    writeln!(out, "run_id={run_id}")?;
    writeln!(out, "wall_time={:?}", sim.wall_time)?;
    writeln!(out, "final_actual={:.3}", last.actual)?;
    writeln!(out, "final_error={:.3}", last.error)?;
    writeln!(out, "overshoot_percent={:.3}", m.overshoot_percent)?;
    writeln!(out, "settling_time_seconds={}", m.settling_time_seconds)?;
    writeln!(out, "iae={:.6}", m.iae)?;

    let run_dir = run.close()?;

    Ok(RunSummary {
        run_id,
        run_dir,
        samples: sim.samples.len(),
        final_actual: last.actual,
        final_error: last.error,
        final_u: last.u,
        metrics: sim.metrics,
        wall_time: sim.wall_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short() -> ExperimentConfig {
        let mut cfg = ExperimentConfig::default();
        cfg.experiment.duration_s = 2.0;
        cfg.experiment.dt_s = 0.01;
        cfg
    }

    #[test]
    fn simulate_default_shape() {
        let sim = simulate(&short()).unwrap();
        assert_eq!(sim.samples.len(), 200);
        assert_eq!(sim.metrics.target, 1000.0);
        assert!(sim.samples.iter().all(|s| s.signals.is_none()));
    }

    #[test]
    fn disturbance_wrapping_only_when_enabled() {
        let mut cfg = short();
        cfg.disturbance.enabled = true;
        cfg.disturbance.start_s = 0.5;
        let sim = simulate(&cfg).unwrap();
        assert!(sim.samples.iter().all(|s| s.signals.is_some()));
    }

    #[test]
    fn invalid_timing_simulates_empty() {
        let mut cfg = short();
        cfg.experiment.dt_s = 0.0;
        let sim = simulate(&cfg).unwrap();
        assert!(sim.samples.is_empty());
        assert!(sim.metrics.settling_time_seconds.is_nan());
    }

    #[test]
    fn invalid_parameters_fail_before_running() {
        let mut cfg = short();
        cfg.plant.max_voltage = -1.0;
        assert!(simulate(&cfg).is_err());
    }
}
