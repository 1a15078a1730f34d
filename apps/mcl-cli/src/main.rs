use clap::{Args, Parser, Subcommand};
use mcl_app::{AppResult, ExperimentConfig, build_info, run_sim_step};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mcl")]
#[command(about = "Motor Control Lab - simulation and analysis tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run simulations
    #[command(subcommand)]
    Sim(SimCommands),
    /// Print build information
    Version,
}

#[derive(Subcommand)]
enum SimCommands {
    /// Run a step response simulation with PID control on a DC motor.
    ///
    /// Writes metadata.json, samples.csv, metrics.json, out.log and, unless
    /// built without the `plots` feature, velocity.png and control.png.
    Step(StepArgs),
}

/// Flags override the config file (or the built-in defaults without one).
#[derive(Args, Debug)]
struct StepArgs {
    /// Experiment config YAML file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Proportional gain
    #[arg(long)]
    kp: Option<f64>,
    /// Integral gain
    #[arg(long)]
    ki: Option<f64>,
    /// Derivative gain
    #[arg(long)]
    kd: Option<f64>,
    /// Target velocity (RPM)
    #[arg(long, allow_negative_numbers = true)]
    target: Option<f64>,
    /// Simulation duration (s)
    #[arg(long, allow_negative_numbers = true)]
    duration: Option<f64>,
    /// Simulation timestep (s)
    #[arg(long, allow_negative_numbers = true)]
    dt: Option<f64>,
    /// Actuator deadzone threshold (V), 0 disables
    #[arg(long)]
    deadzone: Option<f64>,
    /// Enable load disturbance injection
    #[arg(long)]
    disturbance_enabled: bool,
    /// Disturbance start time (s)
    #[arg(long)]
    disturbance_start: Option<f64>,
    /// Disturbance duration (s, 0 = until the end)
    #[arg(long)]
    disturbance_duration: Option<f64>,
    /// Disturbance magnitude (RPM/s)
    #[arg(long, allow_negative_numbers = true)]
    disturbance_magnitude: Option<f64>,
    /// Base output directory
    #[arg(long, default_value = "runs")]
    out: PathBuf,
}

impl StepArgs {
    fn apply(&self, cfg: &mut ExperimentConfig) {
        fn set(field: &mut f64, value: Option<f64>) {
            if let Some(v) = value {
                *field = v;
            }
        }

        set(&mut cfg.controller.kp, self.kp);
        set(&mut cfg.controller.ki, self.ki);
        set(&mut cfg.controller.kd, self.kd);
        set(&mut cfg.experiment.target_rpm, self.target);
        set(&mut cfg.experiment.duration_s, self.duration);
        set(&mut cfg.experiment.dt_s, self.dt);
        set(&mut cfg.actuator.deadzone_v, self.deadzone);
        if self.disturbance_enabled {
            cfg.disturbance.enabled = true;
        }
        set(&mut cfg.disturbance.start_s, self.disturbance_start);
        set(&mut cfg.disturbance.duration_s, self.disturbance_duration);
        set(&mut cfg.disturbance.magnitude_rpm_per_s, self.disturbance_magnitude);
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sim(SimCommands::Step(args)) => cmd_sim_step(&args),
        Commands::Version => {
            println!("{}", build_info());
            Ok(())
        }
    }
}

fn cmd_sim_step(args: &StepArgs) -> AppResult<()> {
    let mut cfg = match &args.config {
        Some(path) => ExperimentConfig::load(path)?,
        None => ExperimentConfig::default(),
    };
    args.apply(&mut cfg);
    tracing::debug!(?cfg, "effective experiment config");

    let summary = run_sim_step(&cfg, &args.out)?;
    let m = &summary.metrics;

    println!("Run: {}", summary.run_id);
    println!("Artifacts: {}", summary.run_dir.display());
    println!(
        "Final: actual={:.2}RPM err={:.2} u={:.2}V",
        summary.final_actual, summary.final_error, summary.final_u
    );
    println!(
        "Metrics: overshoot={:.2}% settling={} iae={:.3}",
        m.overshoot_percent, m.settling_time_seconds, m.iae
    );
    println!("  Samples: {} ({:?} wall)", summary.samples, summary.wall_time);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_overlay_config() {
        let cli = Cli::parse_from([
            "mcl",
            "sim",
            "step",
            "--kp",
            "0.1",
            "--dt",
            "0.01",
            "--deadzone",
            "0.5",
            "--disturbance-enabled",
            "--disturbance-start",
            "1.5",
        ]);
        let Commands::Sim(SimCommands::Step(args)) = cli.command else {
            panic!("expected sim step");
        };

        let mut cfg = ExperimentConfig::default();
        args.apply(&mut cfg);
        assert_eq!(cfg.controller.kp, 0.1);
        assert_eq!(cfg.controller.ki, 0.05);
        assert_eq!(cfg.experiment.dt_s, 0.01);
        assert_eq!(cfg.actuator.deadzone_v, 0.5);
        assert!(cfg.disturbance.enabled);
        assert_eq!(cfg.disturbance.start_s, 1.5);
        assert_eq!(cfg.disturbance.duration_s, 2.0);
        assert_eq!(args.out, PathBuf::from("runs"));
    }

    #[test]
    fn negative_timing_reaches_the_runner() {
        let cli = Cli::parse_from(["mcl", "sim", "step", "--dt", "-0.001", "--duration", "-1"]);
        let Commands::Sim(SimCommands::Step(args)) = cli.command else {
            panic!("expected sim step");
        };
        let mut cfg = ExperimentConfig::default();
        args.apply(&mut cfg);
        assert_eq!(cfg.experiment.dt_s, -0.001);
        assert_eq!(cfg.experiment.duration_s, -1.0);

        let out = tempfile::tempdir().unwrap();
        let err = run_sim_step(&cfg, out.path()).unwrap_err();
        assert!(matches!(err, mcl_app::AppError::NoSamples { .. }), "{err}");
    }

    #[cfg(feature = "plots")]
    #[test]
    fn step_writes_plots() {
        let out = tempfile::tempdir().unwrap();
        let out_arg = out.path().to_str().unwrap();
        let cli = Cli::parse_from(["mcl", "sim", "step", "--duration", "0.5", "--out", out_arg]);
        let Commands::Sim(SimCommands::Step(args)) = cli.command else {
            panic!("expected sim step");
        };
        cmd_sim_step(&args).unwrap();

        let runs: Vec<_> = std::fs::read_dir(out.path()).unwrap().collect();
        assert_eq!(runs.len(), 1);
        let run_dir = runs[0].as_ref().unwrap().path();
        for name in ["velocity.png", "control.png", "samples.csv", "metrics.json"] {
            assert!(run_dir.join(name).is_file(), "missing {name}");
        }
    }

    #[test]
    fn absent_flags_keep_config() {
        let cli = Cli::parse_from(["mcl", "sim", "step", "--out", "/tmp/x"]);
        let Commands::Sim(SimCommands::Step(args)) = cli.command else {
            panic!("expected sim step");
        };
        let mut cfg = ExperimentConfig::default();
        args.apply(&mut cfg);
        assert_eq!(cfg, ExperimentConfig::default());
    }
}
