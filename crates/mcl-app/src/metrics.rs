//! Step-response metrics.
//!
//! Reduces a complete sample series to scalar quality indicators (overshoot,
//! settling time, IAE, saturation fraction).

use mcl_sim::Sample;
use serde::{Deserialize, Serialize};

/// Floor for the settling band when `|target| * band` is zero.
pub const MIN_SETTLING_BAND: f64 = 1e-9;

/// Step-response summary of one run.
///
/// `settling_time_seconds` is NaN when the response never settles; JSON
/// output carries it as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub target: f64,

    pub max_actual: f64,
    pub min_actual: f64,

    pub overshoot_percent: f64,
    pub steady_state_error: f64,
    /// Integral of absolute error (RPM·s).
    pub iae: f64,
    pub settling_time_seconds: f64,
    pub saturation_fraction: f64,
}

/// Compute step-response metrics. `settling_band` is a fraction of
/// `|target|`, typically `0.02`.
///
/// An empty series yields zeros with an undefined (NaN) settling time.
pub fn compute(samples: &[Sample], settling_band: f64) -> Metrics {
    let Some(last) = samples.last() else {
        return Metrics {
            settling_time_seconds: f64::NAN,
            ..Metrics::default()
        };
    };
    let target = last.target;

    let mut max_actual = f64::NEG_INFINITY;
    let mut min_actual = f64::INFINITY;
    let mut iae = 0.0;
    let mut saturated = 0usize;
    for s in samples {
        max_actual = max_actual.max(s.actual);
        min_actual = min_actual.min(s.actual);
        iae += s.error.abs() * s.dt;
        if s.saturated {
            saturated += 1;
        }
    }

    let overshoot_percent = if target == 0.0 {
        0.0
    } else {
        ((max_actual - target) / target.abs() * 100.0).max(0.0)
    };

    let mut band = target.abs() * settling_band;
    if band == 0.0 {
        band = MIN_SETTLING_BAND;
    }

    Metrics {
        target,
        max_actual,
        min_actual,
        overshoot_percent,
        steady_state_error: last.error,
        iae,
        settling_time_seconds: settling_time(samples, band),
        saturation_fraction: saturated as f64 / samples.len() as f64,
    }
}

/// Timestamp of the first sample after which |error| stays within `band`
/// through the end of the series; NaN if there is none.
fn settling_time(samples: &[Sample], band: f64) -> f64 {
    // Everything after the last out-of-band sample is in band.
    let first_settled = match samples.iter().rposition(|s| s.error.abs() > band) {
        Some(i) => i + 1,
        None => 0,
    };
    samples
        .get(first_settled)
        .map(|s| s.t)
        .unwrap_or(f64::NAN)
}
