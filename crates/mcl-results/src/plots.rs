//! PNG plots of a step run (`plots` feature).

use crate::{ResultsError, ResultsResult};
use mcl_sim::Sample;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

const SIZE: (u32, u32) = (1280, 640);

fn plot_err<E: std::fmt::Display>(e: E) -> ResultsError {
    ResultsError::Plot(e.to_string())
}

/// Axis range over `values`, padded by 5% so flat lines stay visible.
fn padded_range(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let pad = ((hi - lo) * 0.05).max(1e-6);
    (lo - pad)..(hi + pad)
}

fn time_range(samples: &[Sample]) -> std::ops::Range<f64> {
    let end = samples.last().map(|s| s.t + s.dt).unwrap_or(1.0);
    0.0..end.max(1e-6)
}

/// Velocity response (`actual` and dashed `target` vs time) to `velocity.png`.
///
/// Writes nothing for an empty series and returns `Ok(None)`.
pub fn write_velocity_plot(dir: &Path, samples: &[Sample]) -> ResultsResult<Option<PathBuf>> {
    if samples.is_empty() {
        return Ok(None);
    }
    let path = dir.join("velocity.png");

    let root = BitMapBackend::new(&path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let y = padded_range(samples.iter().flat_map(|s| [s.actual, s.target]));
    let mut chart = ChartBuilder::on(&root)
        .caption("Velocity Response", ("sans-serif", 30).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(time_range(samples), y)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Velocity (RPM)")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            samples.iter().map(|s| (s.t, s.actual)),
            BLUE.stroke_width(2),
        ))
        .map_err(plot_err)?
        .label("Actual")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], BLUE.stroke_width(3)));

    chart
        .draw_series(DashedLineSeries::new(
            samples.iter().map(|s| (s.t, s.target)),
            8,
            6,
            RED.stroke_width(2),
        ))
        .map_err(plot_err)?
        .label("Target")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], RED.stroke_width(3)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .border_style(BLACK)
        .background_style(WHITE.mix(0.7))
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    tracing::debug!(path = %path.display(), "wrote velocity plot");
    Ok(Some(path.clone()))
}

/// Post-modifier command `u` vs time to `control.png`.
pub fn write_control_plot(dir: &Path, samples: &[Sample]) -> ResultsResult<Option<PathBuf>> {
    if samples.is_empty() {
        return Ok(None);
    }
    let path = dir.join("control.png");

    let root = BitMapBackend::new(&path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Control Signal", ("sans-serif", 30).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(time_range(samples), padded_range(samples.iter().map(|s| s.u)))
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Voltage (V)")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            samples.iter().map(|s| (s.t, s.u)),
            GREEN.stroke_width(2),
        ))
        .map_err(plot_err)?
        .label("Control (u)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], GREEN.stroke_width(3)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .border_style(BLACK)
        .background_style(WHITE.mix(0.7))
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    tracing::debug!(path = %path.display(), "wrote control plot");
    Ok(Some(path.clone()))
}
