//! `samples.csv` writer.

use crate::ResultsResult;
use mcl_sim::Sample;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Fixed leading columns; signal columns follow in sorted key order.
pub const BASE_COLUMNS: [&str; 12] = [
    "t",
    "dt",
    "target",
    "actual",
    "error",
    "u",
    "p",
    "i",
    "d",
    "out_raw",
    "saturated",
    "integrated",
];

fn fmt_f64(v: f64) -> String {
    format!("{v:.6}")
}

/// Sorted union of signal keys across all samples.
fn signal_columns(samples: &[Sample]) -> Vec<&str> {
    let keys: BTreeSet<&str> = samples
        .iter()
        .filter_map(|s| s.signals.as_ref())
        .flat_map(|signals| signals.keys().map(String::as_str))
        .collect();
    keys.into_iter().collect()
}

/// Write the time series as CSV.
///
/// Floats use six decimals, booleans `true`/`false`. A sample lacking a
/// signal that another sample reports writes `0.000000` in that column.
pub fn write_samples_csv(path: &Path, samples: &[Sample]) -> ResultsResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let signal_keys = signal_columns(samples);
    let mut writer = csv::Writer::from_path(path)?;

    let header = BASE_COLUMNS.iter().copied().chain(signal_keys.iter().copied());
    writer.write_record(header)?;

    let mut row: Vec<String> = Vec::with_capacity(BASE_COLUMNS.len() + signal_keys.len());
    for s in samples {
        row.clear();
        row.extend(
            [s.t, s.dt, s.target, s.actual, s.error, s.u, s.p, s.i, s.d, s.out_raw]
                .into_iter()
                .map(fmt_f64),
        );
        row.push(s.saturated.to_string());
        row.push(s.integrated.to_string());

        for key in &signal_keys {
            let v = s
                .signals
                .as_ref()
                .and_then(|signals| signals.get(*key))
                .copied()
                .unwrap_or(0.0);
            row.push(fmt_f64(v));
        }

        writer.write_record(&row)?;
    }

    writer.flush()?;
    tracing::debug!(path = %path.display(), rows = samples.len(), "wrote samples csv");
    Ok(())
}
