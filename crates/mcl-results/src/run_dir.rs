//! Per-run artifact directory.

use crate::hash::short_hash;
use crate::json::write_json;
use crate::samples_csv::write_samples_csv;
use crate::types::{Environment, RunMetadata};
use crate::ResultsResult;
use chrono::{DateTime, Utc};
use mcl_sim::Sample;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Filesystem-safe UTC timestamp used in run IDs (no colons).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%SZ";

/// A single experiment run directory under the output base.
///
/// Owns the naming convention:
/// `<UTC timestamp>_<kind>_<plant>_<experiment>_<params hash8>`.
/// Creation writes `metadata.json` and opens the `out.log` text sink.
#[derive(Debug)]
pub struct RunDir {
    dir: PathBuf,
    metadata: RunMetadata,
    out: BufWriter<File>,
}

impl RunDir {
    pub fn create<P: Serialize + ?Sized>(
        base: &Path,
        kind: &str,
        plant: &str,
        experiment: &str,
        params: &P,
    ) -> ResultsResult<Self> {
        Self::create_at(Utc::now(), base, kind, plant, experiment, params)
    }

    /// Same as [`RunDir::create`] with an explicit creation time.
    pub fn create_at<P: Serialize + ?Sized>(
        now: DateTime<Utc>,
        base: &Path,
        kind: &str,
        plant: &str,
        experiment: &str,
        params: &P,
    ) -> ResultsResult<Self> {
        let params = serde_json::to_value(params)?;
        let ts = now.format(TIMESTAMP_FORMAT).to_string();
        let run_id = format!(
            "{ts}_{kind}_{plant}_{experiment}_{}",
            short_hash(&params)
        );

        let dir = base.join(&run_id);
        fs::create_dir_all(&dir)?;

        let metadata = RunMetadata {
            run_id,
            created_at_utc: ts,
            kind: kind.to_string(),
            plant: plant.to_string(),
            experiment: experiment.to_string(),
            params,
            environment: Environment::current(),
        };
        write_json(&dir.join("metadata.json"), &metadata)?;

        let out = BufWriter::new(File::create(dir.join("out.log"))?);
        tracing::debug!(dir = %dir.display(), "created run directory");

        Ok(Self { dir, metadata, out })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn run_id(&self) -> &str {
        &self.metadata.run_id
    }

    pub fn metadata(&self) -> &RunMetadata {
        &self.metadata
    }

    /// Human-readable log sink (`out.log`).
    pub fn out(&mut self) -> &mut impl Write {
        &mut self.out
    }

    pub fn write_samples_csv(&self, samples: &[Sample]) -> ResultsResult<PathBuf> {
        let path = self.dir.join("samples.csv");
        write_samples_csv(&path, samples)?;
        Ok(path)
    }

    /// Write `value` as pretty JSON to `<run dir>/<name>`.
    pub fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> ResultsResult<PathBuf> {
        let path = self.dir.join(name);
        write_json(&path, value)?;
        Ok(path)
    }

    /// Flush and close `out.log`.
    pub fn close(mut self) -> ResultsResult<PathBuf> {
        self.out.flush()?;
        Ok(self.dir)
    }
}
