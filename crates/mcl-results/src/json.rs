//! Pretty-printed JSON artifacts.

use crate::ResultsResult;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Write `value` to `path` as pretty-printed JSON, creating parent directories.
///
/// Non-finite floats serialize as `null`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> ResultsResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let data = serde_json::to_string_pretty(value)?;
    fs::write(path, data)?;
    tracing::debug!(path = %path.display(), "wrote json");
    Ok(())
}
