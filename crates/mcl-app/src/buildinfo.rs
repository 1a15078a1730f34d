//! Build metadata baked in at compile time.
//!
//! `MCL_GIT_COMMIT` and `MCL_BUILD_DATE` are read from the build environment;
//! local builds fall back to `none` / `unknown`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: &'static str,
    pub date: &'static str,
}

pub const fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        commit: match option_env!("MCL_GIT_COMMIT") {
            Some(commit) => commit,
            None => "none",
        },
        date: match option_env!("MCL_BUILD_DATE") {
            Some(date) => date,
            None => "unknown",
        },
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mcl {} (commit {}, built {})",
            self.version, self.commit, self.date
        )
    }
}
