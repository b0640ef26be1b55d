//! Session configuration and executable lookup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::Result;

/// Environment variable naming a directory that holds simulator binaries.
pub const BIN_DIR_ENV: &str = "MFSESSION_BIN_DIR";

/// Settings for creating a [`ModelSession`](crate::ModelSession).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "defaults::session_label")]
    pub label: String,
    #[serde(default = "defaults::run_name")]
    pub run_name: String,
    #[serde(default = "defaults::exe_name")]
    pub exe_name: String,
    /// `None` allocates a temporary working directory
    #[serde(default)]
    pub working_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            label: defaults::session_label(),
            run_name: defaults::run_name(),
            exe_name: defaults::exe_name(),
            working_path: None,
        }
    }
}

impl SessionConfig {
    /// Read a JSON configuration file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Per-user directory for simulator binaries.
pub fn user_bin_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("mfsession").join("bin"))
}

/// Locate the simulator executable.
///
/// Names containing a path separator are used as given. Otherwise the
/// directory named by `MFSESSION_BIN_DIR` and then [`user_bin_dir`] are
/// searched; failing both, the bare name is left to the OS search path.
pub fn resolve_executable(exe_name: &str) -> PathBuf {
    let mut search = Vec::new();
    if let Ok(dir) = std::env::var(BIN_DIR_ENV) {
        search.push(PathBuf::from(dir));
    }
    search.extend(user_bin_dir());
    resolve_in(exe_name, &search)
}

fn resolve_in(exe_name: &str, search: &[PathBuf]) -> PathBuf {
    let given = Path::new(exe_name);
    if given.components().count() > 1 {
        return given.to_path_buf();
    }

    let with_suffix = format!("{}{}", exe_name, std::env::consts::EXE_SUFFIX);
    for dir in search {
        for candidate in [dir.join(exe_name), dir.join(&with_suffix)] {
            if candidate.is_file() {
                log::debug!("Using simulator binary {:?}", candidate);
                return candidate;
            }
        }
    }
    given.to_path_buf()
}
