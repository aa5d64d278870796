//! Layline configuration.
//!
//! Loaded from `~/.layline/config.toml`. Every key is optional and a missing
//! file means defaults:
//!
//! ```toml
//! data-dir = "/path/to/data"
//! pending-timeout-secs = 120
//! debounce-ms = 700
//! ```
//!
//! The data directory is resolved through a chain:
//!
//! 1. `--data-dir <path>`: explicit per-command override
//! 2. `LAYLINE_DATA_DIR` env var
//! 3. `data-dir` in the config file
//! 4. `~/.layline/data`

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

use serde::{Deserialize, Serialize};

use crate::storage::Storage;

/// Env var overriding the data directory.
pub const DATA_DIR_ENV: &str = "LAYLINE_DATA_DIR";

const DEFAULT_PENDING_TIMEOUT_SECS: u64 = 120;
const DEFAULT_DEBOUNCE_MS: u64 = 700;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Where logs and preferences live.
    pub data_dir: Option<PathBuf>,

    /// How long a trial stays open for feedback before it is finalized unrated.
    pub pending_timeout_secs: u64,

    /// Quiet period before an edit in watch mode is logged.
    pub debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            pending_timeout_secs: DEFAULT_PENDING_TIMEOUT_SECS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl Config {
    /// Load config from `~/.layline/config.toml`.
    ///
    /// Missing file (or no home directory) yields defaults; an unreadable or
    /// invalid file is an error.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.layline/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".layline").join("config.toml"))
    }

    pub fn pending_timeout(&self) -> Duration {
        Duration::from_secs(self.pending_timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Resolve the data directory from the chain above.
    pub fn resolve_data_dir(&self, explicit: Option<&Path>) -> Result<PathBuf, String> {
        let from_env = env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty());
        self.resolve_data_dir_with(explicit, from_env.map(PathBuf::from))
    }

    fn resolve_data_dir_with(
        &self,
        explicit: Option<&Path>,
        from_env: Option<PathBuf>,
    ) -> Result<PathBuf, String> {
        explicit
            .map(Path::to_path_buf)
            .or(from_env)
            .or_else(|| self.data_dir.clone())
            .or_else(Storage::default_root)
            .ok_or_else(|| {
                format!(
                    "could not determine home directory: pass --data-dir or set {DATA_DIR_ENV}"
                )
            })
    }
}
