//! Local key-value persistence.
//!
//! Each logical key is one file under the storage root:
//!
//! ```text
//! <root>/
//!   layline-logs-v1              # JSON array of log records
//!   layline-pending-log-id-v1    # id of the pending record, if any
//!   trim-mode                    # last sail mode
//!   wind-dir-deg                 # last wind direction
//!   wind-spd-kt                  # last wind speed
//!   jib-car-pos-screw-v1         # last jib car position
//! ```
//!
//! Values are replaced whole: written to a temporary file, then renamed over
//! the old one. A missing file is an absent value.

mod export;
mod logbook;
mod prefs;

use std::{fs, io, path::PathBuf};

pub use logbook::LogCounts;
pub use prefs::Preferences;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("corrupt value under {key}: {reason}")]
    Corrupt { key: &'static str, reason: String },
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Local file-based key-value storage.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The directory is created if it doesn't exist. If that fails, reads
    /// come back empty and writes warn and are dropped.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        if let Err(e) = fs::create_dir_all(&root) {
            log::warn!(
                "storage unavailable at {}: {e}; trials and preferences will not be saved",
                root.display()
            );
        }
        Self { root }
    }

    /// Returns the default storage root: `~/.layline/data/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".layline").join("data"))
    }

    /// Reads the value stored under `key`, or `None` if absent.
    fn read_key(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the value stored under `key`.
    fn write_key(&self, key: &str, value: &str) -> Result<()> {
        let tmp = self.root.join(format!("{key}.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(tmp, self.key_path(key))?;
        Ok(())
    }

    /// Removes `key`.
    ///
    /// Idempotent: does nothing if the key is absent.
    fn remove_key(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::TempDir;

    use super::Storage;

    pub fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("data"));
        (dir, storage)
    }
}
