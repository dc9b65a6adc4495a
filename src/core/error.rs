//! Errors raised while loading external inputs.
//!
//! Rule tables, the site directory and the documentation manifest are all
//! produced by an outside build step. Any failure to read or parse them is
//! fatal for the command that needs them.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Failure to load one of the JSON inputs.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),
}

impl LoadError {
    /// Path of the input that failed.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io(path, _) | Self::Json(path, _) => path,
        }
    }
}

/// Read `path` and deserialize it as JSON.
///
/// `prepare` runs on the raw text first (used to strip comments from
/// JSON-with-comments inputs).
pub fn read_json<T, F>(path: &Path, prepare: F) -> Result<T, LoadError>
where
    T: DeserializeOwned,
    F: FnOnce(&str) -> String,
{
    let raw =
        std::fs::read_to_string(path).map_err(|err| LoadError::Io(path.to_path_buf(), err))?;
    serde_json::from_str(&prepare(&raw)).map_err(|err| LoadError::Json(path.to_path_buf(), err))
}
