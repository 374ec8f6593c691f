//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the core. The core never reads environment variables itself; the binary does
//! that and hands over a finished [`CoreConfig`].

use crate::constants::{CLASSIFIER_FILENAME, DEFAULT_MODEL_DIR, SCALER_FILENAME, SCHEMA_FILENAME};
use crate::{CardioError, CardioResult};
use std::path::{Path, PathBuf};

/// Locations of the three model artifacts, resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    classifier_path: PathBuf,
    scaler_path: PathBuf,
    schema_path: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig` from explicit artifact paths.
    pub fn new(classifier_path: PathBuf, scaler_path: PathBuf, schema_path: PathBuf) -> Self {
        Self {
            classifier_path,
            scaler_path,
            schema_path,
        }
    }

    /// Create a `CoreConfig` using the standard artifact filenames inside `model_dir`.
    pub fn from_model_dir(model_dir: &Path) -> Self {
        Self::new(
            model_dir.join(CLASSIFIER_FILENAME),
            model_dir.join(SCALER_FILENAME),
            model_dir.join(SCHEMA_FILENAME),
        )
    }

    pub fn with_classifier_path(mut self, path: PathBuf) -> Self {
        self.classifier_path = path;
        self
    }

    pub fn with_scaler_path(mut self, path: PathBuf) -> Self {
        self.scaler_path = path;
        self
    }

    pub fn with_schema_path(mut self, path: PathBuf) -> Self {
        self.schema_path = path;
        self
    }

    pub fn classifier_path(&self) -> &Path {
        &self.classifier_path
    }

    pub fn scaler_path(&self) -> &Path {
        &self.scaler_path
    }

    pub fn schema_path(&self) -> &Path {
        &self.schema_path
    }
}

/// Resolve the model artifact directory without reading environment variables.
///
/// If `override_dir` is provided, it must be an existing directory. Otherwise this looks for
/// `models/` relative to the current working directory and then walks up from
/// `CARGO_MANIFEST_DIR`.
///
/// # Errors
///
/// Returns [`CardioError::InvalidConfig`] if the override is not a directory or no candidate
/// directory exists.
pub fn resolve_model_dir(override_dir: Option<PathBuf>) -> CardioResult<PathBuf> {
    if let Some(model_dir) = override_dir {
        if model_dir.is_dir() {
            return Ok(model_dir);
        }
        return Err(CardioError::InvalidConfig(format!(
            "model directory override is not a directory: {}",
            model_dir.display()
        )));
    }

    let cwd_relative = PathBuf::from(DEFAULT_MODEL_DIR);
    if cwd_relative.is_dir() {
        return Ok(cwd_relative);
    }

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    for ancestor in manifest_dir.ancestors() {
        let candidate = ancestor.join(DEFAULT_MODEL_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }
    }

    Err(CardioError::InvalidConfig(format!(
        "could not locate {DEFAULT_MODEL_DIR}/ directory holding the model artifacts"
    )))
}
