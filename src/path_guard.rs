//! Catalog directory validation
//!
//! The installer changes its working directory to read the catalog, so the
//! directory is canonicalized and checked before anything is read from it:
//! - its final segment must be the installer directory name
//! - it must live under one of the allow-listed roots
//!
//! There are no retries. A rejected path aborts the run.

use crate::config::Settings;
use crate::error::{PiBackboneError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validates catalog directories against an allow-list of roots
#[derive(Debug, Clone)]
pub struct PathGuard {
    dir_name: String,
    allowed_roots: Vec<PathBuf>,
}

impl PathGuard {
    pub fn new(dir_name: impl Into<String>, allowed_roots: Vec<PathBuf>) -> Self {
        Self {
            dir_name: dir_name.into(),
            allowed_roots,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.installer_dir_name.clone(),
            settings.allowed_roots.clone(),
        )
    }

    /// Canonicalize `candidate` and check it.
    ///
    /// # Errors
    ///
    /// `UnsafePath` if the path cannot be canonicalized (it does not exist),
    /// does not end in the installer directory name, or is not under an
    /// allow-listed root.
    pub fn resolve(&self, candidate: &Path) -> Result<PathBuf> {
        let canonical = candidate.canonicalize().map_err(|e| {
            PiBackboneError::unsafe_path(candidate, format!("cannot be resolved: {}", e))
        })?;
        debug!("Catalog candidate {:?} resolved to {:?}", candidate, canonical);
        self.check(&canonical)?;
        Ok(canonical)
    }

    /// Check an already canonical path without touching the filesystem
    pub fn check(&self, canonical: &Path) -> Result<()> {
        let last_ok = canonical
            .file_name()
            .is_some_and(|name| name == self.dir_name.as_str());
        if !last_ok {
            return Err(PiBackboneError::unsafe_path(
                canonical,
                format!("last element of conf_dir must be {}", self.dir_name),
            ));
        }

        if self
            .allowed_roots
            .iter()
            .any(|root| canonical.starts_with(root))
        {
            Ok(())
        } else {
            Err(PiBackboneError::unsafe_path(
                canonical,
                "conf_dir root may not be safe",
            ))
        }
    }
}
