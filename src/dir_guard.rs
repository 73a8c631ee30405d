//! Scoped working-directory changes
//!
//! The catalog is read relative to its own directory. `WorkingDirGuard`
//! enters that directory and puts the previous working directory back when it
//! is dropped, so every exit path (including `?` early returns) restores it.

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Restores the previous working directory on drop
#[derive(Debug)]
pub struct WorkingDirGuard {
    previous: PathBuf,
    entered: PathBuf,
}

impl WorkingDirGuard {
    /// Change into `dir`, remembering the current working directory
    pub fn enter(dir: &Path) -> io::Result<Self> {
        let previous = env::current_dir()?;
        env::set_current_dir(dir)?;
        debug!("Entered {:?} (was {:?})", dir, previous);
        Ok(Self {
            previous,
            entered: dir.to_path_buf(),
        })
    }

    /// Directory the guard changed into
    pub fn entered(&self) -> &Path {
        &self.entered
    }

    /// Directory restored on drop
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        match env::set_current_dir(&self.previous) {
            Ok(()) => debug!("Restored working directory {:?}", self.previous),
            Err(e) => warn!(
                "Failed to restore working directory {:?}: {}",
                self.previous, e
            ),
        }
    }
}
