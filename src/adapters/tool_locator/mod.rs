//! Search-path tool locator
//!
//! Resolves external binaries the same way the shell would.

use std::path::PathBuf;

use tracing::debug;

use crate::ports::ToolLocator;

/// Locator backed by the `PATH` environment variable
pub struct PathToolLocator;

impl PathToolLocator {
    /// Create new search-path locator
    pub fn new() -> Self {
        Self
    }
}

impl Default for PathToolLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolLocator for PathToolLocator {
    fn locate(&self, binary: &str) -> Option<PathBuf> {
        let found = which::which(binary).ok();
        debug!("Locating {}: {:?}", binary, found);
        found
    }
}
