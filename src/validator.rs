//! Install destination validation
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. the `gui` component is selected (nothing else installs without it)
//! 2. the path is not blank
//! 3. on platforms with a system-path convention, a path outside it needs the user's
//!    explicit confirmation
//! 4. a real write check: a marker file is created inside the destination and removed again
//!
//! The check is authoritative; a path that looks standard but cannot be written fails.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{InstallerError, Result, fs as fs_error, validation};
use crate::platform::HostPlatform;
use crate::session::Component;

const MARKER_PREFIX: &str = ".gooey-write-check-";

/// Raised when the destination is outside the recommended system prefixes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonStandardPathWarning {
    pub path: PathBuf,
    pub recommended: Vec<PathBuf>,
}

impl NonStandardPathWarning {
    pub fn title(&self) -> &'static str {
        "Custom Installation Path Warning"
    }

    pub fn message(&self) -> String {
        let recommended = self
            .recommended
            .iter()
            .map(|p| format!("- {}", p.display()))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "You have selected a custom installation path ({}) instead of the recommended system paths.\n\n\
             For proper library detection it is recommended to use:\n{}\n\n\
             Custom paths may require setting LD_LIBRARY_PATH and C_INCLUDE_PATH.\n\n\
             Do you want to continue with the custom path?",
            self.path.display(),
            recommended
        )
    }
}

/// Outcome of the path-string checks, before the write check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathAssessment {
    Standard,
    NonStandard(NonStandardPathWarning),
}

/// Validates install destinations for one platform
#[derive(Debug, Clone)]
pub struct PathValidator {
    platform: HostPlatform,
}

impl PathValidator {
    pub fn new(platform: HostPlatform) -> Self {
        Self { platform }
    }

    /// Run every check, asking `confirm` when the path is non-standard.
    ///
    /// Returns the trimmed destination on success.
    pub fn validate<F>(
        &self,
        path: &str,
        components: &BTreeSet<Component>,
        confirm: F,
    ) -> Result<PathBuf>
    where
        F: FnOnce(&NonStandardPathWarning) -> bool,
    {
        let destination = PathBuf::from(path.trim());

        if let PathAssessment::NonStandard(warning) = self.assess(path, components)? {
            tracing::debug!(path = %warning.path.display(), "non-standard install path");
            if !confirm(&warning) {
                return Err(validation::declined_path(&destination));
            }
        }

        self.check_writable(&destination)?;
        Ok(destination)
    }

    /// Component and path-string checks only
    pub fn assess(&self, path: &str, components: &BTreeSet<Component>) -> Result<PathAssessment> {
        if !components.contains(&Component::Gui) {
            return Err(InstallerError::MissingRequiredComponent);
        }

        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(InstallerError::EmptyPath);
        }

        let destination = Path::new(trimmed);
        if self.platform.has_system_convention() && !self.platform.is_system_path(destination) {
            return Ok(PathAssessment::NonStandard(NonStandardPathWarning {
                path: destination.to_path_buf(),
                recommended: self.platform.system_prefixes.clone(),
            }));
        }

        Ok(PathAssessment::Standard)
    }

    /// Create and delete a marker file in the destination.
    ///
    /// A destination that does not exist yet is checked through its nearest existing
    /// ancestor, since the worker creates the missing directories.
    pub fn check_writable(&self, destination: &Path) -> Result<()> {
        let check_dir = nearest_existing(destination)
            .ok_or_else(|| fs_error::unwritable(destination.display().to_string(), "no existing parent directory"))?;

        if !check_dir.is_dir() {
            return Err(fs_error::unwritable(
                destination.display().to_string(),
                format!("{} is not a directory", check_dir.display()),
            ));
        }

        let unwritable = |e: std::io::Error| fs_error::unwritable(destination.display().to_string(), e.to_string());

        // NamedTempFile removes the marker on drop, so early returns never leave it behind
        let mut marker = tempfile::Builder::new()
            .prefix(MARKER_PREFIX)
            .suffix(".tmp")
            .tempfile_in(check_dir)
            .map_err(unwritable)?;
        marker.write_all(b"test").map_err(unwritable)?;
        marker.close().map_err(unwritable)?;

        tracing::debug!(dir = %check_dir.display(), "write check succeeded");
        Ok(())
    }
}

fn nearest_existing(path: &Path) -> Option<&Path> {
    path.ancestors()
        .find(|candidate| !candidate.as_os_str().is_empty() && candidate.exists())
        .or_else(|| path.is_relative().then_some(Path::new(".")))
}
