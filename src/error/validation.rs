//! Validation errors

use std::path::Path;

use super::InstallerError;

/// Creates a declined non-standard path error
pub fn declined_path(path: &Path) -> InstallerError {
    InstallerError::UserDeclinedNonStandardPath {
        path: path.display().to_string(),
    }
}

/// Creates an unknown component error
pub fn unknown_component(name: impl Into<String>) -> InstallerError {
    InstallerError::UnknownComponent { name: name.into() }
}
