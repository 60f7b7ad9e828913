//! File system errors

use std::io;
use std::path::Path;

use super::InstallerError;

/// Creates an unwritable destination error
pub fn unwritable(path: impl Into<String>, reason: impl Into<String>) -> InstallerError {
    InstallerError::Unwritable {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a permission denied error
pub fn permission_denied(path: impl Into<String>) -> InstallerError {
    InstallerError::PermissionDenied { path: path.into() }
}

/// Classifies a failed directory creation
pub fn create_dir_failed(path: &Path, err: &io::Error) -> InstallerError {
    if err.kind() == io::ErrorKind::PermissionDenied {
        return permission_denied(path.display().to_string());
    }
    InstallerError::DirectoryCreationFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Classifies a failed file copy
pub fn copy_failed(path: &Path, err: &io::Error) -> InstallerError {
    if err.kind() == io::ErrorKind::PermissionDenied {
        return permission_denied(path.display().to_string());
    }
    InstallerError::FileCopyFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Creates a shell profile linking error
pub fn profile_link_failed(path: &Path, err: &io::Error) -> InstallerError {
    InstallerError::ProfileLinkFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
