//! Error types and handling for the installer
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`validation`]: Install destination and component selection errors
//! - [`fs`]: File system errors raised while probing, copying or linking
//! - [`config`]: Installer configuration errors
//!
//! The `Display` text of the validation variants doubles as the status line the
//! wizard shows when a transition is blocked.

pub mod config;
pub mod fs;
pub mod validation;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for installer operations
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum InstallerError {
    // Validation errors
    #[error("Please select an installation path")]
    #[diagnostic(
        code(gooey_installer::validation::empty_path),
        help("Pass --path or type a directory on the options page")
    )]
    EmptyPath,

    #[error("Please select at least the GUI components to install")]
    #[diagnostic(
        code(gooey_installer::validation::missing_component),
        help("The gui component carries the library and headers; nothing else installs without it")
    )]
    MissingRequiredComponent,

    #[error("Installation path {path} is outside the recommended system paths")]
    #[diagnostic(
        code(gooey_installer::validation::declined_path),
        help("Use /usr/local or /usr, or confirm the custom path when asked")
    )]
    UserDeclinedNonStandardPath { path: String },

    #[error("Unknown component: {name}")]
    #[diagnostic(
        code(gooey_installer::validation::unknown_component),
        help("Valid components: gui, docs, examples")
    )]
    UnknownComponent { name: String },

    #[error("You must accept the terms and conditions to continue")]
    #[diagnostic(code(gooey_installer::validation::terms))]
    TermsNotAccepted,

    // File system errors
    #[error("Cannot write to directory {path}: {reason}")]
    #[diagnostic(
        code(gooey_installer::fs::unwritable),
        help("Choose a writable directory or run the installer with sudo")
    )]
    Unwritable { path: String, reason: String },

    #[error("Permission denied: {path}")]
    #[diagnostic(
        code(gooey_installer::fs::permission_denied),
        help("Try running the installer with sudo for system directory installation")
    )]
    PermissionDenied { path: String },

    #[error("Failed to create directory {path}: {reason}")]
    #[diagnostic(code(gooey_installer::fs::create_dir_failed))]
    DirectoryCreationFailed { path: String, reason: String },

    #[error("Error copying {path}: {reason}")]
    #[diagnostic(code(gooey_installer::fs::copy_failed))]
    FileCopyFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(gooey_installer::fs::io_error))]
    IoError { message: String },

    // Soft configuration errors
    #[error("Could not update shell profile {path}: {reason}")]
    #[diagnostic(
        code(gooey_installer::profile::link_failed),
        help("Add the GOOEY_PATH exports to your shell profile by hand")
    )]
    ProfileLinkFailed { path: String, reason: String },

    // Configuration errors
    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(gooey_installer::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(
        code(gooey_installer::config::parse_failed),
        help("installer.yaml must be a YAML mapping of known settings")
    )]
    ConfigParseFailed { path: String, reason: String },

    #[error("Unknown shell: {name}")]
    #[diagnostic(
        code(gooey_installer::cli::unknown_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnknownShell { name: String },

    #[error("Payload directory not found: {path}")]
    #[diagnostic(
        code(gooey_installer::cli::source_not_found),
        help("Pass --source pointing at the directory that holds lib/, include/, docs/ and examples/")
    )]
    SourceNotFound { path: String },

    // Prompt errors
    #[error("Prompt failed: {message}")]
    #[diagnostic(code(gooey_installer::prompt::failed))]
    PromptFailed { message: String },

    #[error("A guard blocked the wizard on page {page}: {reason}")]
    #[diagnostic(
        code(gooey_installer::wizard::blocked),
        help("Non-interactive runs need every choice on the command line (--path, --component, --accept-terms)")
    )]
    WizardBlocked { page: String, reason: String },
}

impl InstallerError {
    /// Validation failures block a transition but leave the session intact
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            InstallerError::EmptyPath
                | InstallerError::MissingRequiredComponent
                | InstallerError::UserDeclinedNonStandardPath { .. }
                | InstallerError::UnknownComponent { .. }
                | InstallerError::TermsNotAccepted
        )
    }
}

impl From<std::io::Error> for InstallerError {
    fn from(err: std::io::Error) -> Self {
        InstallerError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for InstallerError {
    fn from(err: inquire::InquireError) -> Self {
        InstallerError::PromptFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, InstallerError>;

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_error_contains {
        ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
            #[test]
            fn $test_name() {
                let err = $err;
                let error_string = err.to_string();
                $(
                    assert!(error_string.contains($contains),
                        "Error message should contain '{}', got: {}",
                        $contains,
                        error_string
                    );
                )+
            }
        };
    }

    #[test]
    fn test_error_code() {
        let err = InstallerError::EmptyPath;
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("gooey_installer::validation::empty_path".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: InstallerError = io_err.into();
        assert!(matches!(err, InstallerError::IoError { .. }));
    }

    #[test]
    fn test_validation_errors_are_recoverable() {
        assert!(InstallerError::EmptyPath.is_recoverable());
        assert!(InstallerError::MissingRequiredComponent.is_recoverable());
        assert!(InstallerError::TermsNotAccepted.is_recoverable());
        assert!(
            !InstallerError::PermissionDenied {
                path: "/usr/local/lib".to_string()
            }
            .is_recoverable()
        );
    }

    test_error_contains!(
        test_empty_path_message,
        InstallerError::EmptyPath,
        "select an installation path"
    );

    test_error_contains!(
        test_terms_message,
        InstallerError::TermsNotAccepted,
        "accept the terms and conditions"
    );

    test_error_contains!(
        test_unwritable_message,
        fs::unwritable("/opt/gooey", "Permission denied (os error 13)"),
        "Cannot write to directory /opt/gooey",
        "os error 13"
    );

    test_error_contains!(
        test_config_parse_message,
        config::parse_failed("installer.yaml", "invalid type"),
        "installer.yaml",
        "invalid type"
    );

    #[test]
    fn test_unknown_component() {
        let err = validation::unknown_component("plugins");
        assert!(matches!(err, InstallerError::UnknownComponent { .. }));
        assert!(err.to_string().contains("plugins"));
        assert!(err.is_recoverable());
    }
}
