//! Messages the installation worker publishes to the wizard

use std::fmt;
use std::path::PathBuf;

/// Steps shown in the install page's indicator list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallStep {
    CopyLibraries,
    CopyComponents,
    SecondaryTool,
    LinkEnvironment,
    Finalize,
}

impl InstallStep {
    pub const ALL: [InstallStep; 5] = [
        InstallStep::CopyLibraries,
        InstallStep::CopyComponents,
        InstallStep::SecondaryTool,
        InstallStep::LinkEnvironment,
        InstallStep::Finalize,
    ];

    pub fn label(self) -> &'static str {
        match self {
            InstallStep::CopyLibraries => "Copying library files",
            InstallStep::CopyComponents => "Installing selected components",
            InstallStep::SecondaryTool => "Installing PicoFlasher",
            InstallStep::LinkEnvironment => "Updating shell profile",
            InstallStep::Finalize => "Finalizing installation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Running,
    Done,
    Skipped,
    Failed,
}

/// Terminal result of one worker run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Success,
    FileCopyFailure(String),
    PermissionDenied(PathBuf),
    SecondaryStepFailure(String),
}

impl InstallOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InstallOutcome::Success)
    }

    /// Status line left on screen when the run ends
    pub fn status(&self) -> String {
        match self {
            InstallOutcome::Success => "Installation completed successfully!".to_string(),
            InstallOutcome::FileCopyFailure(reason) => format!("Installation failed: {reason}"),
            InstallOutcome::PermissionDenied(path) => format!(
                "Permission denied: {}. Try running the installer with sudo for system directory installation.",
                path.display()
            ),
            InstallOutcome::SecondaryStepFailure(reason) => {
                format!("PicoFlasher installation failed: {reason}")
            }
        }
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status())
    }
}

pub enum InstallerEvent {
    Status(String),
    Progress(u8),
    Step { step: InstallStep, status: StepStatus },
    Finished(InstallOutcome),
    /// The run is over and navigation may resume; always the last event of a run
    Released,
}
