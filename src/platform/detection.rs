//! Startup checks that pick the wizard's first page

use std::path::PathBuf;

use super::HostPlatform;
use crate::config::InstallerConfig;

/// Environment variable that lets non-root users run the installer locally
pub const ALLOW_NONROOT_ENV: &str = "GOOEY_INSTALLER_ALLOW_NONROOT";

/// Host facts the wizard consults before showing its first page
pub trait SystemCheck {
    /// True when the platform requires elevation and the process does not have it
    fn lacks_required_privileges(&self) -> bool;

    /// First marker of a previous installation, if any
    fn existing_installation(&self) -> Option<PathBuf>;
}

/// Check backed by the real process and filesystem
pub struct HostCheck {
    requires_elevation: bool,
    allow_nonroot: bool,
    markers: Vec<PathBuf>,
}

impl HostCheck {
    pub fn new(platform: &HostPlatform, config: &InstallerConfig) -> Self {
        Self {
            requires_elevation: platform.requires_elevation(config),
            allow_nonroot: std::env::var(ALLOW_NONROOT_ENV).ok().as_deref() == Some("1"),
            markers: config.existing_install_markers.clone(),
        }
    }
}

impl SystemCheck for HostCheck {
    fn lacks_required_privileges(&self) -> bool {
        self.requires_elevation && !self.allow_nonroot && !is_elevated()
    }

    fn existing_installation(&self) -> Option<PathBuf> {
        self.markers.iter().find(|marker| marker.exists()).cloned()
    }
}

/// Whether the process runs with administrative rights
#[cfg(unix)]
pub fn is_elevated() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Whether the process runs with administrative rights
#[cfg(not(unix))]
pub fn is_elevated() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformKind;
    use tempfile::TempDir;

    #[test]
    fn test_existing_installation_finds_first_marker() {
        let temp = TempDir::new().unwrap();
        let header_dir = temp.path().join("include/Gooey");
        std::fs::create_dir_all(&header_dir).unwrap();

        let config = InstallerConfig {
            existing_install_markers: vec![temp.path().join("lib/libGooeyGUI.so"), header_dir.clone()],
            ..InstallerConfig::default()
        };
        let check = HostCheck::new(
            &HostPlatform::for_kind(PlatformKind::Linux, &config),
            &config,
        );
        assert_eq!(check.existing_installation(), Some(header_dir));
    }

    #[test]
    fn test_no_markers_means_fresh_install() {
        let temp = TempDir::new().unwrap();
        let config = InstallerConfig {
            existing_install_markers: vec![temp.path().join("missing")],
            ..InstallerConfig::default()
        };
        let check = HostCheck::new(
            &HostPlatform::for_kind(PlatformKind::Linux, &config),
            &config,
        );
        assert_eq!(check.existing_installation(), None);
    }

    #[test]
    fn test_privileges_not_needed_without_requirement() {
        let config = InstallerConfig {
            require_elevation: false,
            ..InstallerConfig::default()
        };
        let check = HostCheck::new(
            &HostPlatform::for_kind(PlatformKind::Linux, &config),
            &config,
        );
        assert!(!check.lacks_required_privileges());
    }

    #[test]
    fn test_privileges_not_needed_off_linux() {
        let config = InstallerConfig::default();
        let check = HostCheck::new(
            &HostPlatform::for_kind(PlatformKind::Windows, &config),
            &config,
        );
        assert!(!check.lacks_required_privileges());
    }
}
