//! Host platform conventions
//!
//! This module handles:
//! - Which operating system family the installer runs on
//! - Recommended system prefixes and whether a path lies under one
//! - The default install path per platform
//! - Startup checks for privileges and existing installations (via detection module)

use std::path::{Component as PathComponent, Path, PathBuf};

use crate::config::InstallerConfig;

pub mod detection;

pub use detection::{HostCheck, SystemCheck};

/// Operating system family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl PlatformKind {
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            PlatformKind::Linux
        } else if cfg!(target_os = "macos") {
            PlatformKind::MacOs
        } else if cfg!(windows) {
            PlatformKind::Windows
        } else {
            PlatformKind::Other
        }
    }
}

/// The platform the installer targets, with its path conventions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPlatform {
    pub kind: PlatformKind,
    /// Recommended prefixes; empty when the platform has no convention
    pub system_prefixes: Vec<PathBuf>,
}

impl HostPlatform {
    /// Platform for the running process
    pub fn current(config: &InstallerConfig) -> Self {
        Self::for_kind(PlatformKind::current(), config)
    }

    /// Only Linux carries a system-path convention
    pub fn for_kind(kind: PlatformKind, config: &InstallerConfig) -> Self {
        let system_prefixes = match kind {
            PlatformKind::Linux => config.system_prefixes.clone(),
            _ => Vec::new(),
        };
        Self {
            kind,
            system_prefixes,
        }
    }

    pub fn has_system_convention(&self) -> bool {
        !self.system_prefixes.is_empty()
    }

    /// True when `path` lies under one of the recommended system prefixes
    pub fn is_system_path(&self, path: &Path) -> bool {
        let normalized = lexical_normalize(path);
        self.system_prefixes
            .iter()
            .any(|prefix| normalized.starts_with(prefix))
    }

    /// Default destination: the configured override, else `/usr/local` on Linux,
    /// else `<home>/GooeyFramework`
    pub fn default_install_path(&self, config: &InstallerConfig) -> PathBuf {
        if let Some(path) = &config.default_install_path {
            return path.clone();
        }
        if self.kind == PlatformKind::Linux {
            return PathBuf::from("/usr/local");
        }
        dirs::home_dir()
            .unwrap_or_default()
            .join(config.product_name.replace(' ', ""))
    }

    pub fn requires_elevation(&self, config: &InstallerConfig) -> bool {
        self.kind == PlatformKind::Linux && config.require_elevation
    }
}

/// Resolve `.` and `..` without touching the filesystem
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            PathComponent::CurDir => {}
            PathComponent::ParentDir => {
                if !out.pop() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
