//! Installer configuration
//!
//! Every constant the installer relies on (paths, extensions, profile files, pacing) lives in
//! [`InstallerConfig`]. The built-in defaults describe the Gooey Framework payload; an
//! `installer.yaml` next to the payload, or one passed with `--config`, overrides any subset.

mod loader;

pub use loader::ConfigLoader;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// File name looked up at the payload source root
pub const CONFIG_FILE_NAME: &str = "installer.yaml";

/// Fixed destinations used when installing under a system prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemLayout {
    pub lib_dir: PathBuf,
    pub include_dir: PathBuf,
    pub docs_dir: PathBuf,
}

impl Default for SystemLayout {
    fn default() -> Self {
        Self {
            lib_dir: PathBuf::from("/usr/local/lib"),
            include_dir: PathBuf::from("/usr/local/include/Gooey"),
            docs_dir: PathBuf::from("/usr/local/GooeyDocs"),
        }
    }
}

/// Cosmetic delays between worker phases, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    pub prepare_ms: u64,
    pub per_file_ms: u64,
    pub secondary_tool_ms: u64,
    pub finalize_tick_ms: u64,
    pub finalize_ticks: u32,
}

impl Pacing {
    /// No delays at all
    #[cfg(test)]
    pub fn none() -> Self {
        Self {
            prepare_ms: 0,
            per_file_ms: 0,
            secondary_tool_ms: 0,
            finalize_tick_ms: 0,
            finalize_ticks: 0,
        }
    }

    pub fn prepare(&self) -> Duration {
        Duration::from_millis(self.prepare_ms)
    }

    pub fn per_file(&self) -> Duration {
        Duration::from_millis(self.per_file_ms)
    }

    pub fn secondary_tool(&self) -> Duration {
        Duration::from_millis(self.secondary_tool_ms)
    }

    pub fn finalize_tick(&self) -> Duration {
        Duration::from_millis(self.finalize_tick_ms)
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            prepare_ms: 1000,
            per_file_ms: 50,
            secondary_tool_ms: 1000,
            finalize_tick_ms: 200,
            finalize_ticks: 20,
        }
    }
}

/// Installer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    pub product_name: String,
    pub product_version: String,
    /// Namespace directory for headers under a custom install path
    pub namespace: String,
    /// Variable exported into the shell profile
    pub env_var: String,
    /// Recommended system prefixes (honoured on Linux only)
    pub system_prefixes: Vec<PathBuf>,
    pub system_layout: SystemLayout,
    /// Overrides the per-platform default install path
    pub default_install_path: Option<PathBuf>,
    /// Whether Linux installs need root
    pub require_elevation: bool,
    /// Shell profiles relative to the home directory, first existing one wins
    pub profile_candidates: Vec<PathBuf>,
    pub library_extensions: Vec<String>,
    pub header_extensions: Vec<String>,
    /// Glob patterns over example file names
    pub example_patterns: Vec<String>,
    /// Paths whose presence means the framework is already installed
    pub existing_install_markers: Vec<PathBuf>,
    pub pacing: Pacing,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            product_name: "Gooey Framework".to_string(),
            product_version: "1.0.3".to_string(),
            namespace: "Gooey".to_string(),
            env_var: "GOOEY_PATH".to_string(),
            system_prefixes: vec![PathBuf::from("/usr"), PathBuf::from("/usr/local")],
            system_layout: SystemLayout::default(),
            default_install_path: None,
            require_elevation: true,
            profile_candidates: vec![
                PathBuf::from(".bashrc"),
                PathBuf::from(".bash_profile"),
                PathBuf::from(".profile"),
            ],
            library_extensions: ["so", "dll", "dylib", "a"].map(String::from).to_vec(),
            header_extensions: ["h", "hpp"].map(String::from).to_vec(),
            example_patterns: [
                "*.c",
                "*.cpp",
                "*.h",
                "*.hpp",
                "*.py",
                "Makefile",
                "CMakeLists.txt",
            ]
            .map(String::from)
            .to_vec(),
            existing_install_markers: vec![
                PathBuf::from("/usr/local/include/Gooey"),
                PathBuf::from("/usr/local/lib/libGooeyGUI.so"),
                PathBuf::from("/usr/lib/libGooeyGUI.so"),
            ],
            pacing: Pacing::default(),
        }
    }
}

impl InstallerConfig {
    /// Resolve profile candidates against a home directory
    pub fn profile_paths(&self, home: &std::path::Path) -> Vec<PathBuf> {
        self.profile_candidates
            .iter()
            .map(|candidate| home.join(candidate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_gooey_payload() {
        let config = InstallerConfig::default();
        assert_eq!(config.env_var, "GOOEY_PATH");
        assert_eq!(config.namespace, "Gooey");
        assert!(config.library_extensions.contains(&"dylib".to_string()));
        assert!(config.example_patterns.contains(&"CMakeLists.txt".to_string()));
        assert_eq!(config.pacing.finalize_ticks, 20);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "namespace: Widgets\npacing:\n  per_file_ms: 0\n";
        let config: InstallerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.namespace, "Widgets");
        assert_eq!(config.pacing.per_file_ms, 0);
        assert_eq!(config.pacing.prepare_ms, 1000);
        assert_eq!(config.env_var, "GOOEY_PATH");
    }

    #[test]
    fn test_profile_paths_resolve_against_home() {
        let config = InstallerConfig::default();
        let paths = config.profile_paths(std::path::Path::new("/home/dev"));
        assert_eq!(paths[0], PathBuf::from("/home/dev/.bashrc"));
        assert_eq!(paths[2], PathBuf::from("/home/dev/.profile"));
    }

    #[test]
    fn test_pacing_none_has_no_delays() {
        let pacing = Pacing::none();
        assert_eq!(pacing.prepare(), Duration::ZERO);
        assert_eq!(pacing.finalize_ticks, 0);
    }
}
