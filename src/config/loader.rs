//! Configuration loading and merging
//!
//! Priority order (later sources override earlier ones):
//! 1. Built-in defaults
//! 2. `installer.yaml` at the payload source root (if it exists)
//! 3. An explicit `--config` file (must exist)

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use super::{CONFIG_FILE_NAME, InstallerConfig};
use crate::error::{Result, config};

/// Installer configuration loader
pub struct ConfigLoader {
    source_root: PathBuf,
    explicit: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader for a payload source root
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            explicit: None,
        }
    }

    /// Add an explicit configuration file that overrides everything else
    pub fn with_explicit(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    /// Load and merge all configuration sources
    pub fn load(&self) -> Result<InstallerConfig> {
        let mut merged = serde_yaml::to_value(InstallerConfig::default())
            .map_err(|e| config::parse_failed("<defaults>", e.to_string()))?;

        let payload_config = self.source_root.join(CONFIG_FILE_NAME);
        if payload_config.is_file() {
            tracing::debug!(path = %payload_config.display(), "loading payload configuration");
            merge_values(&mut merged, read_yaml(&payload_config)?);
        }

        if let Some(explicit) = &self.explicit {
            tracing::debug!(path = %explicit.display(), "loading explicit configuration");
            merge_values(&mut merged, read_yaml(explicit)?);
        }

        serde_yaml::from_value(merged).map_err(|e| config::parse_failed("<merged>", e.to_string()))
    }
}

fn read_yaml(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| config::read_failed(path.display().to_string(), e.to_string()))?;

    if content.trim().is_empty() {
        return Ok(Value::Null);
    }

    let value: Value = serde_yaml::from_str(&content)
        .map_err(|e| config::parse_failed(path.display().to_string(), e.to_string()))?;

    match value {
        Value::Mapping(_) | Value::Null => Ok(value),
        _ => Err(config::parse_failed(
            path.display().to_string(),
            "expected a mapping at the top level",
        )),
    }
}

/// Recursively overlay `overlay` onto `base`; mappings merge, everything else replaces
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
