//! Command helper utilities

use std::collections::BTreeSet;
use std::path::PathBuf;

use normpath::PathExt;

use crate::cli::ComponentArgs;
use crate::config::{ConfigLoader, InstallerConfig};
use crate::error::{InstallerError, Result};
use crate::platform::HostPlatform;
use crate::session::{Component, parse_components};

/// Configuration, platform and payload location shared by the commands
pub struct InstallerContext {
    pub config: InstallerConfig,
    pub platform: HostPlatform,
    pub source_root: PathBuf,
}

impl InstallerContext {
    pub fn load(source: Option<PathBuf>, config_file: Option<PathBuf>) -> Result<Self> {
        let source_root = resolve_source(source)?;
        let config = ConfigLoader::new(&source_root)
            .with_explicit(config_file)
            .load()?;
        let platform = HostPlatform::current(&config);
        tracing::debug!(
            source = %source_root.display(),
            platform = ?platform.kind,
            "installer context loaded"
        );
        Ok(Self {
            config,
            platform,
            source_root,
        })
    }

    /// The given path, or the platform default
    pub fn install_path(&self, path: Option<String>) -> String {
        path.unwrap_or_else(|| {
            self.platform
                .default_install_path(&self.config)
                .display()
                .to_string()
        })
    }
}

/// Payload root: the given directory, else the directory holding the installer binary
pub fn resolve_source(source: Option<PathBuf>) -> Result<PathBuf> {
    let root = match source {
        Some(path) => path,
        None => installer_dir()?,
    };

    if !root.is_dir() {
        return Err(InstallerError::SourceNotFound {
            path: root.display().to_string(),
        });
    }

    Ok(root
        .normalize()
        .map(|np| np.into_path_buf())
        .unwrap_or(root))
}

fn installer_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    match exe.parent() {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Ok(std::env::current_dir()?),
    }
}

/// Components named on the command line, or `fallback` when none were given
pub fn selected_components(
    args: &ComponentArgs,
    fallback: &[Component],
) -> Result<BTreeSet<Component>> {
    if args.components.is_empty() {
        return Ok(fallback.iter().copied().collect());
    }
    parse_components(&args.components)
}
