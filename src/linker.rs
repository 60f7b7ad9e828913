//! Shell profile linking
//!
//! Appends the install-path exports to the first existing shell profile. The profile is only
//! ever appended to; a profile that already exports the same path is left byte-identical.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::InstallerConfig;
use crate::error::{Result, fs as fs_error};

/// Characters that keep their meaning inside a double-quoted shell string
const SHELL_ACTIVE: [char; 4] = ['"', '$', '`', '\\'];

/// What a link attempt did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkResult {
    /// The user opted out
    Disabled,
    /// None of the candidate profiles exist
    NoProfile,
    /// The export was already present
    AlreadyLinked(PathBuf),
    /// The block was appended to this profile
    Appended(PathBuf),
}

impl LinkResult {
    /// Status line shown after the link phase
    pub fn status(&self) -> String {
        match self {
            LinkResult::Disabled => "Shell profile update skipped".to_string(),
            LinkResult::NoProfile => "No shell profile found - skipping profile linking".to_string(),
            LinkResult::AlreadyLinked(path) => {
                format!("Shell profile {} already configured", path.display())
            }
            LinkResult::Appended(path) => format!("Updated shell profile {}", path.display()),
        }
    }
}

/// Builder for the appended profile block, one logical line per push
#[derive(Debug, Default)]
struct ProfileBlock {
    lines: Vec<String>,
}

impl ProfileBlock {
    fn push(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    fn build(&self) -> io::Result<String> {
        if let Some(i) = self
            .lines
            .iter()
            .position(|l| l.contains('\n') || l.contains('\r') || l.contains('\0'))
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("profile line {i} contains a newline or NUL"),
            ));
        }

        let mut out = self.lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        Ok(out)
    }
}

/// Links an install path into the user's shell profile
#[derive(Debug, Clone)]
pub struct EnvironmentLinker {
    env_var: String,
    header: String,
    candidates: Vec<PathBuf>,
}

impl EnvironmentLinker {
    /// Candidates resolved against the user's home directory
    pub fn new(config: &InstallerConfig) -> Self {
        let candidates = dirs::home_dir()
            .map(|home| config.profile_paths(&home))
            .unwrap_or_default();
        Self::with_candidates(config, candidates)
    }

    pub fn with_candidates(config: &InstallerConfig, candidates: Vec<PathBuf>) -> Self {
        Self {
            env_var: config.env_var.clone(),
            header: format!("# {} Installation Path", config.product_name),
            candidates,
        }
    }

    /// First candidate that exists
    pub fn profile(&self) -> Option<&Path> {
        self.candidates
            .iter()
            .map(PathBuf::as_path)
            .find(|p| p.is_file())
    }

    /// The assignment whose presence marks a profile as linked.
    ///
    /// Paths holding characters that stay active inside double quotes are refused.
    pub fn export_line(&self, install_path: &Path) -> io::Result<String> {
        let path = install_path.display().to_string();
        if let Some(c) = path.chars().find(|c| SHELL_ACTIVE.contains(c)) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("install path contains {c:?}, which the shell would expand"),
            ));
        }
        Ok(format!("export {}=\"{path}\"", self.env_var))
    }

    /// Append the exports for `install_path` unless disabled or already present
    pub fn link(&self, install_path: &Path, enabled: bool) -> Result<LinkResult> {
        if !enabled {
            return Ok(LinkResult::Disabled);
        }

        let Some(profile) = self.profile() else {
            tracing::info!("no shell profile found, skipping profile linking");
            return Ok(LinkResult::NoProfile);
        };

        let export = self
            .export_line(install_path)
            .map_err(|e| fs_error::profile_link_failed(profile, &e))?;
        let existing =
            fs::read_to_string(profile).map_err(|e| fs_error::profile_link_failed(profile, &e))?;
        if existing.contains(&export) {
            tracing::debug!(profile = %profile.display(), "profile already linked");
            return Ok(LinkResult::AlreadyLinked(profile.to_path_buf()));
        }

        let block = self
            .block(&export)
            .map_err(|e| fs_error::profile_link_failed(profile, &e))?;
        let mut file = OpenOptions::new()
            .append(true)
            .open(profile)
            .map_err(|e| fs_error::profile_link_failed(profile, &e))?;
        // Leading newline starts the block on its own line and leaves one blank line
        // when the profile already ends with a newline
        file.write_all(format!("\n{block}").as_bytes())
            .map_err(|e| fs_error::profile_link_failed(profile, &e))?;

        tracing::info!(profile = %profile.display(), "appended {} export", self.env_var);
        Ok(LinkResult::Appended(profile.to_path_buf()))
    }

    fn block(&self, export: &str) -> io::Result<String> {
        let var = &self.env_var;
        ProfileBlock::default()
            .push(self.header.as_str())
            .push(export)
            .push(format!("export PATH=\"${var}/bin:$PATH\""))
            .push(format!("export LD_LIBRARY_PATH=\"${var}/lib:$LD_LIBRARY_PATH\""))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InstallerError;
    use tempfile::TempDir;

    fn linker(home: &Path) -> EnvironmentLinker {
        let config = InstallerConfig::default();
        EnvironmentLinker::with_candidates(&config, config.profile_paths(home))
    }

    #[test]
    fn test_disabled_is_noop() {
        let home = TempDir::new().unwrap();
        fs::write(home.path().join(".bashrc"), "alias ll='ls -l'\n").unwrap();

        let result = linker(home.path()).link(Path::new("/opt/gooey"), false).unwrap();
        assert_eq!(result, LinkResult::Disabled);
        assert_eq!(
            fs::read_to_string(home.path().join(".bashrc")).unwrap(),
            "alias ll='ls -l'\n"
        );
    }

    #[test]
    fn test_missing_profile_is_success() {
        let home = TempDir::new().unwrap();
        let result = linker(home.path()).link(Path::new("/opt/gooey"), true).unwrap();
        assert_eq!(result, LinkResult::NoProfile);
        assert!(result.status().contains("No shell profile found"));
    }

    #[test]
    fn test_appends_block_to_first_existing_profile() {
        let home = TempDir::new().unwrap();
        fs::write(home.path().join(".profile"), "umask 022\n").unwrap();
        fs::write(home.path().join(".bash_profile"), "source ~/.profile\n").unwrap();

        let result = linker(home.path()).link(Path::new("/opt/gooey"), true).unwrap();
        assert_eq!(result, LinkResult::Appended(home.path().join(".bash_profile")));

        let content = fs::read_to_string(home.path().join(".bash_profile")).unwrap();
        assert_eq!(
            content,
            "source ~/.profile\n\n\
             # Gooey Framework Installation Path\n\
             export GOOEY_PATH=\"/opt/gooey\"\n\
             export PATH=\"$GOOEY_PATH/bin:$PATH\"\n\
             export LD_LIBRARY_PATH=\"$GOOEY_PATH/lib:$LD_LIBRARY_PATH\"\n"
        );
        assert_eq!(
            fs::read_to_string(home.path().join(".profile")).unwrap(),
            "umask 022\n"
        );
    }

    #[test]
    fn test_link_is_idempotent() {
        let home = TempDir::new().unwrap();
        let bashrc = home.path().join(".bashrc");
        fs::write(&bashrc, "export EDITOR=vim\n").unwrap();
        let linker = linker(home.path());

        linker.link(Path::new("/opt/gooey"), true).unwrap();
        let after_first = fs::read(&bashrc).unwrap();
        let second = linker.link(Path::new("/opt/gooey"), true).unwrap();
        let after_second = fs::read(&bashrc).unwrap();

        assert_eq!(second, LinkResult::AlreadyLinked(bashrc.clone()));
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn test_different_path_appends_again() {
        let home = TempDir::new().unwrap();
        let bashrc = home.path().join(".bashrc");
        fs::write(&bashrc, "").unwrap();
        let linker = linker(home.path());

        linker.link(Path::new("/opt/gooey"), true).unwrap();
        linker.link(Path::new("/srv/gooey"), true).unwrap();

        let content = fs::read_to_string(&bashrc).unwrap();
        assert!(content.contains("export GOOEY_PATH=\"/opt/gooey\""));
        assert!(content.contains("export GOOEY_PATH=\"/srv/gooey\""));
    }

    #[test]
    fn test_newline_in_path_is_soft_failure() {
        let home = TempDir::new().unwrap();
        let bashrc = home.path().join(".bashrc");
        fs::write(&bashrc, "export EDITOR=vim\n").unwrap();

        let result = linker(home.path()).link(Path::new("/opt/evil\nrm -rf ~"), true);
        assert!(matches!(result, Err(InstallerError::ProfileLinkFailed { .. })));
        assert_eq!(fs::read_to_string(&bashrc).unwrap(), "export EDITOR=vim\n");
    }

    #[test]
    fn test_shell_active_path_is_soft_failure() {
        let home = TempDir::new().unwrap();
        let bashrc = home.path().join(".bashrc");
        fs::write(&bashrc, "export EDITOR=vim\n").unwrap();
        let linker = linker(home.path());

        for path in [
            "/tmp/a\"; touch /tmp/gooey-linked; \"b",
            "/opt/$HOME/gooey",
            "/opt/`id`/gooey",
            "/opt/gooey\\",
        ] {
            let result = linker.link(Path::new(path), true);
            assert!(
                matches!(result, Err(InstallerError::ProfileLinkFailed { .. })),
                "{path} should be refused"
            );
        }
        assert_eq!(fs::read_to_string(&bashrc).unwrap(), "export EDITOR=vim\n");
    }

    #[test]
    fn test_export_line_quotes_plain_paths() {
        let home = TempDir::new().unwrap();
        let line = linker(home.path())
            .export_line(Path::new("/opt/Gooey Framework"))
            .unwrap();
        assert_eq!(line, "export GOOEY_PATH=\"/opt/Gooey Framework\"");
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_profile_is_soft_failure() {
        use std::os::unix::fs::PermissionsExt;

        if crate::platform::detection::is_elevated() {
            return;
        }

        let home = TempDir::new().unwrap();
        let bashrc = home.path().join(".bashrc");
        fs::write(&bashrc, "").unwrap();
        fs::set_permissions(&bashrc, fs::Permissions::from_mode(0o444)).unwrap();

        let result = linker(home.path()).link(Path::new("/opt/gooey"), true);
        assert!(matches!(result, Err(InstallerError::ProfileLinkFailed { .. })));
    }
}
