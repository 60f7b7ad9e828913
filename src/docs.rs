//! Opening the installed documentation

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use walkdir::WalkDir;

/// Preferred entry page of the HTML docs
const ENTRY_PAGE: &str = "files.html";

/// `files.html` if present, else the first `*.html` by name
pub fn find_entry_page(docs_dir: &Path) -> Option<PathBuf> {
    let preferred = docs_dir.join(ENTRY_PAGE);
    if preferred.is_file() {
        return Some(preferred);
    }

    WalkDir::new(docs_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .find(|e| e.path().extension().is_some_and(|ext| ext == "html"))
        .map(|e| e.into_path())
}

/// Open the docs with `open` and return the status line to show
pub fn launch_documentation<F>(docs_dir: &Path, open: F) -> String
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    if !docs_dir.is_dir() {
        return "Documentation not installed".to_string();
    }

    let Some(entry) = find_entry_page(docs_dir) else {
        return "No HTML documentation files found".to_string();
    };

    match open(&entry) {
        Ok(()) => {
            tracing::info!(page = %entry.display(), "opened documentation");
            "Documentation launched successfully!".to_string()
        }
        Err(e) => {
            tracing::warn!(page = %entry.display(), error = %e, "could not open documentation");
            format!("Error launching documentation: {e}")
        }
    }
}

/// Hand a file to the desktop's default opener without waiting for it
pub fn open_with_system(path: &Path) -> io::Result<()> {
    let mut command = opener_command(path);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}

#[cfg(target_os = "macos")]
fn opener_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(windows)]
fn opener_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(not(any(target_os = "macos", windows)))]
fn opener_command(path: &Path) -> Command {
    // Under sudo, open the browser as the invoking user rather than root
    match std::env::var("SUDO_USER") {
        Ok(user) if !user.is_empty() => {
            let mut command = Command::new("sudo");
            command.args(["-u", &user, "xdg-open"]).arg(path);
            command
        }
        _ => {
            let mut command = Command::new("xdg-open");
            command.arg(path);
            command
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_prefers_files_html() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("annotated.html"), "").unwrap();
        fs::write(temp.path().join("files.html"), "").unwrap();
        assert_eq!(
            find_entry_page(temp.path()),
            Some(temp.path().join("files.html"))
        );
    }

    #[test]
    fn test_falls_back_to_first_html() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("index.html"), "").unwrap();
        fs::write(temp.path().join("classes.html"), "").unwrap();
        fs::write(temp.path().join("a.css"), "").unwrap();
        assert_eq!(
            find_entry_page(temp.path()),
            Some(temp.path().join("classes.html"))
        );
    }

    #[test]
    fn test_launch_statuses() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("docs");
        assert_eq!(
            launch_documentation(&missing, |_| Ok(())),
            "Documentation not installed"
        );

        fs::create_dir(&missing).unwrap();
        assert_eq!(
            launch_documentation(&missing, |_| Ok(())),
            "No HTML documentation files found"
        );

        fs::write(missing.join("files.html"), "").unwrap();
        let mut opened = None;
        let status = launch_documentation(&missing, |p| {
            opened = Some(p.to_path_buf());
            Ok(())
        });
        assert_eq!(status, "Documentation launched successfully!");
        assert_eq!(opened, Some(missing.join("files.html")));

        let status = launch_documentation(&missing, |_| {
            Err(io::Error::new(io::ErrorKind::NotFound, "xdg-open missing"))
        });
        assert!(status.starts_with("Error launching documentation"));
    }
}
