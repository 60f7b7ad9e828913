//! Filesystem side of the copy phase

use std::fs;
use std::io;
use std::path::Path;

/// Directory creation and file copy, swappable in tests
pub trait FileCopier: Send + Sync {
    /// Create `dir` and its parents; an existing directory is fine
    fn ensure_dir(&self, dir: &Path) -> io::Result<()>;

    /// Copy one file, keeping permissions and modification time where possible
    fn copy(&self, source: &Path, destination: &Path) -> io::Result<()>;
}

/// Copies through the real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsCopier;

impl FileCopier for FsCopier {
    fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }

    fn copy(&self, source: &Path, destination: &Path) -> io::Result<()> {
        // fs::copy carries the permission bits over
        fs::copy(source, destination)?;
        if let Err(e) = preserve_modified_time(source, destination) {
            tracing::debug!(
                file = %destination.display(),
                error = %e,
                "could not preserve modification time"
            );
        }
        Ok(())
    }
}

fn preserve_modified_time(source: &Path, destination: &Path) -> io::Result<()> {
    let modified = fs::metadata(source)?.modified()?;
    fs::File::options()
        .write(true)
        .open(destination)?
        .set_modified(modified)
}
