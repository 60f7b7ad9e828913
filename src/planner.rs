//! Copy planning for selected components
//!
//! This module handles:
//! - Resolving where each category of file lands (system layout vs. custom prefix)
//! - Enumerating payload files per component into ordered [`CopyTask`]s
//!
//! Planning never fails: missing payload directories or unreadable entries simply yield
//! fewer tasks. Traversal is sorted by file name so a replan touches the same set.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

use crate::config::InstallerConfig;
use crate::platform::HostPlatform;
use crate::session::Component;

/// Payload sub-directories under the source root
const SOURCE_LIB_DIR: &str = "lib";
const SOURCE_INCLUDE_DIR: &str = "include";
const SOURCE_DOCS_DIR: &str = "docs";
const SOURCE_EXAMPLES_DIR: &str = "examples";

/// What kind of file a task copies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyCategory {
    Library,
    Headers,
    Docs,
    Examples,
}

/// One planned file copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTask {
    pub source_path: PathBuf,
    pub destination_directory: PathBuf,
    pub category: CopyCategory,
}

impl CopyTask {
    /// Full path of the copied file
    pub fn destination_file(&self) -> PathBuf {
        match self.source_path.file_name() {
            Some(name) => self.destination_directory.join(name),
            None => self.destination_directory.clone(),
        }
    }

    /// File name for status lines
    pub fn display_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.source_path.display().to_string())
    }
}

/// Destination directories for one install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationLayout {
    pub lib_dir: PathBuf,
    pub include_dir: PathBuf,
    pub docs_dir: PathBuf,
    pub examples_dir: PathBuf,
    /// True when the fixed system layout is used
    pub system: bool,
}

impl DestinationLayout {
    /// Fixed system directories under a recognised prefix, otherwise relative to the path
    pub fn resolve(install_path: &Path, platform: &HostPlatform, config: &InstallerConfig) -> Self {
        let examples_dir = install_path.join("examples");
        if platform.is_system_path(install_path) {
            return Self {
                lib_dir: config.system_layout.lib_dir.clone(),
                include_dir: config.system_layout.include_dir.clone(),
                docs_dir: config.system_layout.docs_dir.clone(),
                examples_dir,
                system: true,
            };
        }

        Self {
            lib_dir: install_path.join("lib"),
            include_dir: install_path.join("include").join(&config.namespace),
            docs_dir: install_path.join("docs"),
            examples_dir,
            system: false,
        }
    }

    /// Root directories the selected components write into
    pub fn directories_for(&self, components: &BTreeSet<Component>) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        for component in components {
            match component {
                Component::Gui => {
                    dirs.push(self.lib_dir.clone());
                    dirs.push(self.include_dir.clone());
                }
                Component::Docs => dirs.push(self.docs_dir.clone()),
                Component::Examples => dirs.push(self.examples_dir.clone()),
            }
        }
        dirs
    }
}

/// Enumerates copy tasks for a payload
pub struct FileCopyPlanner<'a> {
    config: &'a InstallerConfig,
    platform: &'a HostPlatform,
}

impl<'a> FileCopyPlanner<'a> {
    pub fn new(config: &'a InstallerConfig, platform: &'a HostPlatform) -> Self {
        Self { config, platform }
    }

    pub fn layout(&self, install_path: &Path) -> DestinationLayout {
        DestinationLayout::resolve(install_path, self.platform, self.config)
    }

    /// Ordered copy tasks, grouped by component in gui, docs, examples order
    pub fn plan(
        &self,
        source_root: &Path,
        install_path: &Path,
        components: &BTreeSet<Component>,
    ) -> Vec<CopyTask> {
        let layout = self.layout(install_path);
        let mut tasks = Vec::new();

        for component in components {
            match component {
                Component::Gui => {
                    tasks.extend(self.plan_libraries(&source_root.join(SOURCE_LIB_DIR), &layout));
                    tasks.extend(self.plan_headers(&source_root.join(SOURCE_INCLUDE_DIR), &layout));
                }
                Component::Docs => {
                    tasks.extend(mirror_tree(
                        &source_root.join(SOURCE_DOCS_DIR),
                        &layout.docs_dir,
                        CopyCategory::Docs,
                        |_| true,
                    ));
                }
                Component::Examples => {
                    let globs: Vec<Glob<'_>> = self
                        .config
                        .example_patterns
                        .iter()
                        .filter_map(|pattern| Glob::new(pattern).ok())
                        .collect();
                    tasks.extend(mirror_tree(
                        &source_root.join(SOURCE_EXAMPLES_DIR),
                        &layout.examples_dir,
                        CopyCategory::Examples,
                        |name| self.is_example_file(name, &globs),
                    ));
                }
            }
        }

        tracing::debug!(
            tasks = tasks.len(),
            source = %source_root.display(),
            system_layout = layout.system,
            "planned copy tasks"
        );
        tasks
    }

    /// Binary libraries directly inside the lib directory
    fn plan_libraries(&self, lib_dir: &Path, layout: &DestinationLayout) -> Vec<CopyTask> {
        if !lib_dir.is_dir() {
            return Vec::new();
        }

        WalkDir::new(lib_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| has_extension(e.path(), &self.config.library_extensions))
            .map(|e| CopyTask {
                source_path: e.path().to_path_buf(),
                destination_directory: layout.lib_dir.clone(),
                category: CopyCategory::Library,
            })
            .collect()
    }

    /// Header files anywhere under the include directory
    fn plan_headers(&self, include_dir: &Path, layout: &DestinationLayout) -> Vec<CopyTask> {
        let extensions = &self.config.header_extensions;
        mirror_tree(include_dir, &layout.include_dir, CopyCategory::Headers, |name| {
            has_extension(Path::new(name), extensions)
        })
    }

    fn is_example_file(&self, name: &str, globs: &[Glob<'_>]) -> bool {
        let candidate = CandidatePath::from(name);
        if globs.iter().any(|glob| glob.matched(&candidate).is_some()) {
            return true;
        }
        // Patterns that failed to compile still match literally
        self.config
            .example_patterns
            .iter()
            .any(|pattern| pattern == name)
    }
}

/// Walk `source_dir` recursively and map each accepted file into the same relative
/// directory under `dest_root`
fn mirror_tree<F>(source_dir: &Path, dest_root: &Path, category: CopyCategory, accept: F) -> Vec<CopyTask>
where
    F: Fn(&str) -> bool,
{
    if !source_dir.is_dir() {
        return Vec::new();
    }

    WalkDir::new(source_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| accept(&e.file_name().to_string_lossy()))
        .map(|e| {
            let relative_parent = e
                .path()
                .parent()
                .and_then(|parent| parent.strip_prefix(source_dir).ok())
                .unwrap_or_else(|| Path::new(""));
            CopyTask {
                source_path: e.path().to_path_buf(),
                destination_directory: dest_root.join(relative_parent),
                category,
            }
        })
        .collect()
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed == ext))
}
