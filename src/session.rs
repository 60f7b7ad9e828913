//! Installation session state
//!
//! One [`InstallationSession`] lives for the whole process. The wizard owns it and is the
//! only writer of the page and the user's selections; status and progress arrive from the
//! installation worker as events and are applied by the wizard on its own thread.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{InstallerError, validation};
use crate::wizard::PageId;

/// An installable unit the user opts into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    /// Shared library and headers (mandatory)
    Gui,
    /// HTML documentation
    Docs,
    /// Example projects
    Examples,
}

impl Component {
    pub const ALL: [Component; 3] = [Component::Gui, Component::Docs, Component::Examples];

    pub fn id(self) -> &'static str {
        match self {
            Component::Gui => "gui",
            Component::Docs => "docs",
            Component::Examples => "examples",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Component::Gui => "GUI Components (required)",
            Component::Docs => "Documentation",
            Component::Examples => "Example Projects",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Component {
    type Err = InstallerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gui" => Ok(Component::Gui),
            "docs" => Ok(Component::Docs),
            "examples" => Ok(Component::Examples),
            other => Err(validation::unknown_component(other)),
        }
    }
}

/// Parse a list of component names, rejecting unknown ones
pub fn parse_components<S: AsRef<str>>(names: &[S]) -> Result<BTreeSet<Component>, InstallerError> {
    names.iter().map(|n| n.as_ref().parse()).collect()
}

/// Post-install behaviour toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallOptions {
    pub launch_docs_after_install: bool,
    pub install_secondary_tool: bool,
    pub link_environment_profile: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            launch_docs_after_install: false,
            install_secondary_tool: false,
            link_environment_profile: true,
        }
    }
}

/// Everything the user has chosen plus what the worker last published
#[derive(Debug, Clone)]
pub struct InstallationSession {
    current_page: PageId,
    pub install_path: String,
    pub selected_components: BTreeSet<Component>,
    pub options: InstallOptions,
    pub terms_accepted: bool,
    status: String,
    progress_percent: u8,
}

impl InstallationSession {
    pub fn new(install_path: impl Into<String>) -> Self {
        Self {
            current_page: PageId::Welcome,
            install_path: install_path.into(),
            selected_components: BTreeSet::new(),
            options: InstallOptions::default(),
            terms_accepted: false,
            status: String::new(),
            progress_percent: 0,
        }
    }

    pub fn current_page(&self) -> PageId {
        self.current_page
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    pub fn has_component(&self, component: Component) -> bool {
        self.selected_components.contains(&component)
    }

    pub fn set_component(&mut self, component: Component, selected: bool) {
        if selected {
            self.selected_components.insert(component);
        } else {
            self.selected_components.remove(&component);
        }
    }

    /// Trimmed install path as a filesystem path
    pub fn install_dir(&self) -> PathBuf {
        PathBuf::from(self.install_path.trim())
    }

    pub(crate) fn set_page(&mut self, page: PageId) {
        self.current_page = page;
    }

    pub(crate) fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub(crate) fn set_progress(&mut self, percent: u8) {
        self.progress_percent = percent.min(100);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_parsing() {
        assert_eq!("gui".parse::<Component>().unwrap(), Component::Gui);
        assert_eq!(" Docs ".parse::<Component>().unwrap(), Component::Docs);
        assert!(matches!(
            "plugins".parse::<Component>(),
            Err(InstallerError::UnknownComponent { .. })
        ));
    }

    #[test]
    fn test_parse_components_dedupes_and_orders() {
        let set = parse_components(&["examples", "gui", "gui"]).unwrap();
        let ids: Vec<_> = set.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["gui", "examples"]);
    }

    #[test]
    fn test_new_session_defaults() {
        let session = InstallationSession::new("/usr/local");
        assert_eq!(session.current_page(), PageId::Welcome);
        assert!(session.selected_components.is_empty());
        assert!(session.options.link_environment_profile);
        assert!(!session.options.install_secondary_tool);
        assert!(!session.terms_accepted);
        assert_eq!(session.progress_percent(), 0);
    }

    #[test]
    fn test_set_component_toggles() {
        let mut session = InstallationSession::new("/opt/gooey");
        session.set_component(Component::Docs, true);
        assert!(session.has_component(Component::Docs));
        session.set_component(Component::Docs, false);
        assert!(!session.has_component(Component::Docs));
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut session = InstallationSession::new("/opt/gooey");
        session.set_progress(250);
        assert_eq!(session.progress_percent(), 100);
    }
}
