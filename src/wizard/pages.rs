//! Page catalog
//!
//! The wizard is a linear sequence of counted pages plus two dead-end pages that can only
//! be reached at startup. Position and neighbours come from the catalog's order and the
//! per-page `counted_in_sequence` flag.

use std::fmt;

use crate::config::InstallerConfig;

const REPOSITORY_URL: &str = "https://github.com/BinaryInkTN/GooeyGUI";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    AlreadyInstalled,
    PrivilegeRequired,
    Welcome,
    Options,
    Terms,
    Collaborate,
    Installing,
    Complete,
}

impl PageId {
    /// Catalog order
    #[cfg(test)]
    pub const ALL: [PageId; 8] = [
        PageId::AlreadyInstalled,
        PageId::PrivilegeRequired,
        PageId::Welcome,
        PageId::Options,
        PageId::Terms,
        PageId::Collaborate,
        PageId::Installing,
        PageId::Complete,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PageId::AlreadyInstalled => "already-installed",
            PageId::PrivilegeRequired => "privilege-required",
            PageId::Welcome => "welcome",
            PageId::Options => "options",
            PageId::Terms => "terms",
            PageId::Collaborate => "collaborate",
            PageId::Installing => "installing",
            PageId::Complete => "complete",
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a page behaves in the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Informational,
    DataEntry,
    GatedTransition,
    WorkerDriven,
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: PageId,
    pub kind: PageKind,
    pub title: String,
    pub body: Vec<String>,
    /// Shown in "Page N of M" and reachable with Next/Back
    pub counted_in_sequence: bool,
}

impl Page {
    fn new(id: PageId, kind: PageKind, title: impl Into<String>, body: Vec<String>) -> Self {
        Self {
            id,
            kind,
            title: title.into(),
            body,
            counted_in_sequence: true,
        }
    }

    fn dead_end(mut self) -> Self {
        self.counted_in_sequence = false;
        self
    }

    /// Pages with no forward progression
    pub fn is_dead_end(&self) -> bool {
        !self.counted_in_sequence
    }
}

/// Every page the wizard can show, in order
#[derive(Debug, Clone)]
pub struct PageCatalog {
    pages: Vec<Page>,
}

impl PageCatalog {
    pub fn new(config: &InstallerConfig) -> Self {
        let product = &config.product_name;
        let lines = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();

        let pages = vec![
            Page::new(
                PageId::AlreadyInstalled,
                PageKind::Informational,
                format!("{product} is already installed"),
                vec![
                    format!("An existing {product} installation was found on this system."),
                    "Remove it first if you want to reinstall.".to_string(),
                ],
            )
            .dead_end(),
            Page::new(
                PageId::PrivilegeRequired,
                PageKind::Informational,
                "Administrator privileges required",
                vec![
                    format!("Installing {product} system-wide requires root privileges."),
                    "Please run the installer again with sudo.".to_string(),
                ],
            )
            .dead_end(),
            Page::new(
                PageId::Welcome,
                PageKind::Informational,
                format!("{product} v{} Installer", config.product_version),
                vec![
                    format!("Welcome to the {product} installation wizard"),
                    format!(
                        "This wizard will guide you through the installation of {product}, \
                         a modern GUI framework for C applications."
                    ),
                    String::new(),
                    "System Requirements: C compiler, 50MB disk space".to_string(),
                ],
            ),
            Page::new(
                PageId::Options,
                PageKind::DataEntry,
                "Installation Options",
                lines(&[
                    "Choose the installation directory and the components to install.",
                    "Recommended (requires root privileges): /usr/local (system-wide) or /usr (distribution-wide)",
                ]),
            ),
            Page::new(
                PageId::Terms,
                PageKind::GatedTransition,
                "Terms and Conditions",
                license_text(product),
            ),
            Page::new(
                PageId::Collaborate,
                PageKind::Informational,
                "Get Involved in the Development",
                vec![
                    format!("Join the {product} community"),
                    format!(
                        "{product} is an open-source project. We welcome contributions \
                         from developers of all skill levels."
                    ),
                    String::new(),
                    format!("Source code:   {REPOSITORY_URL}"),
                    format!("Contributing:  {REPOSITORY_URL}/blob/main/CONTRIBUTING.md"),
                    format!("Issues:        {REPOSITORY_URL}/issues"),
                    format!("Documentation: {REPOSITORY_URL}/wiki"),
                ],
            ),
            Page::new(
                PageId::Installing,
                PageKind::WorkerDriven,
                format!("Installing {product}"),
                vec![format!(
                    "Please wait while the installer sets up {product} on your system."
                )],
            ),
            Page::new(
                PageId::Complete,
                PageKind::Terminal,
                "Installation Complete",
                vec![
                    format!("{product} has been successfully installed on your system."),
                    format!("You can now start using {product} in your C projects."),
                ],
            ),
        ];

        Self { pages }
    }

    pub fn page(&self, id: PageId) -> &Page {
        &self.pages[id.index()]
    }

    fn sequence(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().filter(|p| p.counted_in_sequence)
    }

    /// Following page in the counted sequence
    pub fn next_after(&self, id: PageId) -> Option<PageId> {
        if !self.page(id).counted_in_sequence {
            return None;
        }
        self.sequence()
            .skip_while(|p| p.id != id)
            .nth(1)
            .map(|p| p.id)
    }

    /// Preceding page in the counted sequence
    pub fn previous_before(&self, id: PageId) -> Option<PageId> {
        if !self.page(id).counted_in_sequence {
            return None;
        }
        self.sequence()
            .take_while(|p| p.id != id)
            .last()
            .map(|p| p.id)
    }

    /// 1-based position and total for counted pages
    pub fn position(&self, id: PageId) -> Option<(usize, usize)> {
        let total = self.sequence().count();
        self.sequence()
            .position(|p| p.id == id)
            .map(|index| (index + 1, total))
    }
}

fn license_text(product: &str) -> Vec<String> {
    let upper = product.to_uppercase();
    vec![
        format!("END-USER LICENSE AGREEMENT FOR {upper}"),
        String::new(),
        "1. GRANT OF LICENSE. binaryink.dev grants you the right to use one copy of the".to_string(),
        "   software on a single computer.".to_string(),
        String::new(),
        "2. COPYRIGHT. The software is owned by binaryink.dev and is protected by copyright laws."
            .to_string(),
        String::new(),
        "3. NO WARRANTY. The software is provided 'as is' without warranty of any kind.".to_string(),
        String::new(),
        "4. LIMITATION OF LIABILITY. In no event shall binaryink.dev be liable for any damages"
            .to_string(),
        "   arising from the use of this software.".to_string(),
        String::new(),
        "5. DISTRIBUTION. You may not distribute, rent, lease, or sell this software.".to_string(),
        String::new(),
        "By accepting this agreement, you agree to be bound by these terms and conditions."
            .to_string(),
    ]
}
