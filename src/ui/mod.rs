//! Presentation layer
//!
//! The wizard talks to the screen only through the [`WidgetHost`] trait, so the state
//! machine runs the same against the terminal and against the recording host used in tests.
//!
//! - [`TerminalHost`] renders pages with `console`, install progress with `indicatif`
//!   and confirmations with `inquire`

mod terminal;

pub use terminal::TerminalHost;

use std::io;
use std::path::Path;

use crate::wizard::Page;
use crate::worker::{InstallStep, StepStatus};

/// Toolkit boundary the wizard renders through
pub trait WidgetHost {
    fn show_page(&mut self, page: &Page);

    fn set_status(&mut self, message: &str);

    fn set_progress(&mut self, percent: u8);

    fn set_step(&mut self, step: InstallStep, status: StepStatus);

    /// Label and enabled state of the forward control
    fn set_forward_control(&mut self, label: &str, enabled: bool);

    fn set_back_enabled(&mut self, enabled: bool);

    /// `None` hides the indicator (dead-end pages)
    fn set_page_indicator(&mut self, position: Option<(usize, usize)>);

    /// Ask a yes/no question; `false` means declined
    fn confirm(&mut self, title: &str, message: &str) -> bool;

    /// Open a document with the desktop's default application
    fn open_document(&mut self, path: &Path) -> io::Result<()> {
        crate::docs::open_with_system(path)
    }
}
