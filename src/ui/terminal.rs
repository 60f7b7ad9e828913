//! Terminal rendering of the wizard

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{Confirm, InquireError};

use super::WidgetHost;
use crate::wizard::{Page, PageKind};
use crate::worker::{InstallStep, StepStatus};

/// Renders the wizard on stdout
pub struct TerminalHost {
    assume_yes: bool,
    progress: Option<ProgressBar>,
    last_status: String,
    forward_label: String,
    forward_enabled: bool,
    back_enabled: bool,
}

impl TerminalHost {
    /// With `assume_yes`, confirmations answer yes without prompting
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            progress: None,
            last_status: String::new(),
            forward_label: "Next".to_string(),
            forward_enabled: true,
            back_enabled: false,
        }
    }

    pub fn forward_label(&self) -> &str {
        &self.forward_label
    }

    pub fn forward_enabled(&self) -> bool {
        self.forward_enabled
    }

    pub fn back_enabled(&self) -> bool {
        self.back_enabled
    }

    fn finish_progress(&mut self) {
        if let Some(pb) = self.progress.take() {
            pb.finish();
        }
    }
}

impl Drop for TerminalHost {
    fn drop(&mut self) {
        self.finish_progress();
    }
}

fn progress_bar() -> ProgressBar {
    let style = ProgressStyle::with_template("  [{bar:40.cyan/blue}] {pos:>3}% {msg}")
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    let pb = ProgressBar::new(100);
    pb.set_style(style);
    pb
}

impl WidgetHost for TerminalHost {
    fn show_page(&mut self, page: &Page) {
        self.finish_progress();
        self.last_status.clear();

        println!();
        println!("{}", Style::new().bold().cyan().apply_to(&page.title));
        println!();
        for line in &page.body {
            println!("  {line}");
        }

        if page.kind == PageKind::WorkerDriven {
            println!();
            println!("  {}", Style::new().dim().apply_to("Installation Steps:"));
            self.progress = Some(progress_bar());
        }
    }

    fn set_status(&mut self, message: &str) {
        if message == self.last_status {
            return;
        }
        self.last_status = message.to_string();

        match &self.progress {
            Some(pb) => pb.set_message(message.to_string()),
            None => println!("  {}", Style::new().yellow().apply_to(message)),
        }
    }

    fn set_progress(&mut self, percent: u8) {
        if let Some(pb) = &self.progress {
            pb.set_position(u64::from(percent));
        }
    }

    fn set_step(&mut self, step: InstallStep, status: StepStatus) {
        let (marker, style) = match status {
            StepStatus::Pending => return,
            StepStatus::Running => ("•", Style::new().blue()),
            StepStatus::Done => ("✓", Style::new().green()),
            StepStatus::Skipped => ("-", Style::new().dim()),
            StepStatus::Failed => ("✗", Style::new().red()),
        };
        let line = format!("  {} {}", style.apply_to(marker), step.label());
        match &self.progress {
            Some(pb) => pb.println(line),
            None => println!("{line}"),
        }
    }

    fn set_forward_control(&mut self, label: &str, enabled: bool) {
        self.forward_label = label.to_string();
        self.forward_enabled = enabled;
    }

    fn set_back_enabled(&mut self, enabled: bool) {
        self.back_enabled = enabled;
    }

    fn set_page_indicator(&mut self, position: Option<(usize, usize)>) {
        if let Some((current, total)) = position {
            let line = format!("Page {current} of {total}");
            match &self.progress {
                Some(pb) => pb.println(format!("  {}", Style::new().dim().apply_to(line))),
                None => println!("  {}", Style::new().dim().apply_to(line)),
            }
        }
    }

    fn confirm(&mut self, title: &str, message: &str) -> bool {
        println!();
        println!("{}", Style::new().bold().yellow().apply_to(title));
        for line in message.lines() {
            println!("  {line}");
        }

        if self.assume_yes {
            println!("  {}", Style::new().dim().apply_to("(confirmed by --yes)"));
            return true;
        }

        answer_or_decline(
            Confirm::new("Continue?")
                .with_default(false)
                .with_help_message("Press 'y' to continue, or Enter to go back")
                .prompt(),
        )
    }
}

/// A prompt that could not be answered counts as "no"
fn answer_or_decline(answer: Result<bool, InquireError>) -> bool {
    match answer {
        Ok(answer) => answer,
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => false,
        Err(e) => {
            tracing::warn!(error = %e, "confirmation prompt failed, treating as declined");
            false
        }
    }
}
