//! Wizard page flow
//!
//! [`WizardStateMachine`] owns the [`InstallationSession`] and is its only writer. It:
//! - picks the first page from the startup checks (privileges, then existing install)
//! - guards forward transitions (path validation on Options, acceptance on Terms)
//! - starts the installation worker when Installing is entered, and again on Retry
//! - applies worker events to the session and the host, in [`WizardStateMachine::poll`]
//! - refreshes the forward/back controls and page indicator after every change
//!
//! Navigation is frozen while a run is in flight; the worker's `Released` event thaws it.

mod pages;

pub use pages::{Page, PageCatalog, PageId, PageKind};

use std::path::PathBuf;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError, unbounded};

use crate::docs;
use crate::error::InstallerError;
use crate::planner::FileCopyPlanner;
use crate::platform::SystemCheck;
use crate::session::{Component, InstallOptions, InstallationSession};
use crate::ui::WidgetHost;
use crate::validator::PathValidator;
use crate::worker::{InstallOutcome, InstallRequest, InstallationWorker, InstallerEvent};

const STOPPED_UNEXPECTEDLY: &str = "installation worker stopped unexpectedly";

/// Result of a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// A new page is showing
    Moved(PageId),
    /// A guard refused; the message is the status now on screen
    Blocked(String),
    /// The install page restarted the worker after a failure
    Retried,
    /// Navigation is disabled while an installation runs
    Busy,
    /// Nothing happened (e.g. Back on the first page)
    Ignored,
    /// Finish on the complete page
    Finished,
    /// Close on a dead-end page
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RunState {
    Idle,
    Running,
    Failed(InstallOutcome),
    Succeeded,
}

/// Installation wizard driven through a [`WidgetHost`]
pub struct WizardStateMachine<H: WidgetHost> {
    host: H,
    session: InstallationSession,
    catalog: PageCatalog,
    validator: PathValidator,
    worker: InstallationWorker,
    source_root: PathBuf,
    events: Option<Receiver<InstallerEvent>>,
    pending_outcome: Option<InstallOutcome>,
    run: RunState,
}

impl<H: WidgetHost> WizardStateMachine<H> {
    pub fn new(
        host: H,
        session: InstallationSession,
        worker: InstallationWorker,
        source_root: impl Into<PathBuf>,
    ) -> Self {
        let catalog = PageCatalog::new(worker.config());
        let validator = PathValidator::new(worker.platform().clone());
        Self {
            host,
            session,
            catalog,
            validator,
            worker,
            source_root: source_root.into(),
            events: None,
            pending_outcome: None,
            run: RunState::Idle,
        }
    }

    /// Show the first page chosen by the startup checks
    pub fn start(&mut self, check: &dyn SystemCheck) -> PageId {
        let first = if check.lacks_required_privileges() {
            tracing::warn!("root privileges required but not available");
            PageId::PrivilegeRequired
        } else if let Some(marker) = check.existing_installation() {
            tracing::info!(marker = %marker.display(), "existing installation detected");
            PageId::AlreadyInstalled
        } else {
            PageId::Welcome
        };
        self.enter(first, true);
        first
    }

    pub fn session(&self) -> &InstallationSession {
        &self.session
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    #[cfg(test)]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn current_page(&self) -> PageId {
        self.session.current_page()
    }

    pub fn page(&self) -> &Page {
        self.catalog.page(self.current_page())
    }

    pub fn is_running(&self) -> bool {
        self.run == RunState::Running
    }

    /// Outcome of the last finished run, if any
    pub fn last_outcome(&self) -> Option<&InstallOutcome> {
        match &self.run {
            RunState::Failed(outcome) => Some(outcome),
            RunState::Succeeded => Some(&InstallOutcome::Success),
            RunState::Idle | RunState::Running => None,
        }
    }

    pub fn set_install_path(&mut self, path: impl Into<String>) {
        self.session.install_path = path.into();
    }

    pub fn set_component(&mut self, component: Component, selected: bool) {
        self.session.set_component(component, selected);
    }

    pub fn set_options(&mut self, options: InstallOptions) {
        self.session.options = options;
    }

    pub fn set_terms_accepted(&mut self, accepted: bool) {
        self.session.terms_accepted = accepted;
        self.publish_status(if accepted {
            "Terms accepted"
        } else {
            "Please accept the terms and conditions"
        });
    }

    /// Forward control
    pub fn next(&mut self) -> Transition {
        if self.is_running() {
            return Transition::Busy;
        }

        let current = self.current_page();
        if self.catalog.page(current).is_dead_end() {
            return Transition::Closed;
        }

        match current {
            PageId::Options => {
                if let Err(err) = self.check_options() {
                    return self.block(&err);
                }
            }
            PageId::Terms if !self.session.terms_accepted => {
                return self.block(&InstallerError::TermsNotAccepted);
            }
            PageId::Installing if self.run != RunState::Succeeded => {
                self.begin_install();
                self.refresh_controls();
                return Transition::Retried;
            }
            PageId::Complete => {
                self.finish();
                return Transition::Finished;
            }
            _ => {}
        }

        match self.catalog.next_after(current) {
            Some(next) => {
                self.enter(next, true);
                Transition::Moved(next)
            }
            None => Transition::Finished,
        }
    }

    /// Back control; never restarts the worker
    pub fn back(&mut self) -> Transition {
        if self.is_running() {
            return Transition::Busy;
        }
        match self.catalog.previous_before(self.current_page()) {
            Some(previous) => {
                self.enter(previous, false);
                Transition::Moved(previous)
            }
            None => Transition::Ignored,
        }
    }

    /// Cancel control. The run, if any, is abandoned with the process.
    pub fn cancel(&mut self) {
        if self.is_running() {
            tracing::warn!("cancelled while an installation was running");
        }
        tracing::info!(page = %self.current_page(), "installer cancelled");
    }

    /// Apply any worker events that have arrived, without blocking
    pub fn poll(&mut self) {
        // `release` drops the receiver, so the loop ends with the run
        while let Some(events) = self.events.clone() {
            match events.try_recv() {
                Ok(event) => self.apply(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => self.release(),
            }
        }
    }

    /// Wait at most `timeout` for the next worker event, then apply whatever else arrived
    pub fn poll_timeout(&mut self, timeout: Duration) {
        let Some(events) = self.events.clone() else {
            return;
        };
        match events.recv_timeout(timeout) {
            Ok(event) => self.apply(event),
            Err(RecvTimeoutError::Timeout) => return,
            Err(RecvTimeoutError::Disconnected) => self.release(),
        }
        self.poll();
    }

    /// Block until the current run has been released
    #[cfg(test)]
    pub fn wait_for_install(&mut self) {
        while let Some(events) = self.events.clone() {
            match events.recv() {
                Ok(event) => self.apply(event),
                Err(_) => self.release(),
            }
        }
    }

    fn check_options(&mut self) -> Result<(), InstallerError> {
        let host = &mut self.host;
        self.validator
            .validate(
                &self.session.install_path,
                &self.session.selected_components,
                |warning| host.confirm(warning.title(), &warning.message()),
            )
            .map(|_| ())
    }

    fn block(&mut self, err: &InstallerError) -> Transition {
        let message = err.to_string();
        if err.is_recoverable() {
            tracing::debug!(page = %self.current_page(), reason = %message, "transition blocked");
        } else {
            tracing::warn!(page = %self.current_page(), reason = %message, "transition blocked");
        }
        self.publish_status(&message);
        Transition::Blocked(message)
    }

    fn enter(&mut self, page: PageId, trigger_worker: bool) {
        self.session.set_page(page);
        tracing::debug!(page = %page, "entering page");
        self.host.show_page(self.catalog.page(page));
        if page == PageId::Installing && trigger_worker && self.run == RunState::Idle {
            self.begin_install();
        }
        self.refresh_controls();
    }

    fn begin_install(&mut self) {
        let request = InstallRequest::from_session(&self.session, &self.source_root);
        let (tx, rx) = unbounded();
        match self.worker.spawn(request, tx) {
            Ok(Some(_detached)) => {
                self.events = Some(rx);
                self.pending_outcome = None;
                self.run = RunState::Running;
            }
            Ok(None) => tracing::debug!("worker already running"),
            Err(err) => {
                let outcome = InstallOutcome::FileCopyFailure(err.to_string());
                self.publish_status(&outcome.status());
                self.run = RunState::Failed(outcome);
            }
        }
    }

    fn apply(&mut self, event: InstallerEvent) {
        match event {
            InstallerEvent::Status(message) => self.publish_status(&message),
            InstallerEvent::Progress(percent) => {
                self.session.set_progress(percent);
                self.host.set_progress(self.session.progress_percent());
            }
            InstallerEvent::Step { step, status } => self.host.set_step(step, status),
            InstallerEvent::Finished(outcome) => self.pending_outcome = Some(outcome),
            InstallerEvent::Released => self.release(),
        }
    }

    fn release(&mut self) {
        self.events = None;
        self.run = match self.pending_outcome.take() {
            Some(InstallOutcome::Success) => RunState::Succeeded,
            Some(outcome) => RunState::Failed(outcome),
            None => {
                let outcome = InstallOutcome::FileCopyFailure(STOPPED_UNEXPECTEDLY.to_string());
                self.publish_status(&outcome.status());
                RunState::Failed(outcome)
            }
        };

        if self.run == RunState::Succeeded && self.current_page() == PageId::Installing {
            self.enter(PageId::Complete, false);
        } else {
            self.refresh_controls();
        }
    }

    fn finish(&mut self) {
        if !self.session.options.launch_docs_after_install {
            return;
        }
        let planner = FileCopyPlanner::new(self.worker.config(), self.worker.platform());
        let docs_dir = planner.layout(&self.session.install_dir()).docs_dir;
        let host = &mut self.host;
        let status = docs::launch_documentation(&docs_dir, |path| host.open_document(path));
        self.publish_status(&status);
    }

    fn publish_status(&mut self, message: &str) {
        self.session.set_status(message);
        self.host.set_status(message);
    }

    fn forward_control(&self) -> (&'static str, bool) {
        let current = self.current_page();
        if self.catalog.page(current).is_dead_end() {
            return ("Close", true);
        }
        match current {
            PageId::Complete => ("Finish", true),
            PageId::Installing => match self.run {
                RunState::Running => ("Next", false),
                RunState::Failed(_) | RunState::Idle => ("Retry", true),
                RunState::Succeeded => ("Next", true),
            },
            _ if self.catalog.next_after(current) == Some(PageId::Installing) => ("Install", true),
            _ => ("Next", true),
        }
    }

    fn refresh_controls(&mut self) {
        let current = self.current_page();
        let (label, enabled) = self.forward_control();
        let back = !self.is_running() && self.catalog.previous_before(current).is_some();
        let position = self.catalog.position(current);

        self.host.set_forward_control(label, enabled);
        self.host.set_back_enabled(back);
        self.host.set_page_indicator(position);
    }
}
