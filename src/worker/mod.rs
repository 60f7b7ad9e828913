//! Background installation worker
//!
//! One run walks five phases: prepare, copy, secondary tool, profile linking and finalize.
//! Progress, status and step changes are published as [`InstallerEvent`]s over a channel;
//! the worker never touches the wizard's session directly.
//!
//! At most one run is active per worker. The in-progress flag is claimed with a
//! compare-and-swap before any event is sent, so a second start while a run is active
//! returns `None` without publishing anything. A [`RunGuard`] clears the flag and sends
//! [`InstallerEvent::Released`] on every exit path, panics included.

mod copy;
mod events;
mod secondary;

pub use copy::{FileCopier, FsCopier};
pub use events::{InstallOutcome, InstallStep, InstallerEvent, StepStatus};
pub use secondary::{PicoFlasherPlaceholder, SecondaryToolInstaller};

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Sender;

use crate::config::InstallerConfig;
use crate::error::{InstallerError, Result, fs as fs_error};
use crate::linker::{EnvironmentLinker, LinkResult};
use crate::planner::{CopyCategory, CopyTask, FileCopyPlanner};
use crate::platform::HostPlatform;
use crate::session::{Component, InstallOptions, InstallationSession};

const PROFILE_WARNING: &str = "Warning: Could not update shell profile, but installation continues";

/// Everything one run needs, captured from the session when the run starts
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub source_root: PathBuf,
    pub install_path: PathBuf,
    pub components: BTreeSet<Component>,
    pub options: InstallOptions,
}

impl InstallRequest {
    pub fn from_session(session: &InstallationSession, source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            install_path: session.install_dir(),
            components: session.selected_components.clone(),
            options: session.options,
        }
    }
}

/// Clears the in-progress flag and announces the release when dropped
struct RunGuard {
    running: Arc<AtomicBool>,
    events: Sender<InstallerEvent>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        if thread::panicking() {
            tracing::error!("installation worker panicked");
        }
        let _ = self.events.send(InstallerEvent::Released);
    }
}

/// Sends events and keeps published progress monotonic within a run
struct Publisher<'a> {
    events: &'a Sender<InstallerEvent>,
    progress: u8,
}

impl<'a> Publisher<'a> {
    fn new(events: &'a Sender<InstallerEvent>) -> Self {
        Self {
            events,
            progress: 0,
        }
    }

    fn reset(&mut self) {
        self.progress = 0;
        let _ = self.events.send(InstallerEvent::Progress(0));
    }

    fn status(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        let _ = self.events.send(InstallerEvent::Status(message));
    }

    fn progress(&mut self, percent: u8) {
        let percent = percent.min(100);
        if percent <= self.progress {
            return;
        }
        self.progress = percent;
        let _ = self.events.send(InstallerEvent::Progress(percent));
    }

    fn step(&self, step: InstallStep, status: StepStatus) {
        let _ = self.events.send(InstallerEvent::Step { step, status });
    }
}

/// Runs installations off the interactive thread
#[derive(Clone)]
pub struct InstallationWorker {
    running: Arc<AtomicBool>,
    config: Arc<InstallerConfig>,
    platform: HostPlatform,
    linker: Arc<EnvironmentLinker>,
    copier: Arc<dyn FileCopier>,
    secondary: Arc<dyn SecondaryToolInstaller>,
}

impl InstallationWorker {
    pub fn new(config: InstallerConfig, platform: HostPlatform) -> Self {
        let linker = EnvironmentLinker::new(&config);
        let secondary = PicoFlasherPlaceholder::new(config.pacing.secondary_tool());
        Self {
            running: Arc::new(AtomicBool::new(false)),
            config: Arc::new(config),
            platform,
            linker: Arc::new(linker),
            copier: Arc::new(FsCopier),
            secondary: Arc::new(secondary),
        }
    }

    #[cfg(test)]
    pub fn with_linker(mut self, linker: EnvironmentLinker) -> Self {
        self.linker = Arc::new(linker);
        self
    }

    #[cfg(test)]
    pub fn with_copier(mut self, copier: impl FileCopier + 'static) -> Self {
        self.copier = Arc::new(copier);
        self
    }

    #[cfg(test)]
    pub fn with_secondary_tool(mut self, tool: impl SecondaryToolInstaller + 'static) -> Self {
        self.secondary = Arc::new(tool);
        self
    }

    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    pub fn platform(&self) -> &HostPlatform {
        &self.platform
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run on the calling thread. `None` when a run is already in progress.
    #[cfg(test)]
    pub fn run_installation(
        &self,
        request: &InstallRequest,
        events: &Sender<InstallerEvent>,
    ) -> Option<InstallOutcome> {
        let guard = self.try_begin(events)?;
        Some(self.run_guarded(guard, request))
    }

    /// Run on a detached background thread. `Ok(None)` when a run is already in progress.
    pub fn spawn(
        &self,
        request: InstallRequest,
        events: Sender<InstallerEvent>,
    ) -> Result<Option<JoinHandle<InstallOutcome>>> {
        let Some(guard) = self.try_begin(&events) else {
            return Ok(None);
        };
        let worker = self.clone();
        let handle = thread::Builder::new()
            .name("gooey-install".to_string())
            .spawn(move || worker.run_guarded(guard, &request))?;
        Ok(Some(handle))
    }

    fn try_begin(&self, events: &Sender<InstallerEvent>) -> Option<RunGuard> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("installation already in progress, ignoring start request");
            return None;
        }
        Some(RunGuard {
            running: Arc::clone(&self.running),
            events: events.clone(),
        })
    }

    fn run_guarded(&self, guard: RunGuard, request: &InstallRequest) -> InstallOutcome {
        let mut publisher = Publisher::new(&guard.events);
        let outcome = self.execute(request, &mut publisher);
        match &outcome {
            InstallOutcome::Success => {}
            failure => {
                tracing::error!(outcome = ?failure, "installation failed");
                publisher.status(failure.status());
            }
        }
        let _ = guard.events.send(InstallerEvent::Finished(outcome.clone()));
        drop(guard);
        outcome
    }

    fn execute(&self, request: &InstallRequest, publisher: &mut Publisher<'_>) -> InstallOutcome {
        let pacing = self.config.pacing;

        publisher.reset();
        for step in InstallStep::ALL {
            publisher.step(step, StepStatus::Pending);
        }
        publisher.status("Preparing installation...");
        pause(pacing.prepare());

        let planner = FileCopyPlanner::new(&self.config, &self.platform);
        let tasks = planner.plan(&request.source_root, &request.install_path, &request.components);
        if let Err(outcome) = self.copy_phase(&planner, request, &tasks, publisher) {
            return outcome;
        }

        if request.options.install_secondary_tool {
            publisher.step(InstallStep::SecondaryTool, StepStatus::Running);
            publisher.status(format!("Installing {}...", self.secondary.name()));
            if let Err(e) = self.secondary.install(&request.install_path) {
                publisher.step(InstallStep::SecondaryTool, StepStatus::Failed);
                return InstallOutcome::SecondaryStepFailure(e.to_string());
            }
            publisher.step(InstallStep::SecondaryTool, StepStatus::Done);
            publisher.status(format!("{} installed successfully", self.secondary.name()));
        } else {
            publisher.step(InstallStep::SecondaryTool, StepStatus::Skipped);
        }

        self.link_phase(request, publisher);

        publisher.step(InstallStep::Finalize, StepStatus::Running);
        publisher.status("Finalizing installation...");
        let start = publisher.progress;
        let ticks = pacing.finalize_ticks;
        for tick in 1..=ticks {
            let remaining = u32::from(100 - start);
            let value = u32::from(start) + remaining * tick / ticks;
            publisher.progress(u8::try_from(value).unwrap_or(100));
            pause(pacing.finalize_tick());
        }
        publisher.progress(100);
        publisher.step(InstallStep::Finalize, StepStatus::Done);
        publisher.status(InstallOutcome::Success.status());

        InstallOutcome::Success
    }

    fn copy_phase(
        &self,
        planner: &FileCopyPlanner<'_>,
        request: &InstallRequest,
        tasks: &[CopyTask],
        publisher: &mut Publisher<'_>,
    ) -> std::result::Result<(), InstallOutcome> {
        let has = |step: InstallStep| tasks.iter().any(|t| step_for(t.category) == step);
        for step in [InstallStep::CopyLibraries, InstallStep::CopyComponents] {
            if !has(step) {
                publisher.step(step, StepStatus::Skipped);
            }
        }
        if tasks.is_empty() {
            tracing::info!("nothing to copy for the selected components");
            return Ok(());
        }

        let layout = planner.layout(&request.install_path);
        for dir in layout.directories_for(&request.components) {
            if let Err(e) = self.copier.ensure_dir(&dir) {
                let step = first_step(tasks);
                publisher.step(step, StepStatus::Failed);
                return Err(outcome_for(fs_error::create_dir_failed(&dir, &e)));
            }
        }

        let total = tasks.len();
        let mut current: Option<InstallStep> = None;
        for (index, task) in tasks.iter().enumerate() {
            let step = step_for(task.category);
            if current != Some(step) {
                if let Some(previous) = current {
                    publisher.step(previous, StepStatus::Done);
                }
                publisher.step(step, StepStatus::Running);
                current = Some(step);
            }

            if let Err(outcome) = self.copy_one(task) {
                publisher.step(step, StepStatus::Failed);
                return Err(outcome);
            }

            let copied = index + 1;
            publisher.progress(u8::try_from(copied * 100 / total).unwrap_or(100));
            publisher.status(format!("Copying files... {copied}/{total}"));
            pause(self.config.pacing.per_file());
        }
        if let Some(last) = current {
            publisher.step(last, StepStatus::Done);
        }

        Ok(())
    }

    fn copy_one(&self, task: &CopyTask) -> std::result::Result<(), InstallOutcome> {
        self.copier
            .ensure_dir(&task.destination_directory)
            .map_err(|e| outcome_for(fs_error::create_dir_failed(&task.destination_directory, &e)))?;

        let destination = task.destination_file();
        self.copier
            .copy(&task.source_path, &destination)
            .map_err(|e| outcome_for(fs_error::copy_failed(&destination, &e)))?;

        tracing::debug!(
            from = %task.source_path.display(),
            to = %destination.display(),
            "copied"
        );
        Ok(())
    }

    fn link_phase(&self, request: &InstallRequest, publisher: &mut Publisher<'_>) {
        let enabled = request.options.link_environment_profile;
        if enabled {
            publisher.step(InstallStep::LinkEnvironment, StepStatus::Running);
            publisher.status("Updating shell profile...");
        }

        match self.linker.link(&request.install_path, enabled) {
            Ok(LinkResult::Disabled) => {
                publisher.step(InstallStep::LinkEnvironment, StepStatus::Skipped);
            }
            Ok(result) => {
                publisher.status(result.status());
                publisher.step(InstallStep::LinkEnvironment, StepStatus::Done);
            }
            Err(e) => {
                tracing::warn!(error = %e, "shell profile linking failed");
                publisher.status(PROFILE_WARNING);
                publisher.step(InstallStep::LinkEnvironment, StepStatus::Failed);
            }
        }
    }
}

fn step_for(category: CopyCategory) -> InstallStep {
    match category {
        CopyCategory::Library | CopyCategory::Headers => InstallStep::CopyLibraries,
        CopyCategory::Docs | CopyCategory::Examples => InstallStep::CopyComponents,
    }
}

fn first_step(tasks: &[CopyTask]) -> InstallStep {
    tasks
        .first()
        .map(|t| step_for(t.category))
        .unwrap_or(InstallStep::CopyLibraries)
}

fn outcome_for(err: InstallerError) -> InstallOutcome {
    match err {
        InstallerError::PermissionDenied { path } => InstallOutcome::PermissionDenied(path.into()),
        other => InstallOutcome::FileCopyFailure(other.to_string()),
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}
