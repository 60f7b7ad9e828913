//! Install command: drive the wizard in the terminal
//!
//! With `--yes` every page is taken with its forward control and guards that would
//! need a human (terms, a declined path) stop the run with an error. Otherwise each
//! page is rendered and the user picks Next/Back/Cancel with `inquire` prompts.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use console::Style;
use inquire::{Confirm, InquireError, MultiSelect, Select, Text};

use super::Exit;
use super::helpers::{InstallerContext, selected_components};
use crate::cli::InstallArgs;
use crate::error::{InstallerError, Result};
use crate::platform::HostCheck;
use crate::session::{Component, InstallOptions, InstallationSession};
use crate::ui::TerminalHost;
use crate::wizard::{PageId, Transition, WizardStateMachine};
use crate::worker::{InstallOutcome, InstallationWorker};

type Wizard = WizardStateMachine<TerminalHost>;

/// How often the installing page picks up worker events
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run(config_file: Option<std::path::PathBuf>, args: InstallArgs) -> Result<Exit> {
    let ctx = InstallerContext::load(args.source.clone(), config_file)?;
    let session = build_session(&ctx, &args)?;

    let check = HostCheck::new(&ctx.platform, &ctx.config);
    let worker = InstallationWorker::new(ctx.config.clone(), ctx.platform.clone());
    let host = TerminalHost::new(args.yes);
    let mut wizard = WizardStateMachine::new(host, session, worker, &ctx.source_root);

    let first = wizard.start(&check);
    tracing::debug!(page = %first, unattended = args.yes, "wizard started");

    let interrupted = interrupt_flag();
    if args.yes {
        drive_unattended(&mut wizard, &interrupted)
    } else {
        drive_interactive(&mut wizard, &interrupted)
    }
}

/// Raised by Ctrl-C while no prompt owns the terminal
fn interrupt_flag() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);
    if let Err(e) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst)) {
        tracing::warn!(error = %e, "could not install the Ctrl-C handler");
    }
    flag
}

/// Follow a running install on the interactive thread's own cadence.
///
/// Returns `false` when interrupted; the worker is left to die with the process.
fn follow_install(wizard: &mut Wizard, interrupted: &AtomicBool) -> bool {
    while wizard.is_running() {
        if interrupted.load(Ordering::SeqCst) {
            return false;
        }
        wizard.poll_timeout(POLL_INTERVAL);
    }
    !interrupted.load(Ordering::SeqCst)
}

fn build_session(ctx: &InstallerContext, args: &InstallArgs) -> Result<InstallationSession> {
    let mut session = InstallationSession::new(ctx.install_path(args.path.clone()));
    session.selected_components = selected_components(&args.components, &[Component::Gui])?;
    session.options = InstallOptions {
        launch_docs_after_install: args.launch_docs,
        install_secondary_tool: args.picoflasher,
        link_environment_profile: !args.no_profile,
    };
    session.terms_accepted = args.accept_terms;
    Ok(session)
}

/// Exit code for a dead-end page
fn closed_exit(page: PageId) -> Exit {
    match page {
        PageId::PrivilegeRequired => Exit::Failure,
        _ => Exit::Success,
    }
}

fn failed_run(wizard: &Wizard) -> Option<&InstallOutcome> {
    wizard.last_outcome().filter(|outcome| !outcome.is_success())
}

fn drive_unattended(wizard: &mut Wizard, interrupted: &AtomicBool) -> Result<Exit> {
    loop {
        if !follow_install(wizard, interrupted) {
            return Ok(cancelled_exit(wizard));
        }

        if wizard.current_page() == PageId::Installing {
            if let Some(outcome) = failed_run(wizard) {
                tracing::error!(%outcome, status = wizard.session().status(), "installation failed");
                return Ok(Exit::Failure);
            }
        }

        let page = wizard.current_page();
        match wizard.next() {
            Transition::Moved(_) | Transition::Retried | Transition::Busy => {}
            Transition::Blocked(reason) => {
                return Err(InstallerError::WizardBlocked {
                    page: page.to_string(),
                    reason,
                });
            }
            Transition::Finished | Transition::Ignored => return Ok(Exit::Success),
            Transition::Closed => return Ok(closed_exit(page)),
        }
    }
}

/// Navigation choices offered under each page
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Forward(String),
    Back,
    Cancel,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Forward(label) => f.write_str(label),
            Action::Back => f.write_str("Back"),
            Action::Cancel => f.write_str("Cancel"),
        }
    }
}

/// Component shown by its label in the selection prompt
#[derive(Debug, Clone, Copy)]
struct ComponentChoice(Component);

impl fmt::Display for ComponentChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.label())
    }
}

/// Prompt result with escape and Ctrl-C folded into `None`
fn skippable<T>(result: std::result::Result<Option<T>, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(value),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn cancelled_exit(wizard: &mut Wizard) -> Exit {
    wizard.cancel();
    match wizard.last_outcome() {
        Some(outcome) if outcome.is_success() => Exit::Success,
        Some(_) => Exit::Failure,
        None => Exit::Cancelled,
    }
}

fn drive_interactive(wizard: &mut Wizard, interrupted: &AtomicBool) -> Result<Exit> {
    loop {
        if !follow_install(wizard, interrupted) {
            return Ok(cancelled_exit(wizard));
        }

        let collected = match wizard.current_page() {
            PageId::Options => collect_options(wizard)?,
            PageId::Terms => collect_terms(wizard)?,
            _ => true,
        };
        if !collected {
            return Ok(cancelled_exit(wizard));
        }

        let Some(action) = choose_action(wizard)? else {
            return Ok(cancelled_exit(wizard));
        };

        let page = wizard.current_page();
        let transition = match action {
            Action::Forward(_) => wizard.next(),
            Action::Back => wizard.back(),
            Action::Cancel => return Ok(cancelled_exit(wizard)),
        };
        tracing::debug!(?transition, "navigation");

        match transition {
            Transition::Finished => return Ok(Exit::Success),
            Transition::Closed => return Ok(closed_exit(page)),
            Transition::Moved(_)
            | Transition::Blocked(_)
            | Transition::Retried
            | Transition::Busy
            | Transition::Ignored => {}
        }
    }
}

fn choose_action(wizard: &Wizard) -> Result<Option<Action>> {
    let host = wizard.host();
    let mut actions = Vec::new();
    if host.forward_enabled() {
        actions.push(Action::Forward(host.forward_label().to_string()));
    }
    if host.back_enabled() {
        actions.push(Action::Back);
    }
    actions.push(Action::Cancel);

    println!();
    skippable(
        Select::new(&wizard.page().title, actions)
            .with_help_message("↑↓ navigate  enter confirm  esc cancel")
            .prompt_skippable(),
    )
}

/// Ask for path, components and options; `false` when the user backed out
fn collect_options(wizard: &mut Wizard) -> Result<bool> {
    let session = wizard.session().clone();

    let Some(path) = skippable(
        Text::new("Installation path:")
            .with_initial_value(&session.install_path)
            .prompt_skippable(),
    )?
    else {
        return Ok(false);
    };
    wizard.set_install_path(path);

    let choices: Vec<ComponentChoice> = Component::ALL.into_iter().map(ComponentChoice).collect();
    let defaults: Vec<usize> = Component::ALL
        .iter()
        .enumerate()
        .filter(|(_, c)| session.has_component(**c))
        .map(|(i, _)| i)
        .collect();
    let Some(picked) = skippable(
        MultiSelect::new("Components to install:", choices)
            .with_default(&defaults)
            .with_help_message("↑↓ navigate  space select  enter confirm  esc cancel")
            .prompt_skippable(),
    )?
    else {
        return Ok(false);
    };
    let picked: BTreeSet<Component> = picked.into_iter().map(|choice| choice.0).collect();
    for component in Component::ALL {
        wizard.set_component(component, picked.contains(&component));
    }

    let mut options = session.options;
    let questions: [(&str, &mut bool); 3] = [
        (
            "Add the install path to your shell profile?",
            &mut options.link_environment_profile,
        ),
        ("Also install PicoFlasher?", &mut options.install_secondary_tool),
        (
            "Open the documentation when finished?",
            &mut options.launch_docs_after_install,
        ),
    ];
    for (question, value) in questions {
        let Some(answer) = skippable(Confirm::new(question).with_default(*value).prompt_skippable())?
        else {
            return Ok(false);
        };
        *value = answer;
    }
    wizard.set_options(options);

    Ok(true)
}

fn collect_terms(wizard: &mut Wizard) -> Result<bool> {
    let default = wizard.session().terms_accepted;
    let Some(accepted) = skippable(
        Confirm::new("I accept the terms and conditions")
            .with_default(default)
            .prompt_skippable(),
    )?
    else {
        return Ok(false);
    };
    wizard.set_terms_accepted(accepted);
    if !accepted {
        println!(
            "{}",
            Style::new()
                .yellow()
                .apply_to("You must accept the terms to continue.")
        );
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InstallerConfig, Pacing};
    use crate::platform::{HostPlatform, PlatformKind, SystemCheck};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    struct FreshHost;

    impl SystemCheck for FreshHost {
        fn lacks_required_privileges(&self) -> bool {
            false
        }

        fn existing_installation(&self) -> Option<PathBuf> {
            None
        }
    }

    fn started_wizard(source: &Path, dest: &Path, pacing: Pacing) -> Wizard {
        fs::create_dir_all(source.join("include")).unwrap();
        fs::write(source.join("include/gooey.h"), "// gooey").unwrap();

        let config = InstallerConfig {
            pacing,
            ..InstallerConfig::default()
        };
        let platform = HostPlatform::for_kind(PlatformKind::Linux, &config);
        let worker = InstallationWorker::new(config, platform);
        let mut session = InstallationSession::new(dest.display().to_string());
        session.set_component(Component::Gui, true);
        session.options.link_environment_profile = false;
        session.terms_accepted = true;

        let mut wizard = WizardStateMachine::new(TerminalHost::new(true), session, worker, source);
        wizard.start(&FreshHost);
        wizard
    }

    fn context() -> InstallerContext {
        let config = InstallerConfig::default();
        let platform = HostPlatform::current(&config);
        InstallerContext {
            config,
            platform,
            source_root: PathBuf::from("/payload"),
        }
    }

    #[test]
    fn test_build_session_from_flags() {
        let args = InstallArgs {
            path: Some("/opt/gooey".to_string()),
            no_profile: true,
            picoflasher: true,
            accept_terms: true,
            ..Default::default()
        };
        let session = build_session(&context(), &args).unwrap();

        assert_eq!(session.install_path, "/opt/gooey");
        assert_eq!(session.selected_components, BTreeSet::from([Component::Gui]));
        assert!(session.terms_accepted);
        assert!(!session.options.link_environment_profile);
        assert!(session.options.install_secondary_tool);
        assert!(!session.options.launch_docs_after_install);
    }

    #[test]
    fn test_build_session_rejects_unknown_component() {
        let mut args = InstallArgs::default();
        args.components.components = vec!["widgets".to_string()];
        assert!(matches!(
            build_session(&context(), &args),
            Err(InstallerError::UnknownComponent { .. })
        ));
    }

    #[test]
    fn test_closed_exit_codes() {
        assert_eq!(closed_exit(PageId::PrivilegeRequired), Exit::Failure);
        assert_eq!(closed_exit(PageId::AlreadyInstalled), Exit::Success);
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(Action::Forward("Install".to_string()).to_string(), "Install");
        assert_eq!(Action::Back.to_string(), "Back");
        assert_eq!(ComponentChoice(Component::Docs).to_string(), Component::Docs.label());
    }

    #[test]
    fn test_skippable_folds_cancellation() {
        let cancelled: std::result::Result<Option<bool>, InquireError> =
            Err(InquireError::OperationCanceled);
        assert_eq!(skippable(cancelled).unwrap(), None);

        let interrupted: std::result::Result<Option<bool>, InquireError> =
            Err(InquireError::OperationInterrupted);
        assert_eq!(skippable(interrupted).unwrap(), None);
    }

    #[test]
    fn test_unattended_run_follows_install_to_success() {
        let (source, dest) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let mut wizard = started_wizard(source.path(), dest.path(), Pacing::none());
        let interrupted = AtomicBool::new(false);

        assert_eq!(drive_unattended(&mut wizard, &interrupted).unwrap(), Exit::Success);
        assert_eq!(wizard.current_page(), PageId::Complete);
        assert!(wizard.last_outcome().is_some_and(InstallOutcome::is_success));
        assert!(dest.path().join("include").is_dir());
    }

    #[test]
    fn test_interrupt_during_install_cancels() {
        let (source, dest) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let pacing = Pacing {
            prepare_ms: 5_000,
            ..Pacing::none()
        };
        let mut wizard = started_wizard(source.path(), dest.path(), pacing);
        while wizard.current_page() != PageId::Installing {
            assert!(matches!(wizard.next(), Transition::Moved(_)));
        }
        assert!(wizard.is_running());

        let interrupted = AtomicBool::new(true);
        assert!(!follow_install(&mut wizard, &interrupted));
        assert_eq!(cancelled_exit(&mut wizard), Exit::Cancelled);
    }

    #[test]
    fn test_interrupt_between_pages_cancels() {
        let (source, dest) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let mut wizard = started_wizard(source.path(), dest.path(), Pacing::none());
        let interrupted = AtomicBool::new(true);

        assert_eq!(drive_unattended(&mut wizard, &interrupted).unwrap(), Exit::Cancelled);
        assert_eq!(wizard.current_page(), PageId::Welcome);
        assert!(!dest.path().join("include").exists());
    }
}
