//! Validate command: run the path checks without installing

use console::Style;

use super::Exit;
use super::helpers::{InstallerContext, selected_components};
use crate::cli::ValidateArgs;
use crate::error::Result;
use crate::session::Component;
use crate::ui::{TerminalHost, WidgetHost};
use crate::validator::PathValidator;

pub fn run(config_file: Option<std::path::PathBuf>, args: ValidateArgs) -> Result<Exit> {
    let ctx = InstallerContext::load(None, config_file)?;
    let components = selected_components(&args.components, &[Component::Gui])?;
    let validator = PathValidator::new(ctx.platform.clone());

    let mut host = TerminalHost::new(args.yes);
    let destination = validator.validate(&args.path, &components, |warning| {
        host.confirm(warning.title(), &warning.message())
    })?;

    println!(
        "{} Installation path {} is valid",
        Style::new().green().bold().apply_to("✓"),
        Style::new().cyan().apply_to(destination.display())
    );
    Ok(Exit::Success)
}
