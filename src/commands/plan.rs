//! Plan command: print the copy plan (dry run)

use std::path::Path;

use console::Style;

use super::Exit;
use super::helpers::{InstallerContext, selected_components};
use crate::cli::PlanArgs;
use crate::error::Result;
use crate::planner::{CopyCategory, FileCopyPlanner};
use crate::session::Component;

pub fn run(config_file: Option<std::path::PathBuf>, args: PlanArgs) -> Result<Exit> {
    let ctx = InstallerContext::load(args.source, config_file)?;
    let components = selected_components(&args.components, &Component::ALL)?;
    let install_path = ctx.install_path(args.path);
    let install_dir = Path::new(install_path.trim());

    let planner = FileCopyPlanner::new(&ctx.config, &ctx.platform);
    let layout = planner.layout(install_dir);
    let tasks = planner.plan(&ctx.source_root, install_dir, &components);

    let bold = Style::new().bold();
    println!("{} {}", bold.apply_to("Source:"), ctx.source_root.display());
    println!(
        "{} {} ({})",
        bold.apply_to("Destination:"),
        install_dir.display(),
        if layout.system { "system layout" } else { "custom layout" }
    );
    println!();

    if tasks.is_empty() {
        println!("Nothing to copy for the selected components.");
        return Ok(Exit::Success);
    }

    for task in &tasks {
        println!(
            "  {:<9} {:<28} -> {}",
            Style::new().cyan().apply_to(category_name(task.category)),
            task.display_name(),
            task.destination_directory.display()
        );
    }
    println!();
    println!("{} file(s) would be copied", tasks.len());

    Ok(Exit::Success)
}

fn category_name(category: CopyCategory) -> &'static str {
    match category {
        CopyCategory::Library => "library",
        CopyCategory::Headers => "header",
        CopyCategory::Docs => "docs",
        CopyCategory::Examples => "example",
    }
}
