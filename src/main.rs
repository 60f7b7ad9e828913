//! Gooey Framework installer
//!
//! A step-by-step installation wizard for the Gooey Framework: library, headers,
//! documentation and examples, copied into a system prefix or a custom directory.

use clap::Parser;
use miette::Diagnostic;

mod cli;
mod commands;
mod config;
mod docs;
mod error;
mod linker;
mod logging;
mod planner;
mod platform;
mod session;
mod ui;
mod validator;
mod wizard;
mod worker;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(cli.config, args),
        Commands::Validate(args) => commands::validate::run(cli.config, args),
        Commands::Plan(args) => commands::plan::run(cli.config, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    match result {
        Ok(exit) => std::process::exit(exit.code()),
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(help) = e.help() {
                eprintln!("  help: {}", help);
            }
            std::process::exit(1);
        }
    }
}
