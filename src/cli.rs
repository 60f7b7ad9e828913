//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Gooey Framework installer
///
/// Walks through path selection, components, license terms and the installation itself.
#[derive(Parser, Debug)]
#[command(
    name = "gooey-installer",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Installation wizard for the Gooey Framework",
    long_about = "Installs the Gooey Framework library, headers, documentation and examples \
                  either under a system prefix (/usr/local, /usr) or into a custom directory, \
                  and links the install path into your shell profile.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  sudo gooey-installer install\n    \
                  gooey-installer install --path ~/GooeyFramework --component gui --component docs\n    \
                  gooey-installer validate --path /opt/gooey\n    \
                  gooey-installer plan --source ./payload --path /usr/local\n\n\
                  \x1b[1m\x1b[32mDocumentation:\x1b[0m\n    \
                  https://github.com/BinaryInkTN/GooeyGUI/wiki"
)]
pub struct Cli {
    /// Extra configuration file, overrides installer.yaml in the payload
    #[arg(long, short = 'c', global = true, env = "GOOEY_INSTALLER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose (debug) logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the installation wizard
    Install(InstallArgs),

    /// Check an install path without installing
    Validate(ValidateArgs),

    /// Print the files an install would copy
    Plan(PlanArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Component selection shared by several commands
#[derive(Args, Debug, Clone, Default)]
pub struct ComponentArgs {
    /// Component to install: gui, docs or examples (repeatable)
    #[arg(long = "component", short = 'C', value_name = "COMPONENT")]
    pub components: Vec<String>,
}

/// Arguments for the install command
#[derive(Args, Debug, Clone, Default)]
#[command(after_help = "EXAMPLES:\n  \
                  Interactive install:\n    sudo gooey-installer install\n\n\
                  Unattended system install:\n    sudo gooey-installer install --accept-terms --yes\n\n\
                  Custom directory with docs, opening them afterwards:\n    \
                  gooey-installer install --path ~/GooeyFramework -C gui -C docs --launch-docs")]
pub struct InstallArgs {
    /// Payload directory containing lib/, include/, docs/ and examples/
    /// (defaults to the installer's own directory)
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Installation directory (defaults to /usr/local on Linux, ~/GooeyFramework elsewhere)
    #[arg(long, value_name = "DIR")]
    pub path: Option<String>,

    #[command(flatten)]
    pub components: ComponentArgs,

    /// Do not add GOOEY_PATH to the shell profile
    #[arg(long)]
    pub no_profile: bool,

    /// Also install PicoFlasher
    #[arg(long)]
    pub picoflasher: bool,

    /// Open the documentation when finishing
    #[arg(long)]
    pub launch_docs: bool,

    /// Accept the license terms up front
    #[arg(long)]
    pub accept_terms: bool,

    /// Non-interactive: take every step automatically and confirm warnings
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for the validate command
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Installation directory to check
    #[arg(long, value_name = "DIR")]
    pub path: String,

    #[command(flatten)]
    pub components: ComponentArgs,

    /// Accept a path outside the recommended system prefixes without asking
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for the plan command
#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Payload directory
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Installation directory
    #[arg(long, value_name = "DIR")]
    pub path: Option<String>,

    #[command(flatten)]
    pub components: ComponentArgs,
}

/// Arguments for completions command
#[derive(Args, Debug, Clone)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    gooey-installer completions --shell bash > ~/.bash_completion.d/gooey-installer\n\n\
                  Generate zsh completions:\n    gooey-installer completions --shell zsh > ~/.zfunc/_gooey-installer")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_install_defaults() {
        let cli = Cli::try_parse_from(["gooey-installer", "install"]).unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.path, None);
                assert!(args.components.components.is_empty());
                assert!(!args.no_profile);
                assert!(!args.yes);
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_parsing_install_with_options() {
        let cli = Cli::try_parse_from([
            "gooey-installer",
            "install",
            "--path",
            "/opt/gooey",
            "--component",
            "gui",
            "-C",
            "docs",
            "--no-profile",
            "--picoflasher",
            "--accept-terms",
            "-y",
        ])
        .unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.path.as_deref(), Some("/opt/gooey"));
                assert_eq!(args.components.components, vec!["gui", "docs"]);
                assert!(args.no_profile);
                assert!(args.picoflasher);
                assert!(args.accept_terms);
                assert!(args.yes);
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_parsing_validate_requires_path() {
        assert!(Cli::try_parse_from(["gooey-installer", "validate"]).is_err());
        let cli =
            Cli::try_parse_from(["gooey-installer", "validate", "--path", "/usr/local"]).unwrap();
        assert!(matches!(cli.command, Commands::Validate(_)));
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "gooey-installer",
            "plan",
            "--config",
            "custom.yaml",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
    }

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["gooey-installer", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli =
            Cli::try_parse_from(["gooey-installer", "completions", "--shell", "bash"]).unwrap();
        match cli.command {
            Commands::Completions(args) => assert_eq!(args.shell, "bash"),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_debug_assert() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
