//! Shell completions command

use clap::CommandFactory;

use super::Exit;
use crate::cli::CompletionsArgs;
use crate::error::{InstallerError, Result};

/// Generate shell completions
pub fn run(args: CompletionsArgs) -> Result<Exit> {
    let shell = parse_shell(&args.shell)?;
    let mut cmd = <crate::cli::Cli as CommandFactory>::command();
    clap_complete::generate(shell, &mut cmd, "gooey-installer", &mut std::io::stdout().lock());
    Ok(Exit::Success)
}

fn parse_shell(name: &str) -> Result<clap_complete::Shell> {
    match name.to_lowercase().as_str() {
        "bash" => Ok(clap_complete::Shell::Bash),
        "elvish" => Ok(clap_complete::Shell::Elvish),
        "fish" => Ok(clap_complete::Shell::Fish),
        "powershell" | "pwsh" => Ok(clap_complete::Shell::PowerShell),
        "zsh" => Ok(clap_complete::Shell::Zsh),
        _ => Err(InstallerError::UnknownShell {
            name: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shell() {
        assert_eq!(parse_shell("bash").unwrap(), clap_complete::Shell::Bash);
        assert_eq!(parse_shell("Zsh").unwrap(), clap_complete::Shell::Zsh);
        assert_eq!(parse_shell("pwsh").unwrap(), clap_complete::Shell::PowerShell);
    }

    #[test]
    fn test_unknown_shell_is_an_error() {
        assert!(matches!(
            parse_shell("tcsh"),
            Err(InstallerError::UnknownShell { .. })
        ));
    }

    #[test]
    fn test_completions_fish() {
        let args = CompletionsArgs {
            shell: "fish".to_string(),
        };
        assert_eq!(run(args).unwrap(), Exit::Success);
    }
}
