//! Command implementations for the installer CLI

pub mod completions;
pub mod helpers;
pub mod install;
pub mod plan;
pub mod validate;
pub mod version;

/// Process exit status of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    /// Installation failed or the wizard ended on a blocking page
    Failure,
    /// The user left before the installation completed
    Cancelled,
}

impl Exit {
    pub fn code(self) -> i32 {
        match self {
            Exit::Success => 0,
            Exit::Failure => 1,
            Exit::Cancelled => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Exit::Success.code(), 0);
        assert_eq!(Exit::Failure.code(), 1);
        assert_eq!(Exit::Cancelled.code(), 2);
    }
}
