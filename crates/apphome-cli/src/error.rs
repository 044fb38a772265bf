//! CLI-specific error types and exit codes.

use apphome_core::PathError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The application context could not be initialized.
    #[error("Initialization failed: {0}")]
    Init(#[from] PathError),

    /// Argument or lookup error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Failure while running a command.
    #[error(transparent)]
    Command(#[from] anyhow::Error),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 78: Configuration error (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Init(_) => 78,     // EX_CONFIG
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Command(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_failures_exit_distinctly() {
        let err = CliError::from(PathError::EmptyPath);
        assert_eq!(err.exit_code(), 78);
        assert_ne!(
            err.exit_code(),
            CliError::Command(anyhow::anyhow!("boom")).exit_code()
        );
        assert_eq!(CliError::Arguments("x".into()).exit_code(), 2);
    }
}
