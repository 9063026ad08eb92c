//! Error types for command execution.
//!
//! Errors are categorized so a caller (usually a reconciliation host) can
//! decide whether to halt, report, or carry on. Nothing in this crate
//! terminates the process on failure.

use thiserror::Error;

/// Categories of command errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The command line could not be split into a program and arguments
    Parse,
    /// The program does not exist or is not on `PATH`
    NotFound,
    /// The program exists but could not be executed
    Permission,
    /// The program ran and reported failure
    NonZeroExit,
    /// Reading the output pipe or another IO operation failed
    Io,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Parse => "Invalid command line",
            Self::NotFound => "Command not found",
            Self::Permission => "Permission denied",
            Self::NonZeroExit => "Command failed",
            Self::Io => "IO error",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Parse => "Check that every quoted argument has a closing quote",
            Self::NotFound => "Check the program name or use an absolute path",
            Self::Permission => "Check that the program is executable",
            Self::NonZeroExit => "Inspect the captured output for the cause",
            Self::Io => "Check the error details for more information",
        }
    }
}

/// Errors that can occur while parsing or running a command line.
#[derive(Debug, Error)]
pub enum Error {
    /// The command line has no program name
    #[error("empty command")]
    EmptyCommand,

    /// A quoted argument was opened but never closed
    #[error("unterminated {delimiter} quote in `{fragment}`")]
    UnterminatedQuote {
        /// The quote character that opened the span
        delimiter: char,
        /// The text absorbed by the open span, starting at the quote
        fragment: String,
    },

    /// The child process could not be started
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        /// Program that was being started
        program: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// The child process exited unsuccessfully
    #[error("command `{command}` failed with {}", describe_exit(.code))]
    Failed {
        /// The raw command line as declared
        command: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// Combined stdout/stderr captured before the failure
        output: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::EmptyCommand | Error::UnterminatedQuote { .. } => ErrorCategory::Parse,
            Error::Launch { source, .. } => match source.kind() {
                std::io::ErrorKind::NotFound => ErrorCategory::NotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCategory::Permission,
                _ => ErrorCategory::Io,
            },
            Error::Failed { .. } => ErrorCategory::NonZeroExit,
            Error::Io(_) => ErrorCategory::Io,
        }
    }

    /// Captured output of a failed command, if any.
    pub fn output(&self) -> Option<&str> {
        match self {
            Error::Failed { output, .. } => Some(output),
            _ => None,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "termination by signal".to_string(),
    }
}

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Error>;
