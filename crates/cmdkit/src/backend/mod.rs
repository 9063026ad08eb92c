//! Backend abstraction for running processes.
//!
//! The [`Executor`] trait is the only place where a child process is
//! started. Code above it only sees captured bytes and a success flag,
//! which keeps the lifecycle logic testable without spawning anything.

pub mod process;

use crate::error::Result;
use crate::types::CommandOutput;
use std::sync::Arc;

/// Process-execution capability.
///
/// Implementations run `program` with `args` to completion and return the
/// combined stdout/stderr stream. A program that cannot be started is an
/// error; a program that starts and exits unsuccessfully is reported
/// through [`CommandOutput::success`].
pub trait Executor: Send + Sync {
    /// Run a program and capture its combined output.
    fn execute(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn execute(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        (**self).execute(program, args)
    }
}

impl<E: Executor + ?Sized> Executor for Arc<E> {
    fn execute(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        (**self).execute(program, args)
    }
}

/// Get the default executor (real child processes).
pub fn default_executor() -> process::SystemExecutor {
    process::SystemExecutor::new()
}
