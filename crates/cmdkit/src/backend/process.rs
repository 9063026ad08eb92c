//! Executor backed by real child processes.

use crate::backend::Executor;
use crate::error::{Error, Result};
use crate::types::CommandOutput;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Backend that spawns the program as a child process.
///
/// Stdout and stderr share one pipe, so the captured bytes interleave the
/// way the child wrote them. Stdin is closed. There is no timeout: a child
/// that never exits blocks the caller.
#[derive(Debug, Clone, Default)]
pub struct SystemExecutor {
    /// Directory the child runs in; `None` inherits the caller's
    current_dir: Option<PathBuf>,
}

impl SystemExecutor {
    /// Create an executor that inherits the caller's working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run children in `dir` instead of the caller's working directory.
    pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Directory children run in, if one was set.
    pub fn current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }
}

impl Executor for SystemExecutor {
    fn execute(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let (mut reader, writer) = io::pipe()?;

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        let spawned = command.spawn();
        // The builder still owns our copies of the write end; the reader
        // only sees EOF once they are gone.
        drop(command);

        let mut child = spawned.map_err(|source| Error::Launch {
            program: program.to_string(),
            source,
        })?;

        let mut output = Vec::new();
        let read = reader.read_to_end(&mut output);
        let status = child.wait()?;
        read?;

        log::debug!(
            "{} exited with {:?} ({} bytes of output)",
            program,
            status.code(),
            output.len()
        );

        Ok(CommandOutput {
            output,
            success: status.success(),
            code: status.code(),
        })
    }
}
