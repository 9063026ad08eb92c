//! # cmdkit
//!
//! Run declared command lines and fingerprint what they print.
//!
//! This crate provides functionality for:
//! - Splitting a command line into a program and arguments, honoring
//!   single- and double-quoted spans
//! - Running the program with stdout and stderr captured as one stream
//! - Decoding the output as a JSON object when it is one
//! - Fingerprinting command + output with SHA-256 for change detection
//!
//! ## Example
//!
//! ```no_run
//! use cmdkit::Runner;
//!
//! let runner = Runner::new();
//! let run = runner.run(r#"echo {"status":"ok"}"#)?;
//!
//! assert_eq!(run.text_output, "{\"status\":\"ok\"}\n");
//! assert!(run.json_output.is_some());
//! println!("id = {}", run.fingerprint);
//! # Ok::<(), cmdkit::Error>(())
//! ```
//!
//! ## Testing
//!
//! Process execution goes through the [`Executor`] trait. Supply your own
//! implementation with [`Runner::with_executor`] to test without spawning
//! processes.

pub mod backend;
pub mod display;
pub mod error;
pub mod fingerprint;
pub mod split;
pub mod types;

pub use backend::Executor;
pub use backend::process::SystemExecutor;
pub use error::{Error, ErrorCategory, Result};
pub use fingerprint::Fingerprint;
pub use split::{CommandLine, tokenize};
pub use types::{CommandOutput, Execution, decode_json_object};

/// High-level client for running declared command lines.
pub struct Runner {
    executor: Box<dyn Executor>,
}

impl Runner {
    /// Create a runner that spawns real processes.
    pub fn new() -> Self {
        Self::with_executor(backend::default_executor())
    }

    /// Create a runner with a custom executor (useful for testing).
    pub fn with_executor(executor: impl Executor + 'static) -> Self {
        Self {
            executor: Box::new(executor),
        }
    }

    /// Run a command line to completion.
    ///
    /// Fails if the line cannot be split, the program cannot be started, or
    /// it exits unsuccessfully. On success the output is decoded and
    /// fingerprinted.
    pub fn run(&self, command: &str) -> Result<Execution> {
        let line = split::parse(command)?;
        log::debug!("Running {} with {} argument(s)", line.program, line.args.len());

        let out = self.executor.execute(&line.program, &line.args)?;
        if !out.success {
            return Err(Error::Failed {
                command: command.to_string(),
                code: out.code,
                output: out.text(),
            });
        }

        Ok(Execution::from_output(command, &out.output))
    }

    /// Run a command line and return only its fingerprint.
    pub fn fingerprint(&self, command: &str) -> Result<Fingerprint> {
        Ok(self.run(command)?.fingerprint)
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}
