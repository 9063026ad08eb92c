//! Resources managed by simplescript
//!
//! The lifecycle trait lives in the `declarative` crate; this module holds
//! the concrete implementations and the helpers the CLI uses to build them.

pub mod command;

pub use command::CommandResource;

use cmdkit::{Runner, SystemExecutor};
use std::path::Path;

/// Build the command resource, running processes in `working_dir`
pub fn command_resource(working_dir: &Path) -> CommandResource {
    let executor = SystemExecutor::new().with_current_dir(working_dir);
    CommandResource::new(Runner::with_executor(executor))
}
