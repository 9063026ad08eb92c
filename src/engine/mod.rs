//! Execution engine for simplescript
//!
//! Planning and lifecycle execution live in the `declarative` crate. The
//! engine adds the terminal side:
//! 1. Displaying - Show planned changes with display-form commands
//! 2. Progress - Report drift checks and applied changes
//! 3. Confirming - Prompt before changing anything unless `--yes`

pub mod differ;
pub mod executor;

pub use executor::execute;
