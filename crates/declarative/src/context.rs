//! Apply context and callback traits
//!
//! These traits allow the declarative crate to be used without
//! depending on a specific terminal UI or prompt implementation.

use crate::diff::ResourceDiff;
use crate::types::ApplyResult;
use anyhow::Result;

/// Progress callback for execution operations
///
/// Implement this trait to receive progress updates during execution.
pub trait ProgressCallback: Send {
    /// Called after a persisted resource was checked for drift
    fn on_refresh(&mut self, name: &str, in_sync: bool);

    /// Called with the pending changes once drift detection is done,
    /// before confirmation
    fn on_plan(&mut self, changes: &[ResourceDiff]);

    /// Called when starting to apply a batch of changes
    fn on_batch_start(&mut self, count: usize);

    /// Called when starting to apply a single change
    fn on_resource_start(&mut self, name: &str, description: &str);

    /// Called when a change completes
    fn on_resource_complete(&mut self, name: &str, result: &ApplyResult);

    /// Called when a batch completes
    fn on_batch_complete(&mut self);
}

/// Confirmation callback for user interaction
///
/// Implement this trait to handle user confirmations.
pub trait ConfirmCallback: Send {
    /// Ask the user to confirm an action
    ///
    /// # Arguments
    /// * `prompt` - The confirmation prompt to show
    ///
    /// # Returns
    /// `true` if the user confirmed, `false` otherwise
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_refresh(&mut self, _name: &str, _in_sync: bool) {}
    fn on_plan(&mut self, _changes: &[ResourceDiff]) {}
    fn on_batch_start(&mut self, _count: usize) {}
    fn on_resource_start(&mut self, _name: &str, _description: &str) {}
    fn on_resource_complete(&mut self, _name: &str, _result: &ApplyResult) {}
    fn on_batch_complete(&mut self) {}
}

/// Auto-confirm callback (always returns true)
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Auto-decline callback (always returns false)
pub struct AutoDecline;

impl ConfirmCallback for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(false)
    }
}

/// Context passed to resource lifecycle operations
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyContext {
    /// Whether this is a dry run (no actual changes)
    pub dry_run: bool,
    /// Whether to output verbose information
    pub verbose: bool,
}

impl ApplyContext {
    /// Create a new apply context
    pub fn new(dry_run: bool, verbose: bool) -> Self {
        Self { dry_run, verbose }
    }
}
