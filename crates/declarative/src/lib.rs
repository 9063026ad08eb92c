//! # Declarative
//!
//! A framework for declarative resource lifecycles.
//!
//! This crate provides the core abstractions for declaring resources,
//! persisting what was created, detecting drift on later runs, and
//! converging by creating, replacing or deleting instances.
//!
//! ## Core Concepts
//!
//! - **Resource**: A lifecycle implementation (create / exists / read / delete)
//! - **ResourceData**: The persisted record of one instance: id + attributes
//! - **ResourceDiff**: A planned action for one named instance
//! - **ExecutionPlan**: The ordered list of planned actions
//! - **Executor**: Checks drift, confirms, applies, commits on success
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{ExecuteOptions, ExecutionPlan, ResourceData, execute_simple};
//! use std::collections::BTreeMap;
//!
//! let declared = BTreeMap::from([(
//!     "hello".to_string(),
//!     ResourceData::new().with_attribute("command", "echo hello"),
//! )]);
//! let mut state = BTreeMap::new();
//!
//! let plan = ExecutionPlan::reconcile(&resource, &declared, &state);
//! let summary = execute_simple(plan, &resource, &mut state, &ExecuteOptions::default())?;
//! assert_eq!(summary.created, 1);
//! ```
//!
//! ## Callback Traits
//!
//! - [`ProgressCallback`]: Receives drift-check and apply progress
//! - [`ConfirmCallback`]: Handles user confirmations
//!
//! This allows the crate to be used without hard dependencies on
//! specific UI frameworks or prompt libraries.

pub mod context;
pub mod diff;
pub mod executor;
pub mod planner;
pub mod resource;
pub mod types;

// Re-export main types at crate root
pub use context::{
    ApplyContext, AutoConfirm, AutoDecline, ConfirmCallback, NoProgress, ProgressCallback,
};
pub use diff::{Action, DiffSummary, ReplaceReason, ResourceDiff, plan_changes};
pub use executor::{execute, execute_simple};
pub use planner::ExecutionPlan;
pub use resource::{BoxedResource, Resource, ResourceExt};
pub use types::{ApplyResult, ExecuteOptions, ExecuteSummary, ResourceData};
