//! Execution engine - drives resource lifecycles to match a plan

use crate::context::{ApplyContext, ConfirmCallback, ProgressCallback};
use crate::diff::{Action, ReplaceReason, ResourceDiff};
use crate::planner::ExecutionPlan;
use crate::resource::Resource;
use crate::types::{ApplyResult, ExecuteOptions, ExecuteSummary, ResourceData};
use anyhow::{Context, Result};
use std::collections::BTreeMap;

/// Execute a plan against persisted state
///
/// Runs in two phases. First every `Refresh` change is checked with
/// [`Resource::exists`]: matching records are read and left alone, drifted
/// ones become replacements. The remaining changes are reported through
/// [`ProgressCallback::on_plan`], confirmed, and applied one at a time.
///
/// `state` is only modified after an operation fully succeeds, so a failed
/// create leaves the previous record in place. With `opts.fail_fast` the
/// first error is returned immediately; otherwise it is counted as a failure
/// and the remaining changes still run. Dry runs perform the drift checks
/// (which may run commands) but never create, replace or delete.
///
/// # Arguments
/// * `plan` - The execution plan to run
/// * `resource` - Lifecycle implementation for every change in the plan
/// * `state` - Persisted records by name, updated in place
/// * `opts` - Execution options (dry_run, fail_fast, verbose)
/// * `progress` - Progress callback
/// * `confirm` - Confirmation callback
///
/// # Returns
/// Summary of execution results
pub fn execute<P, C>(
    plan: ExecutionPlan,
    resource: &dyn Resource,
    state: &mut BTreeMap<String, ResourceData>,
    opts: &ExecuteOptions,
    progress: &mut P,
    confirm: &mut C,
) -> Result<ExecuteSummary>
where
    P: ProgressCallback,
    C: ConfirmCallback,
{
    let ctx = ApplyContext::new(opts.dry_run, opts.verbose);
    let mut summary = ExecuteSummary::default();

    // Phase 1: drift detection
    let mut pending = Vec::with_capacity(plan.changes.len());
    for change in plan.changes {
        if change.action != Action::Refresh {
            pending.push(change);
            continue;
        }

        match refresh(&change, resource, &ctx) {
            Ok(Some(data)) => {
                progress.on_refresh(&change.name, true);
                summary.add_result(&ApplyResult::NoChange);
                state.insert(change.name, data);
            }
            Ok(None) => {
                progress.on_refresh(&change.name, false);
                log::info!("{} drifted, scheduling replacement", change.address());
                pending.push(ResourceDiff {
                    action: Action::Replace {
                        reason: ReplaceReason::Drift,
                    },
                    ..change
                });
            }
            Err(e) if opts.fail_fast => {
                return Err(e.context(format!("Failed to check {}", change.address())));
            }
            Err(e) => {
                let result = ApplyResult::Failed {
                    error: format!("{e:#}"),
                };
                progress.on_resource_complete(&change.name, &result);
                summary.add_result(&result);
            }
        }
    }

    progress.on_plan(&pending);

    if pending.is_empty() {
        return Ok(summary);
    }

    if opts.dry_run {
        summary.skipped += pending.len();
        return Ok(summary);
    }

    // Phase 2: confirm and apply
    let prompt = format!("Apply {} change(s)?", pending.len());
    if !confirm.confirm(&prompt)? {
        summary.skipped += pending.len();
        return Ok(summary);
    }

    progress.on_batch_start(pending.len());
    for change in &pending {
        let description = change
            .declared
            .as_ref()
            .or(change.prior.as_ref())
            .map(|data| resource.describe(data))
            .unwrap_or_default();
        progress.on_resource_start(&change.name, &description);

        let result = match apply_change(change, resource, state, &ctx) {
            Ok(result) => result,
            Err(e) if opts.fail_fast => {
                let failed = ApplyResult::Failed {
                    error: format!("{e:#}"),
                };
                progress.on_resource_complete(&change.name, &failed);
                progress.on_batch_complete();
                return Err(e.context(format!("Failed to apply {}", change.address())));
            }
            Err(e) => ApplyResult::Failed {
                error: format!("{e:#}"),
            },
        };

        progress.on_resource_complete(&change.name, &result);
        summary.add_result(&result);
    }
    progress.on_batch_complete();

    Ok(summary)
}

/// Check a persisted record; `Some` carries the re-read record on a match
fn refresh(
    change: &ResourceDiff,
    resource: &dyn Resource,
    ctx: &ApplyContext,
) -> Result<Option<ResourceData>> {
    let Some(prior) = &change.prior else {
        return Ok(None);
    };

    if !resource.exists(prior, ctx)? {
        return Ok(None);
    }

    let mut data = prior.clone();
    resource.read(&mut data, ctx)?;
    Ok(Some(data))
}

/// Apply a single create, replace or delete and commit it to `state`
fn apply_change(
    change: &ResourceDiff,
    resource: &dyn Resource,
    state: &mut BTreeMap<String, ResourceData>,
    ctx: &ApplyContext,
) -> Result<ApplyResult> {
    match &change.action {
        Action::Create => {
            let data = create_from(change, resource, ctx)?;
            state.insert(change.name.clone(), data);
            Ok(ApplyResult::Created)
        }
        Action::Replace { .. } => {
            if let Some(prior) = &change.prior {
                let mut old = prior.clone();
                resource.delete(&mut old, ctx)?;
            }
            let data = create_from(change, resource, ctx)?;
            state.insert(change.name.clone(), data);
            Ok(ApplyResult::Replaced)
        }
        Action::Delete => {
            if let Some(prior) = &change.prior {
                let mut old = prior.clone();
                resource.delete(&mut old, ctx)?;
            }
            state.remove(&change.name);
            Ok(ApplyResult::Removed)
        }
        Action::Refresh => Ok(ApplyResult::NoChange),
    }
}

fn create_from(
    change: &ResourceDiff,
    resource: &dyn Resource,
    ctx: &ApplyContext,
) -> Result<ResourceData> {
    let mut data = change
        .declared
        .clone()
        .context("Resource has no declared attributes")?;
    data.clear_id();
    resource.create(&mut data, ctx)?;

    if !data.has_id() {
        anyhow::bail!("{} create did not set an id", resource.resource_type());
    }
    Ok(data)
}

/// Simple execution without callbacks
///
/// For basic use cases where you don't need progress or confirmation.
pub fn execute_simple(
    plan: ExecutionPlan,
    resource: &dyn Resource,
    state: &mut BTreeMap<String, ResourceData>,
    opts: &ExecuteOptions,
) -> Result<ExecuteSummary> {
    use crate::context::{AutoConfirm, NoProgress};

    execute(plan, resource, state, opts, &mut NoProgress, &mut AutoConfirm)
}
