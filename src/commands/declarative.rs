//! Declarative commands for simplescript
//!
//! - `apply` - Create declared resources and re-create drifted ones
//! - `plan` - Preview what apply would change
//! - `destroy` - Forget persisted resources

use anyhow::{Result, bail};
use declarative::{ExecuteOptions, ExecuteSummary, ExecutionPlan};
use std::path::PathBuf;

use crate::Context;
use crate::config::Config;
use crate::engine;
use crate::paths;
use crate::resource::{self, CommandResource};
use crate::state::{SimplescriptState, StateFile};
use crate::ui;

/// Config, state and working directory for one invocation
pub struct Project {
    pub config: Config,
    pub working_dir: PathBuf,
    pub state_file: StateFile,
    pub state: SimplescriptState,
}

impl Project {
    /// Load config and state
    ///
    /// When `config_required` is false a missing default config file is
    /// treated as an empty one rooted at the current directory.
    pub fn load(ctx: &Context, config_required: bool) -> Result<Self> {
        let config_path = paths::config_file(ctx.config.as_deref());
        let config = if config_required || ctx.config.is_some() || config_path.exists() {
            Config::load(&config_path)?
        } else {
            log::debug!("No {} found, using empty config", config_path.display());
            Config::default()
        };
        let working_dir = config.working_dir(&config_path)?;
        log::debug!("Working directory: {}", working_dir.display());

        let state_file = StateFile::resolve(ctx.state.as_deref(), &config_path)?;
        let state = state_file.load()?;

        Ok(Self {
            config,
            working_dir,
            state_file,
            state,
        })
    }

    pub fn resource(&self) -> CommandResource {
        resource::command_resource(&self.working_dir)
    }

    /// Fail if `target` names neither a declared nor a persisted resource
    fn check_target(&self, target: Option<&str>) -> Result<()> {
        let Some(target) = target else {
            return Ok(());
        };
        let name = target.rsplit('.').next().unwrap_or(target);
        if !self.config.resources.contains_key(name) && !self.state.resources.contains_key(name)
        {
            bail!("No resource named '{target}'");
        }
        Ok(())
    }
}

/// Make persisted state match the declared resources
pub fn apply(
    ctx: &Context,
    target: Option<&str>,
    dry_run: bool,
    yes: bool,
    keep_going: bool,
) -> Result<()> {
    ui::header(if dry_run { "Plan" } else { "Applying Resources" });

    let mut project = Project::load(ctx, true)?;
    project.check_target(target)?;
    let resource = project.resource();

    let declared = project.config.declared();
    let plan = ExecutionPlan::reconcile(&resource, &declared, &project.state.resources)
        .filter_by_target(target);
    if plan.has_refreshes() && !ctx.quiet {
        ui::dim("Re-running persisted commands to check for drift...");
    }

    let opts = ExecuteOptions {
        dry_run,
        fail_fast: !keep_going,
        verbose: ctx.verbose > 0,
    };
    run_and_save(&mut project, plan, &resource, &opts, yes)
}

/// Preview what apply would change
pub fn plan(ctx: &Context, target: Option<&str>) -> Result<()> {
    apply(ctx, target, true, false, true)
}

/// Forget persisted resources
pub fn destroy(ctx: &Context, target: Option<&str>, yes: bool) -> Result<()> {
    ui::header("Destroying Resources");

    let mut project = Project::load(ctx, false)?;
    project.check_target(target)?;
    let resource = project.resource();

    let plan =
        ExecutionPlan::destroy(&resource, &project.state.resources).filter_by_target(target);
    let opts = ExecuteOptions::default();
    run_and_save(&mut project, plan, &resource, &opts, yes)
}

/// Execute a plan and persist the state, even when execution failed
fn run_and_save(
    project: &mut Project,
    plan: ExecutionPlan,
    resource: &CommandResource,
    opts: &ExecuteOptions,
    yes: bool,
) -> Result<()> {
    let result = engine::execute(
        plan,
        resource,
        &mut project.state.resources,
        opts,
        project.working_dir.clone(),
        yes,
    );

    if !opts.dry_run {
        let saved = project.state_file.touch(&mut project.state);
        if let Err(e) = &saved
            && result.is_err()
        {
            log::error!("Failed to save state: {e:#}");
        }
        let summary = result?;
        saved?;
        return check_summary(&summary);
    }

    check_summary(&result?)
}

fn check_summary(summary: &ExecuteSummary) -> Result<()> {
    if !summary.is_success() {
        bail!("{} resource(s) failed", summary.failed);
    }
    Ok(())
}
