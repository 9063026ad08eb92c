//! Execution engine - simplescript executor with UI integration

use anyhow::{Context as AnyhowContext, Result};
use colored::Colorize;
use declarative::{
    ApplyResult, ConfirmCallback, ExecuteOptions, ExecuteSummary, ExecutionPlan,
    ProgressCallback, Resource, ResourceData, ResourceDiff,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use super::differ::display_diff;
use crate::ui;

/// Progress reporting on the terminal
pub struct TerminalProgress {
    working_dir: PathBuf,
    spinner: Option<ProgressBar>,
    show_spinner: bool,
}

impl TerminalProgress {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            spinner: None,
            show_spinner: std::io::stderr().is_terminal(),
        }
    }

    fn finish_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_refresh(&mut self, name: &str, in_sync: bool) {
        if in_sync {
            println!("  {} {} {}", "○".dimmed(), name, "up to date".dimmed());
        } else {
            println!("  {} {} {}", "~".yellow(), name, "output changed".yellow());
        }
    }

    fn on_plan(&mut self, changes: &[ResourceDiff]) {
        display_diff(changes, &self.working_dir);
    }

    fn on_batch_start(&mut self, count: usize) {
        println!();
        println!("  {} Applying {} change(s)...", "→".cyan(), count);
    }

    fn on_resource_start(&mut self, name: &str, description: &str) {
        if !self.show_spinner {
            return;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("{name}: {}", ui::truncate(description, 60)));
        pb.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(pb);
    }

    fn on_resource_complete(&mut self, name: &str, result: &ApplyResult) {
        self.finish_spinner();
        let symbol = match result {
            ApplyResult::NoChange => "○".dimmed(),
            ApplyResult::Created | ApplyResult::Replaced | ApplyResult::Removed => "✓".green(),
            ApplyResult::Failed { .. } => "✗".red(),
            ApplyResult::Skipped { .. } => "⊘".yellow(),
        };
        let detail = match result {
            ApplyResult::NoChange => "unchanged".to_string(),
            ApplyResult::Created => "created".to_string(),
            ApplyResult::Replaced => "replaced".to_string(),
            ApplyResult::Removed => "removed".to_string(),
            ApplyResult::Failed { error } => error.clone(),
            ApplyResult::Skipped { reason } => reason.clone(),
        };
        println!("  {} {} {}", symbol, name, detail.dimmed());
    }

    fn on_batch_complete(&mut self) {
        self.finish_spinner();
    }
}

/// Confirmation through an interactive prompt, or `--yes`
pub struct PromptConfirm {
    yes: bool,
}

impl PromptConfirm {
    pub fn new(yes: bool) -> Self {
        Self { yes }
    }
}

impl ConfirmCallback for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        if self.yes {
            return Ok(true);
        }

        if !std::io::stdin().is_terminal() {
            anyhow::bail!("Confirmation needs an interactive terminal; pass --yes to skip it");
        }

        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(true)
            .interact()
            .context("Failed to read confirmation")?;

        if !confirmed {
            println!();
            println!("  {} Aborted", "✗".red());
        }
        Ok(confirmed)
    }
}

/// Execute a plan with terminal progress and prompting
pub fn execute(
    plan: ExecutionPlan,
    resource: &dyn Resource,
    state: &mut BTreeMap<String, ResourceData>,
    opts: &ExecuteOptions,
    working_dir: PathBuf,
    yes: bool,
) -> Result<ExecuteSummary> {
    let mut progress = TerminalProgress::new(working_dir);
    let mut confirm = PromptConfirm::new(yes);

    let result = declarative::execute(plan, resource, state, opts, &mut progress, &mut confirm);
    progress.finish_spinner();

    let summary = result?;
    if opts.dry_run {
        println!();
        println!("  {} Dry run - no changes made", "ℹ".blue());
    } else if summary.total_changes() > 0 || !summary.is_success() {
        print_summary(&summary);
    }
    Ok(summary)
}

/// Print final summary
pub fn print_summary(summary: &ExecuteSummary) {
    println!();
    if summary.is_success() {
        println!("  {} Resources applied successfully!", "✓".green().bold());
    } else {
        println!("  {} Resources applied with errors", "⚠".yellow().bold());
    }

    if summary.created > 0 {
        println!("    • {} resources created", summary.created);
    }
    if summary.replaced > 0 {
        println!("    • {} resources replaced", summary.replaced);
    }
    if summary.removed > 0 {
        println!("    • {} resources removed", summary.removed);
    }
    if summary.skipped > 0 {
        println!("    • {} resources skipped", summary.skipped);
    }
    if summary.failed > 0 {
        println!("    • {} {} failed", summary.failed, "resources".red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_confirms_without_prompt() {
        let mut confirm = PromptConfirm::new(true);
        assert!(confirm.confirm("Apply?").unwrap());
    }

    #[test]
    fn test_progress_tolerates_completion_without_start() {
        let mut progress = TerminalProgress::new("/work");
        progress.on_resource_complete("a", &ApplyResult::Created);
        progress.on_batch_complete();
        assert!(progress.spinner.is_none());
    }
}
