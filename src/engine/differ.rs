//! Plan display - simplescript-specific UI

use colored::Colorize;
use declarative::{Action, DiffSummary, ReplaceReason, ResourceData, ResourceDiff};
use std::path::Path;

use crate::resource::command::COMMAND;

/// Kind of marker shown in front of a planned change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Create,
    Replace,
    Check,
    Delete,
}

impl Marker {
    fn symbol(self) -> colored::ColoredString {
        match self {
            Marker::Create => "+".green(),
            Marker::Replace => "~".yellow(),
            Marker::Check => "?".dimmed(),
            Marker::Delete => "-".red(),
        }
    }
}

/// Command line of a record as shown to the user
fn command_of(data: Option<&ResourceData>, working_dir: &Path) -> Option<String> {
    data.and_then(|d| d.get_str(COMMAND))
        .map(|c| cmdkit::display::relativize(c, working_dir))
}

/// Marker and detail text for one planned change
pub fn describe_change(diff: &ResourceDiff, working_dir: &Path) -> (Marker, String) {
    let declared = command_of(diff.declared.as_ref(), working_dir);
    let prior = command_of(diff.prior.as_ref(), working_dir);

    match &diff.action {
        Action::Create => (
            Marker::Create,
            format!("(new) {}", declared.unwrap_or_default()),
        ),
        Action::Replace {
            reason: ReplaceReason::Changed { .. },
        } => (
            Marker::Replace,
            format!(
                "{} → {}",
                prior.unwrap_or_default(),
                declared.unwrap_or_default()
            ),
        ),
        Action::Replace {
            reason: ReplaceReason::Drift,
        } => (
            Marker::Replace,
            format!("(output changed) {}", declared.unwrap_or_default()),
        ),
        Action::Refresh => (
            Marker::Check,
            format!("(check output) {}", declared.unwrap_or_default()),
        ),
        Action::Delete => (
            Marker::Delete,
            format!("(will forget) {}", prior.unwrap_or_default()),
        ),
    }
}

/// Display a list of planned changes in a user-friendly format
pub fn display_diff(diffs: &[ResourceDiff], working_dir: &Path) {
    if diffs.is_empty() {
        println!();
        println!("  {} No changes needed", "✓".green());
        return;
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Planned Changes".bold()
    );
    println!("│");

    for diff in diffs {
        let (marker, detail) = describe_change(diff, working_dir);
        println!(
            "│   {} {:<30} {}",
            marker.symbol(),
            diff.address(),
            detail.dimmed()
        );
    }
    println!("│");

    let summary = DiffSummary::from_diffs(diffs);
    println!("├─────────────────────────────────────────────────────┤");
    let mut line = format!(
        "│ Summary: {} to create, {} to replace, {} to forget",
        summary.additions.to_string().green(),
        summary.replacements.to_string().yellow(),
        summary.removals.to_string().red()
    );
    if summary.refreshes > 0 {
        line.push_str(&format!(", {} to check", summary.refreshes));
    }
    println!("{line}");
    println!("└─────────────────────────────────────────────────────┘");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::CommandResource;

    fn diff(action: Action, declared: Option<&str>, prior: Option<&str>) -> ResourceDiff {
        ResourceDiff {
            name: "hello".to_string(),
            resource_type: "simplescript_run".to_string(),
            action,
            declared: declared.map(CommandResource::declare),
            prior: prior.map(|c| {
                let mut data = CommandResource::declare(c);
                data.set_id("abc");
                data
            }),
        }
    }

    #[test]
    fn test_describe_create() {
        let (marker, detail) = describe_change(
            &diff(Action::Create, Some("echo hi"), None),
            Path::new("/work"),
        );
        assert_eq!(marker, Marker::Create);
        assert_eq!(detail, "(new) echo hi");
    }

    #[test]
    fn test_describe_changed_command() {
        let action = Action::Replace {
            reason: ReplaceReason::Changed {
                attributes: vec![COMMAND.to_string()],
            },
        };
        let (marker, detail) = describe_change(
            &diff(action, Some("echo new"), Some("echo old")),
            Path::new("/work"),
        );
        assert_eq!(marker, Marker::Replace);
        assert_eq!(detail, "echo old → echo new");
    }

    #[test]
    fn test_describe_delete_uses_prior() {
        let (marker, detail) =
            describe_change(&diff(Action::Delete, None, Some("ls")), Path::new("/work"));
        assert_eq!(marker, Marker::Delete);
        assert_eq!(detail, "(will forget) ls");
    }

    #[cfg(unix)]
    #[test]
    fn test_describe_relativizes_program() {
        let (_, detail) = describe_change(
            &diff(Action::Refresh, Some("/work/bin/tool --flag"), None),
            Path::new("/work"),
        );
        assert_eq!(detail, "(check output) bin/tool --flag");
    }
}
