use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::paths::ENV_CONFIG;

#[derive(Parser)]
#[command(name = "simplescript")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(
    about = "Run declared commands once and re-run them when their output drifts",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file declaring resources (default: ./simplescript.toml)
    #[arg(long, global = true, env = ENV_CONFIG)]
    pub config: Option<String>,

    /// State file (default: one per config in $SIMPLESCRIPT_STATE_DIR)
    #[arg(long, global = true)]
    pub state: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create declared resources and re-create drifted ones
    Apply(ApplyArgs),

    /// Show what apply would change (runs commands to check for drift)
    Plan(TargetArgs),

    /// Forget persisted resources
    Destroy(DestroyArgs),

    /// Show persisted resources
    Show(ShowArgs),

    /// Run a command line once and print its outputs and id
    Run(RunArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct TargetArgs {
    /// Only this resource ("name" or "simplescript_run.name")
    pub target: Option<String>,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Only this resource ("name" or "simplescript_run.name")
    pub target: Option<String>,

    /// Check for drift but don't change anything
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Keep going after a failing resource
    #[arg(long)]
    pub keep_going: bool,
}

#[derive(Args)]
pub struct DestroyArgs {
    /// Only this resource ("name" or "simplescript_run.name")
    pub target: Option<String>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Resource name (all resources if omitted)
    pub name: Option<String>,

    /// Print persisted records as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct RunArgs {
    /// Command line as one argument, split on spaces with quote grouping
    #[arg(allow_hyphen_values = true)]
    pub command: String,

    /// Print the execution as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply() {
        let cli = Cli::try_parse_from(["simplescript", "-vv", "apply", "hello", "--dry-run"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Apply(args) => {
                assert_eq!(args.target.as_deref(), Some("hello"));
                assert!(args.dry_run);
                assert!(!args.yes);
            }
            _ => panic!("expected apply"),
        }
    }

    #[test]
    fn test_parse_run_keeps_hyphen_arguments() {
        let cli = Cli::try_parse_from(["simplescript", "run", "-la"]).unwrap();
        match cli.command {
            Command::Run(args) => assert_eq!(args.command, "-la"),
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_run_keeps_quoted_arguments() {
        let cli = Cli::try_parse_from(["simplescript", "run", "ls -la \"my dir\""]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let parsed = cmdkit::split::parse(&args.command).unwrap();
        assert_eq!(parsed.program, "ls");
        assert_eq!(parsed.args, ["-la", "my dir"]);
    }

    #[test]
    fn test_parse_run_rejects_split_command() {
        assert!(Cli::try_parse_from(["simplescript", "run", "ls", "my dir"]).is_err());
        assert!(Cli::try_parse_from(["simplescript", "run"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["simplescript", "show", "--state", "/tmp/s.json", "-q"]).unwrap();
        assert_eq!(cli.state.as_deref(), Some("/tmp/s.json"));
        assert!(cli.quiet);
    }
}
