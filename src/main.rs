mod cli;
mod commands;
mod config;
mod engine;
mod paths;
mod resource;
mod state;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;
use std::process::ExitCode;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub config: Option<String>,
    pub state: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config: cli.config,
        state: cli.state,
    };

    match cli.command {
        Command::Apply(args) => commands::declarative::apply(
            &ctx,
            args.target.as_deref(),
            args.dry_run,
            args.yes,
            args.keep_going,
        ),
        Command::Plan(args) => commands::declarative::plan(&ctx, args.target.as_deref()),
        Command::Destroy(args) => {
            commands::declarative::destroy(&ctx, args.target.as_deref(), args.yes)
        }
        Command::Show(args) => commands::show::run(&ctx, args.name.as_deref(), args.json),
        Command::Run(args) => commands::run::run(&ctx, &args.command, args.json),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "simplescript", &mut io::stdout());
            Ok(())
        }
    }
}

/// Print an error chain, with advice when a command failed to run
fn report(err: &anyhow::Error) {
    ui::error(&format!("{err:#}"));

    let Some(cause) = err.chain().find_map(|e| e.downcast_ref::<cmdkit::Error>()) else {
        return;
    };
    let category = cause.category();
    eprintln!("  {}: {}", category.description(), category.advice());
    if let Some(output) = cause.output().filter(|o| !o.trim().is_empty()) {
        eprintln!();
        for line in output.lines() {
            eprintln!("  | {line}");
        }
    }
}
