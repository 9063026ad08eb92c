//! One-off execution of a command line, persisting nothing

use anyhow::{Context as _, Result};
use cmdkit::{Execution, Runner};

use crate::Context;
use crate::ui;

pub fn run(ctx: &Context, command: &str, json: bool) -> Result<()> {
    log::debug!("Running one-off command: {command}");

    let execution = Runner::new()
        .run(command)
        .with_context(|| format!("Failed to run `{command}`"))?;

    if json {
        let out =
            serde_json::to_string_pretty(&execution).context("Failed to serialize execution")?;
        println!("{out}");
        return Ok(());
    }

    print_execution(&execution, ctx.quiet);
    Ok(())
}

fn print_execution(execution: &Execution, quiet: bool) {
    if quiet {
        println!("{}", execution.fingerprint);
        return;
    }

    ui::header(&format!("`{}`", execution.command));
    ui::kv("id", execution.fingerprint.as_str());
    ui::block("text_output", &execution.text_output);
    match &execution.json_output {
        Some(map) => {
            let pretty = serde_json::to_string_pretty(map)
                .unwrap_or_else(|_| format!("{} key(s)", map.len()));
            ui::block("json_output", &pretty);
        }
        None => ui::kv("json_output", "(not a JSON object)"),
    }
}
