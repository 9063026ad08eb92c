//! Command resource: run a declared command line, persist what it printed

use anyhow::{Context, Result};
use cmdkit::Runner;
use declarative::{ApplyContext, Resource, ResourceData};
use serde_json::Value;
use std::fmt;

/// Attribute holding the declared command line
pub const COMMAND: &str = "command";
/// Attribute holding the captured output as text
pub const TEXT_OUTPUT: &str = "text_output";
/// Attribute holding the captured output as a JSON object, when it is one
pub const JSON_OUTPUT: &str = "json_output";

/// A shell-free command whose identity is the hash of what it printed
///
/// Creating the resource runs the command and stores its output. Later
/// existence checks run the command again and compare fingerprints, so any
/// change in output shows up as drift and forces a re-create.
pub struct CommandResource {
    runner: Runner,
}

impl CommandResource {
    pub fn new(runner: Runner) -> Self {
        Self { runner }
    }

    /// Declared record for a command line
    pub fn declare(command: &str) -> ResourceData {
        ResourceData::new().with_attribute(COMMAND, command)
    }

    fn command(data: &ResourceData) -> Result<&str> {
        data.get_str(COMMAND)
            .context("missing required attribute `command`")
    }
}

impl fmt::Debug for CommandResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandResource").finish_non_exhaustive()
    }
}

impl Resource for CommandResource {
    fn resource_type(&self) -> &'static str {
        "simplescript_run"
    }

    fn describe(&self, data: &ResourceData) -> String {
        match data.get_str(COMMAND) {
            Some(command) => format!("Run `{command}`"),
            None => "Run command".to_string(),
        }
    }

    fn force_new_attributes(&self) -> &'static [&'static str] {
        &[COMMAND]
    }

    fn create(&self, data: &mut ResourceData, _ctx: &ApplyContext) -> Result<()> {
        let command = Self::command(data)?.to_string();
        let run = self
            .runner
            .run(&command)
            .with_context(|| format!("Failed to run `{command}`"))?;

        data.set(TEXT_OUTPUT, run.text_output);
        match run.json_output {
            Some(map) => data.set(JSON_OUTPUT, Value::Object(map)),
            None => {
                data.remove(JSON_OUTPUT);
            }
        }
        log::info!("Created `{command}` as {}", run.fingerprint);
        data.set_id(run.fingerprint);
        Ok(())
    }

    fn exists(&self, data: &ResourceData, _ctx: &ApplyContext) -> Result<bool> {
        let Some(id) = data.id() else {
            log::debug!("No id recorded, nothing to check");
            return Ok(false);
        };

        let command = Self::command(data)?;
        let current = self
            .runner
            .fingerprint(command)
            .with_context(|| format!("Failed to re-run `{command}`"))?;

        let in_sync = current.matches(id);
        if !in_sync {
            log::info!("Output of `{command}` changed: {id} -> {current}");
        }
        Ok(in_sync)
    }

    fn read(&self, _data: &mut ResourceData, _ctx: &ApplyContext) -> Result<()> {
        Ok(())
    }

    fn delete(&self, data: &mut ResourceData, _ctx: &ApplyContext) -> Result<()> {
        data.clear_id();
        Ok(())
    }
}
