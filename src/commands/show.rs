//! Show persisted resources

use anyhow::{Context as _, Result, bail};
use declarative::ResourceData;
use std::collections::BTreeMap;
use std::path::Path;

use super::declarative::Project;
use crate::Context;
use crate::resource::command::{COMMAND, JSON_OUTPUT, TEXT_OUTPUT};
use crate::ui;

pub fn run(ctx: &Context, name: Option<&str>, json: bool) -> Result<()> {
    let project = Project::load(ctx, false)?;
    let records = select(&project.state.resources, name)?;

    if json {
        let out = serde_json::to_string_pretty(&records).context("Failed to serialize state")?;
        println!("{out}");
        return Ok(());
    }

    if records.is_empty() {
        ui::info(&format!(
            "No resources in {}",
            project.state_file.path().display()
        ));
        return Ok(());
    }

    ui::header("Resources");
    ui::dim(&format!("state: {}", project.state_file.path().display()));
    for (name, data) in &records {
        show_record(name, data, &project.working_dir);
    }
    Ok(())
}

fn select<'a>(
    resources: &'a BTreeMap<String, ResourceData>,
    name: Option<&str>,
) -> Result<BTreeMap<&'a str, &'a ResourceData>> {
    match name {
        None => Ok(resources.iter().map(|(k, v)| (k.as_str(), v)).collect()),
        Some(n) => match resources.get_key_value(n) {
            Some((k, v)) => Ok(BTreeMap::from([(k.as_str(), v)])),
            None => bail!("No persisted resource named '{n}'"),
        },
    }
}

fn show_record(name: &str, data: &ResourceData, working_dir: &Path) {
    ui::section(name);
    ui::kv("id", data.id().unwrap_or("(none)"));
    if let Some(command) = data.get_str(COMMAND) {
        ui::kv("command", &cmdkit::display::relativize(command, working_dir));
    }
    if let Some(text) = data.get_str(TEXT_OUTPUT) {
        ui::block("text_output", text);
    }
    if let Some(value) = data.get(JSON_OUTPUT) {
        let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        ui::block("json_output", &pretty);
    }
}
