//! Direct tool invocation, without a model.

use super::agents::load_catalog;
use crate::config::Settings;
use anyhow::Result;
use serde_json::{Map, Value};

/// Invoke `tool` on `agent` with `key=value` arguments and print its text.
pub async fn run_call(
    agent: &str,
    tool: &str,
    args: &[(String, String)],
    settings: Settings,
) -> Result<()> {
    let catalog = load_catalog(&settings).await?;
    let agent = catalog.get(agent)?;

    let arguments: Map<String, Value> = args
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();

    let output = agent
        .tools()
        .invoke(tool, Some(&Value::Object(arguments)))
        .await?;

    println!("{}", output);
    Ok(())
}
