//! Catalog inspection commands.

use crate::agents::AgentCatalog;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Build the catalog, reporting pre-flight problems first.
pub(crate) async fn load_catalog(settings: &Settings) -> Result<AgentCatalog> {
    if let Err(e) = preflight::check(Operation::Catalog, settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'daisy doctor' for detailed diagnostics.");
        return Err(e.into());
    }
    Ok(AgentCatalog::bootstrap(settings).await?)
}

/// List available agents.
pub async fn run_agents(settings: Settings) -> Result<()> {
    let catalog = load_catalog(&settings).await?;

    Output::header(&format!("Agents ({})", catalog.names().len()));
    println!();
    for agent in catalog.iter() {
        Output::agent_info(agent.name(), agent.description(), agent.tools().len());
    }
    println!();
    Output::kv("Model", &settings.agents.model);
    Output::kv("Knowledge mode", &settings.knowledge.mode.to_string());

    Ok(())
}

/// Show one agent in detail.
pub async fn run_show(name: &str, settings: Settings) -> Result<()> {
    let catalog = load_catalog(&settings).await?;
    let agent = catalog.get(name)?;

    Output::header(agent.name());
    Output::kv("Model", agent.model_id());
    Output::kv("Description", agent.description());

    Output::header("Instruction");
    println!("{}", agent.instruction());

    Output::header(&format!("Tools ({})", agent.tools().len()));
    for tool in agent.tools().iter() {
        let params: Vec<String> = tool
            .params()
            .iter()
            .map(|p| match &p.default {
                Some(default) => format!("{}=\"{}\"", p.name, default),
                None => p.name.clone(),
            })
            .collect();
        Output::list_item(&format!("{}({})", tool.name(), params.join(", ")));
        println!("      {}", tool.description());
    }

    Ok(())
}
