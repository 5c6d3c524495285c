//! Run command implementation.

use super::agents::load_catalog;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::runtime::Runner;
use anyhow::Result;

/// Run an agent once on a task.
pub async fn run_run(
    agent: &str,
    task: &str,
    model: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Converse, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'daisy doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let catalog = load_catalog(&settings).await?;
    let mut runner = Runner::new(catalog.get(agent)?, &settings.runtime)?;
    if let Some(model) = &model {
        runner = runner.with_model(model);
    }

    let spinner = Output::spinner(&format!("{} working...", agent));

    match runner.run(task).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.content);

            if !response.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", response.tool_calls.len()));
                for call in &response.tool_calls {
                    Output::tool_call(&call.to_string(), call.ok, &call.result);
                }
                println!();
            }

            Output::info(&format!(
                "Completed in {} iteration(s) with {}",
                response.iterations,
                runner.model()
            ));
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Agent failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
