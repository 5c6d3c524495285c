//! Interactive chat command with tool calling support.

use super::agents::load_catalog;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::runtime::{ChatSession, Runner};
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(agent: &str, model: Option<String>, settings: Settings) -> Result<()> {
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
    let mut chat = ChatSession::new(runner)?;

    println!("\n{}", style(format!("Daisy Chat: {}", chat.agent_name())).bold().cyan());
    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit. Use 'clear' to reset conversation.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            chat.clear_history();
            Output::info("Conversation history cleared.");
            continue;
        }

        match chat.send_message(input).await {
            Ok(response) => {
                for call in &response.tool_calls {
                    let mark = if call.ok {
                        style("✓").green()
                    } else {
                        style("✗").red()
                    };
                    println!("{} {}", style(format!("  [{}]", call.name)).dim(), mark);
                }
                println!("\n{} {}\n", style("Daisy:").cyan().bold(), response.content);
            }
            Err(e) => {
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}
