//! CLI module for Daisy.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Daisy - music-industry agents
///
/// Builds the DaisyAI knowledge, talent and knowledge-hub agents and exposes
/// their tools to an LLM runtime: locally, over MCP, or over HTTP.
#[derive(Parser, Debug)]
#[command(name = "daisy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "DAISY_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check system requirements and configuration
    Doctor,

    /// List available agents
    Agents,

    /// Show an agent's model, instruction and tools
    Show {
        /// Agent name (e.g., daisy_knowledge)
        agent: String,
    },

    /// Invoke one tool directly, without a model
    Call {
        /// Agent name
        agent: String,

        /// Tool name
        tool: String,

        /// Tool argument as key=value (repeatable)
        #[arg(short, long = "arg", value_parser = parse_key_value)]
        args: Vec<(String, String)>,
    },

    /// Run an agent once on a task
    Run {
        /// Agent name
        agent: String,

        /// The task for the agent (e.g., "Which venues suit a developing indie act?")
        task: String,

        /// Override the agent's model
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Start an interactive chat session with an agent
    Chat {
        /// Agent name
        agent: String,

        /// Override the agent's model
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Start MCP server exposing one agent's tools
    Mcp {
        /// Agent name
        agent: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    if key.trim().is_empty() {
        return Err(format!("missing key in '{}'", s));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("region=Latin America").unwrap(),
            ("region".to_string(), "Latin America".to_string())
        );
        assert_eq!(
            parse_key_value("query=a=b").unwrap(),
            ("query".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("genre").is_err());
        assert!(parse_key_value("=pop").is_err());
    }

    #[test]
    fn test_parse_call_command() {
        let cli = Cli::try_parse_from([
            "daisy",
            "call",
            "daisy_talent",
            "scout_venue_opportunities",
            "--arg",
            "artist_level=emerging",
            "-a",
            "region=Europe",
        ])
        .unwrap();
        match cli.command {
            Commands::Call { agent, tool, args } => {
                assert_eq!(agent, "daisy_talent");
                assert_eq!(tool, "scout_venue_opportunities");
                assert_eq!(args.len(), 2);
                assert_eq!(args[1], ("region".to_string(), "Europe".to_string()));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
