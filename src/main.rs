//! Daisy CLI entry point.

use anyhow::Result;
use clap::Parser;
use daisy::cli::{commands, Cli, Commands};
use daisy::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_deref().map(Settings::expand_path);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging; stderr keeps stdout free for MCP and command output
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("daisy={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    run(cli.command, settings, config_path).await
}

async fn run(command: Commands, settings: Settings, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Doctor => commands::run_doctor(&settings, config_path).await,
        Commands::Agents => commands::run_agents(settings).await,
        Commands::Show { agent } => commands::run_show(&agent, settings).await,
        Commands::Call { agent, tool, args } => {
            commands::run_call(&agent, &tool, &args, settings).await
        }
        Commands::Run { agent, task, model } => {
            commands::run_run(&agent, &task, model, settings).await
        }
        Commands::Chat { agent, model } => commands::run_chat(&agent, model, settings).await,
        Commands::Serve { host, port } => commands::run_serve(&host, port, settings).await,
        Commands::Mcp { agent } => commands::run_mcp(&agent, settings).await,
        Commands::Config { action } => commands::run_config(&action, settings, config_path),
    }
}
