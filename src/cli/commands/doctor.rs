//! Doctor command - verify system requirements and configuration.

use crate::agents::{hub, knowledge, talent, AgentCatalog};
use crate::cli::Output;
use crate::config::{Instructions, KnowledgeMode, Settings};
use crate::graph::GraphCapability;
use console::style;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks. `config_path` is the file given with
/// `--config`, if any.
pub async fn run_doctor(settings: &Settings, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config_path = config_path.unwrap_or_else(Settings::default_config_path);

    Output::header("Daisy Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    let mut section = |title: &str, results: Vec<CheckResult>| {
        println!("{}", style(title).bold());
        for check in &results {
            check.print();
        }
        println!();
        checks.extend(results);
    };

    section(
        "Model Runtime",
        vec![check_api_key(&settings.runtime.api_key_env, &settings.runtime.base_url)],
    );
    section("Knowledge Hub", check_knowledge(settings));
    section("Knowledge Graph", vec![check_graph(settings).await]);
    section(
        "Configuration",
        vec![check_config_file(&config_path), check_instructions(settings)],
    );
    section("Agents", vec![check_catalog(settings).await]);

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Daisy.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Daisy is ready to use.");
    }

    Ok(())
}

/// Check that the runtime API key is configured.
fn check_api_key(var: &str, base_url: &str) -> CheckResult {
    match std::env::var(var) {
        Ok(key) if key.chars().count() > 12 => {
            let chars: Vec<char> = key.chars().collect();
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            CheckResult::ok(var, &format!("configured ({}...{}) for {}", head, tail, base_url))
        }
        Ok(key) if key.trim().is_empty() => {
            CheckResult::error(var, "empty", &format!("Set with: export {}='...'", var))
        }
        Ok(_) => CheckResult::warning(
            var,
            "set but looks too short",
            "Check the key for the configured endpoint",
        ),
        Err(_) => CheckResult::warning(
            var,
            "not set",
            &format!("Needed for 'daisy run' and 'daisy chat'. Set with: export {}='...'", var),
        ),
    }
}

fn check_knowledge(settings: &Settings) -> Vec<CheckResult> {
    let knowledge = &settings.knowledge;
    let mut results = vec![CheckResult::ok(
        "Data store",
        &format!(
            "{} / {} ({})",
            knowledge.project_id, knowledge.data_store_id, knowledge.data_store_region
        ),
    )];

    match knowledge.mode {
        KnowledgeMode::Static => results.push(CheckResult::ok("Mode", "static results")),
        KnowledgeMode::Live => {
            results.push(CheckResult::ok("Mode", "live (Vertex AI Search)"));
            if std::env::var("GOOGLE_OAUTH_ACCESS_TOKEN").is_ok_and(|t| !t.trim().is_empty()) {
                results.push(CheckResult::ok("Credentials", "GOOGLE_OAUTH_ACCESS_TOKEN"));
            } else {
                results.push(check_tool("gcloud", install_hint_gcloud()));
            }
        }
    }

    results
}

async fn check_graph(settings: &Settings) -> CheckResult {
    if settings.knowledge.mode == KnowledgeMode::Static {
        return CheckResult::ok("Neo4j", "not used in static mode");
    }
    match GraphCapability::resolve(&settings.graph).await {
        GraphCapability::Available(_) => CheckResult::ok(
            "Neo4j",
            &format!("connected ({})", settings.graph.uri.as_deref().unwrap_or_default()),
        ),
        GraphCapability::Unavailable { reason } => CheckResult::warning(
            "Neo4j",
            &format!("unavailable: {}", reason),
            "Ontology enrichment is skipped. Set NEO4J_URI, NEO4J_USERNAME and NEO4J_PASSWORD",
        ),
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str, hint: &str) -> CheckResult {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .to_string();
            CheckResult::ok(name, &version)
        }
        Ok(_) => CheckResult::error(name, "installed but not working", hint),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            CheckResult::error(name, "not found", hint)
        }
        Err(e) => CheckResult::error(name, &format!("error: {}", e), hint),
    }
}

/// Check if config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: daisy config edit",
        )
    }
}

fn check_instructions(settings: &Settings) -> CheckResult {
    match settings.instructions_dir() {
        None => CheckResult::ok("Instructions", "built-in"),
        Some(dir) if dir.is_dir() => {
            match Instructions::load(Some(dir.as_path()), &settings.instructions.variables) {
                Ok(instructions) => {
                    let overridden: Vec<&str> = [knowledge::NAME, talent::NAME, hub::NAME]
                        .into_iter()
                        .filter(|name| instructions.has_override(name))
                        .collect();
                    if overridden.is_empty() {
                        CheckResult::ok(
                            "Instructions",
                            &format!("built-in (no overrides in {})", dir.display()),
                        )
                    } else {
                        CheckResult::ok(
                            "Instructions",
                            &format!("{} overridden from {}", overridden.join(", "), dir.display()),
                        )
                    }
                }
                Err(e) => CheckResult::error(
                    "Instructions",
                    &e.to_string(),
                    "Each override file needs an `instruction = \"...\"` entry",
                ),
            }
        }
        Some(dir) => CheckResult::warning(
            "Instructions",
            &format!("{} does not exist", dir.display()),
            "Built-in instructions are used until the directory exists",
        ),
    }
}

async fn check_catalog(settings: &Settings) -> CheckResult {
    match AgentCatalog::bootstrap(settings).await {
        Ok(catalog) => CheckResult::ok("Catalog", &catalog.names().join(", ")),
        Err(e) => CheckResult::error(
            "Catalog",
            &e.to_string(),
            "Fix the knowledge settings or set DAISY_KNOWLEDGE_MODE=static",
        ),
    }
}

/// Platform-specific install hint for the gcloud CLI.
fn install_hint_gcloud() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install --cask google-cloud-sdk (or set GOOGLE_OAUTH_ACCESS_TOKEN)"
    } else {
        "Install from: https://cloud.google.com/sdk/docs/install (or set GOOGLE_OAUTH_ACCESS_TOKEN)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_missing_api_key_is_a_warning() {
        let result = check_api_key("DAISY_DOCTOR_UNSET_KEY", "http://localhost");
        assert_eq!(result.status, CheckStatus::Warning);
    }

    #[test]
    fn test_static_knowledge_needs_no_credentials() {
        let results = check_knowledge(&Settings::default());
        assert!(results.iter().all(|r| r.status == CheckStatus::Ok));
    }

    #[test]
    fn test_config_file_check_uses_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daisy.toml");
        assert_eq!(check_config_file(&path).status, CheckStatus::Warning);

        Settings::default().save_to(&path).unwrap();
        let result = check_config_file(&path);
        assert_eq!(result.status, CheckStatus::Ok);
        assert_eq!(result.message, path.display().to_string());
    }

    #[test]
    fn test_instructions_check_names_overridden_agents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("daisy_talent.toml"),
            "instruction = \"You scout for indie labels.\"\n",
        )
        .unwrap();
        let mut settings = Settings::default();
        settings.instructions.custom_dir = Some(dir.path().display().to_string());

        let result = check_instructions(&settings);
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.message.starts_with("daisy_talent overridden from"));

        std::fs::write(dir.path().join("daisy_knowledge.toml"), "persona = 1\n").unwrap();
        assert_eq!(check_instructions(&settings).status, CheckStatus::Error);
    }

    #[tokio::test]
    async fn test_catalog_check_in_static_mode() {
        let result = check_catalog(&Settings::default()).await;
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.message.contains("daisy_knowledge_hub"));
    }
}
