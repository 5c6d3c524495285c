//! Agent instruction overrides and template rendering.
//!
//! Each agent ships a built-in instruction. A file named `<agent_name>.toml`
//! in the custom instructions directory replaces it:
//!
//! ```toml
//! instruction = "You are {{persona}}, ..."
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// On-disk shape of an instruction override.
#[derive(Debug, Deserialize)]
struct InstructionFile {
    instruction: String,
}

/// Instruction overrides plus the variables available to every instruction.
#[derive(Debug, Clone, Default)]
pub struct Instructions {
    overrides: HashMap<String, String>,
    variables: HashMap<String, String>,
}

impl Instructions {
    /// Load overrides from `custom_dir` (if any) and keep the custom variables.
    pub fn load(
        custom_dir: Option<&Path>,
        variables: &HashMap<String, String>,
    ) -> crate::error::Result<Self> {
        let mut overrides = HashMap::new();

        if let Some(dir) = custom_dir.filter(|d| d.is_dir()) {
            for entry in std::fs::read_dir(dir)? {
                let path = entry?.path();
                if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                    continue;
                }
                let Some(agent) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                let content = std::fs::read_to_string(&path)?;
                let file: InstructionFile = toml::from_str(&content)?;
                debug!("Loaded instruction override for {}", agent);
                overrides.insert(agent.to_string(), file.instruction);
            }
        }

        Ok(Self {
            overrides,
            variables: variables.clone(),
        })
    }

    /// Instruction for `agent_name`: the override if present, else `default`,
    /// rendered with the custom variables.
    pub fn resolve(&self, agent_name: &str, default: &str) -> String {
        let template = self
            .overrides
            .get(agent_name)
            .map(String::as_str)
            .unwrap_or(default);
        render(template, &self.variables)
    }

    /// Whether an override exists for `agent_name`.
    pub fn has_override(&self, agent_name: &str) -> bool {
        self.overrides.contains_key(agent_name)
    }
}

/// Render a `{{name}}` template with the given variables.
///
/// Unknown placeholders are left as they are.
pub fn render<I, K, V>(template: &str, vars: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key.as_ref()), value.as_ref());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        assert_eq!(render(template, &vars), "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(render("{{a}} {{b}}", [("a", "x")]), "x {{b}}");
    }

    #[test]
    fn test_resolve_without_overrides() {
        let instructions = Instructions::default();
        assert_eq!(instructions.resolve("daisy_talent", "built-in"), "built-in");
        assert!(!instructions.has_override("daisy_talent"));
    }

    #[test]
    fn test_load_override_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("daisy_talent.toml"),
            "instruction = \"You scout for {{label}}.\"\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut vars = HashMap::new();
        vars.insert("label".to_string(), "Sub Pop".to_string());

        let instructions = Instructions::load(Some(dir.path()), &vars).unwrap();
        assert!(instructions.has_override("daisy_talent"));
        assert_eq!(
            instructions.resolve("daisy_talent", "built-in"),
            "You scout for Sub Pop."
        );
        assert_eq!(instructions.resolve("daisy_knowledge", "built-in"), "built-in");
    }

    #[test]
    fn test_missing_dir_is_not_an_error() {
        let instructions =
            Instructions::load(Some(Path::new("/nonexistent/daisy")), &HashMap::new()).unwrap();
        assert!(!instructions.has_override("anything"));
    }
}
