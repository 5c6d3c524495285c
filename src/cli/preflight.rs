//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::config::{KnowledgeMode, Settings};
use crate::error::{DaisyError, Result};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Talking to a model requires the runtime API key.
    Converse,
    /// Building the catalog requires Google credentials in live mode.
    Catalog,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Converse => {
            check_api_key(&settings.runtime.api_key_env)?;
            check_google_access(settings)?;
        }
        Operation::Catalog => {
            check_google_access(settings)?;
        }
    }
    Ok(())
}

/// Check that the runtime API key is configured.
pub fn check_api_key(var: &str) -> Result<()> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(()),
        Ok(_) => Err(DaisyError::Config(format!(
            "{var} is empty. Set it with: export {var}='...'"
        ))),
        Err(_) => Err(DaisyError::Config(format!(
            "{var} not set. Set it with: export {var}='...'"
        ))),
    }
}

/// In live mode, check for a token or the gcloud CLI.
fn check_google_access(settings: &Settings) -> Result<()> {
    if settings.knowledge.mode != KnowledgeMode::Live {
        return Ok(());
    }
    if std::env::var("GOOGLE_OAUTH_ACCESS_TOKEN").is_ok_and(|t| !t.trim().is_empty()) {
        return Ok(());
    }
    check_tool("gcloud")
}

/// Check if an external tool is available.
pub fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(DaisyError::Config(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(DaisyError::Config(format!("{} not found in PATH", name)))
        }
        Err(e) => Err(DaisyError::Config(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_in_static_mode_has_no_requirements() {
        assert!(check(Operation::Catalog, &Settings::default()).is_ok());
    }

    #[test]
    fn test_missing_api_key() {
        let err = check_api_key("DAISY_TEST_UNSET_API_KEY").unwrap_err();
        assert!(err.to_string().contains("DAISY_TEST_UNSET_API_KEY not set"));
    }
}
