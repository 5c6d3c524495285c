//! Chat-completions client for an OpenAI-compatible endpoint.

use crate::config::RuntimeSettings;
use crate::error::{DaisyError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create a client for the configured endpoint.
///
/// The API key is read from the environment variable named by
/// `api_key_env`.
pub fn create_client(settings: &RuntimeSettings) -> Result<Client<OpenAIConfig>> {
    let api_key = std::env::var(&settings.api_key_env)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| DaisyError::Config(format!("{} is not set", settings.api_key_env)))?;

    create_client_with_key(settings, &api_key)
}

/// Create a client with an explicit API key.
pub fn create_client_with_key(
    settings: &RuntimeSettings,
    api_key: &str,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_seconds))
        .build()?;

    let config = OpenAIConfig::new()
        .with_api_base(settings.base_url.trim_end_matches('/'))
        .with_api_key(api_key);

    Ok(Client::with_config(config).with_http_client(http_client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key() {
        let settings = RuntimeSettings {
            api_key_env: "DAISY_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..RuntimeSettings::default()
        };
        let err = create_client(&settings).unwrap_err();
        assert!(err.to_string().contains("DAISY_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn test_client_with_explicit_key() {
        let settings = RuntimeSettings {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..RuntimeSettings::default()
        };
        assert!(create_client_with_key(&settings, "test-key").is_ok());
    }
}
