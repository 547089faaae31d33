//! Completion client configuration.

use crate::error::{Error, Result};
use std::time::Duration;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable overriding the model.
pub const MODEL_ENV: &str = "OPENAI_MODEL";
/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
/// Environment variable for the `OpenAI-Organization` header.
pub const ORG_ENV: &str = "OPENAI_ORG";
/// Environment variable for the `OpenAI-Project` header.
pub const PROJECT_ENV: &str = "OPENAI_PROJECT";

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert startup consultant.";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings for talking to the chat-completion service.
///
/// Passed by value into the client; nothing here is process-global.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    model: String,
    temperature: f32,
    base_url: String,
    system_prompt: String,
    timeout: Duration,
    organization: Option<String>,
    project: Option<String>,
}

impl ClientConfig {
    /// Create a config with defaults and the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }

        Ok(Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: DEFAULT_BASE_URL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            organization: None,
            project: None,
        })
    }

    /// Resolve a config from an explicit key and the process environment.
    pub fn from_env(explicit_key: Option<String>) -> Result<Self> {
        Self::from_lookup(explicit_key, |name| std::env::var(name).ok())
    }

    /// Resolve a config using `lookup` for environment values.
    ///
    /// An explicit, non-blank key wins over `OPENAI_API_KEY`. Blank
    /// environment values are treated as unset.
    pub fn from_lookup<F>(explicit_key: Option<String>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let key = explicit_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| var(API_KEY_ENV))
            .ok_or(Error::MissingApiKey)?;

        let mut config = Self::new(key)?;
        if let Some(model) = var(MODEL_ENV) {
            config.model = model;
        }
        if let Some(base_url) = var(BASE_URL_ENV) {
            config = config.with_base_url(base_url)?;
        }
        config.organization = var(ORG_ENV);
        config.project = var(PROJECT_ENV);

        log::debug!("Resolved client config: {:?}", config);
        Ok(config)
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature. Must be within `0.0..=2.0`.
    pub fn with_temperature(mut self, temperature: f32) -> Result<Self> {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(Error::InvalidConfig(format!(
                "temperature must be between 0 and 2, got {temperature}"
            )));
        }
        self.temperature = temperature;
        Ok(self)
    }

    /// Set the API base URL (the part before `/chat/completions`).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::InvalidConfig(format!(
                "base URL must start with http:// or https://, got {base_url}"
            )));
        }
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Set the system persona sent with every prompt.
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The API key sent as a bearer token.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The sampling temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// The API base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The system persona.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// The request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Value for the `OpenAI-Organization` header, if set.
    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    /// Value for the `OpenAI-Project` header, if set.
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

// Keeps the key out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("organization", &self.organization)
            .field("project", &self.project)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_explicit_key_wins() {
        let config =
            ClientConfig::from_lookup(Some("sk-flag".into()), env(&[(API_KEY_ENV, "sk-env")]))
                .unwrap();
        assert_eq!(config.api_key(), "sk-flag");
    }

    #[test]
    fn test_env_key_used_when_no_flag() {
        let config = ClientConfig::from_lookup(None, env(&[(API_KEY_ENV, "sk-env")])).unwrap();
        assert_eq!(config.api_key(), "sk-env");
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.temperature(), DEFAULT_TEMPERATURE);
        assert_eq!(config.system_prompt(), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(
            config.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_missing_key() {
        let err = ClientConfig::from_lookup(None, env(&[])).unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));

        let err = ClientConfig::from_lookup(Some("  ".into()), env(&[(API_KEY_ENV, "")]))
            .unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::from_lookup(
            None,
            env(&[
                (API_KEY_ENV, "sk-env"),
                (MODEL_ENV, "gpt-4o-mini"),
                (BASE_URL_ENV, "http://localhost:8080/v1/"),
                (ORG_ENV, "org-1"),
                (PROJECT_ENV, ""),
            ]),
        )
        .unwrap();

        assert_eq!(config.model(), "gpt-4o-mini");
        assert_eq!(
            config.completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(config.organization(), Some("org-1"));
        assert_eq!(config.project(), None);
    }

    #[test]
    fn test_invalid_values() {
        let config = ClientConfig::new("sk").unwrap();
        assert!(matches!(
            config.clone().with_temperature(3.5),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            config.with_base_url("ftp://example.com"),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ClientConfig::new("sk-secret").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
