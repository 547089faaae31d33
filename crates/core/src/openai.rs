//! Blocking OpenAI chat completions client.

use crate::client::{CompletionClient, CompletionRequest};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use serde::Deserialize;

/// Chat completions client for the OpenAI API (or a compatible endpoint).
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    config: ClientConfig,
}

impl OpenAiClient {
    /// Create a client from an explicit config.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::InvalidConfig(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// The config this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl CompletionClient for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = self.config.completions_url();
        log::debug!(
            "POST {} (model {}, prompt {} chars)",
            url,
            request.model,
            request.prompt().map(str::len).unwrap_or(0)
        );

        let mut req = self
            .http
            .post(&url)
            .bearer_auth(self.config.api_key())
            .json(request);
        if let Some(org) = self.config.organization() {
            req = req.header("OpenAI-Organization", org);
        }
        if let Some(project) = self.config.project() {
            req = req.header("OpenAI-Project", project);
        }

        let resp = req.send().map_err(|e| Error::Transport(e.to_string()))?;
        let status = resp.status();
        let body = resp.text().map_err(|e| Error::Transport(e.to_string()))?;
        log::debug!("Response status: {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        extract_content(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Pull the first choice's message content out of a response body.
fn extract_content(body: &str) -> Result<String> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| Error::MalformedResponse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| Error::MalformedResponse("response contained no message content".into()))
}
