//! Text-completion backends.
//!
//! The pipeline talks to a [`CompletionBackend`]: given a prompt, a streaming
//! flag and a token budget it returns one or more completion choices whose
//! text is a newline-delimited block. [`ApiCompletionBackend`] calls an
//! OpenAI-style `/v1/completions` endpoint; [`MockCompletionBackend`] returns
//! canned continuations for offline runs.

use crate::config::Config;
use crate::error::{BlockError, Result};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

/// A single completion returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompletionChoice {
    pub text: String,
}

/// Backend reply: one or more completion choices.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

impl CompletionResponse {
    /// Builds a response holding a single choice.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![CompletionChoice { text: text.into() }],
        }
    }

    pub fn first_text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.text.as_str())
    }
}

#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        stream: bool,
        max_tokens: u32,
    ) -> Result<CompletionResponse>;
}

/// Backend calling a remote completion service over HTTP.
pub struct ApiCompletionBackend {
    http: Box<dyn HttpClient>,
    api_url: String,
    api_key: String,
    model: String,
}

impl ApiCompletionBackend {
    pub fn new(api_url: &str, api_key: &str, model: &str) -> Self {
        Self::with_http_client(Box::new(ReqwestHttpClient::new()), api_url, api_key, model)
    }

    /// Creates a backend with a custom HTTP client (for testing).
    pub fn with_http_client(
        http: Box<dyn HttpClient>,
        api_url: &str,
        api_key: &str,
        model: &str,
    ) -> Self {
        Self {
            http,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl CompletionBackend for ApiCompletionBackend {
    async fn complete(
        &self,
        prompt: &str,
        stream: bool,
        max_tokens: u32,
    ) -> Result<CompletionResponse> {
        let request_body = json!({
            "model": self.model,
            "prompt": prompt,
            "max_tokens": max_tokens,
            "stream": stream,
        });

        let authorization = format!("Bearer {}", self.api_key);
        let reply = self
            .http
            .post_json(
                &self.api_url,
                &[
                    ("Authorization", authorization.as_str()),
                    ("Content-Type", "application/json"),
                ],
                &request_body,
            )
            .await
            .map_err(|e| {
                BlockError::Backend(format!("request to {} failed: {}", self.api_url, e))
            })?;

        debug!("Completion service replied with status {}", reply.status);

        if !reply.is_success() {
            warn!("Completion service returned {}: {}", reply.status, reply.body);
            return Err(BlockError::Backend(format!(
                "completion service returned status {}: {}",
                reply.status, reply.body
            )));
        }

        let response: CompletionResponse = serde_json::from_str(&reply.body).map_err(|e| {
            BlockError::Backend(format!("malformed completion response ({}): {}", e, reply.body))
        })?;

        if response.choices.is_empty() {
            return Err(BlockError::Backend("completion response contained no choices".to_string()));
        }

        Ok(response)
    }
}

/// Offline backend returning canned continuations keyed by prompt shape.
pub struct MockCompletionBackend;

const MOCK_HOBBIES: [&str; 4] = [
    " is a competitive ballroom dancer",
    " spends weekends restoring vintage motorcycles",
    " writes poetry about quantum physics",
    " breeds championship pigeons",
];

const MOCK_DESCRIPTIONS: [&str; 3] = [
    " 42 years old, married, soft-spoken and meticulous. They studied engineering and keep a \
     detailed journal.",
    " 28 years old, single, adventurous and talkative. They majored in history and volunteer at \
     a local shelter.",
    " 55 years old, divorced, patient and curious. They trained as a nurse and collect antique \
     maps.",
];

impl MockCompletionBackend {
    pub fn new() -> Self {
        Self
    }

    fn continuation_for(prompt: &str) -> String {
        if prompt.contains("popular Western names") {
            "Michael\n4. Sarah\n5. James\n6. Emily\n7. Robert\n8. Jo".to_string()
        } else if prompt.contains("common occupations") {
            "Engineer\n4. Nurse\n5. Accountant\n6. Firefighter\n7. Librarian".to_string()
        } else if prompt.contains("unlikely pairing of jobs and hobbies") {
            let pick = MOCK_HOBBIES[prompt.len() % MOCK_HOBBIES.len()];
            format!("{}\n3. a pilot but afraid of heights", pick)
        } else if prompt.contains("descriptions of people with certain hobbies") {
            let pick = MOCK_DESCRIPTIONS[prompt.len() % MOCK_DESCRIPTIONS.len()];
            format!("{}\n3. Someone who", pick)
        } else {
            String::new()
        }
    }
}

impl Default for MockCompletionBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionBackend for MockCompletionBackend {
    async fn complete(
        &self,
        prompt: &str,
        _stream: bool,
        _max_tokens: u32,
    ) -> Result<CompletionResponse> {
        Ok(CompletionResponse::from_text(Self::continuation_for(prompt)))
    }
}

/// Chooses the backend described by `config`.
pub fn backend_from_config(config: &Config) -> anyhow::Result<Box<dyn CompletionBackend>> {
    if config.is_mock_mode() {
        info!("Using mock completion backend (COGBIAS_USE_MOCK=1)");
        return Ok(Box::new(MockCompletionBackend::new()));
    }

    if let Some(api_key) = config.get_api_key() {
        info!("Using completion service at {}", config.api_url);
        Ok(Box::new(ApiCompletionBackend::new(&config.api_url, api_key, &config.model)))
    } else {
        Err(anyhow::anyhow!(
            "No completion API key found. Please set it using one of these methods:

1. Set API key in config:
   cogbias --set-api-key <your-key>

2. Set environment variable:
   export COGBIAS_API_KEY=<your-key>

3. Check current config:
   cogbias --config

Or run offline with canned completions: cogbias --mock <category>"
        ))
    }
}
