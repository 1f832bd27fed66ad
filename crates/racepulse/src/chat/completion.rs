//! Hosted text-completion client.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::config::CompletionConfig;
use crate::error::{Error, Result};
use crate::gateway::Transport;
use crate::settings::{load_api_key, SettingsStore};

use super::Responder;

/// Reply when no API key is stored. No request is made.
pub const MISSING_KEY_REPLY: &str =
    "Please set your Groq API key in the settings to enable AI-powered responses.";

/// Reply when the completion call fails for any reason.
pub const FAILURE_REPLY: &str =
    "Sorry, I encountered an error while generating a response. Please try again later.";

/// Chat-completions client that authenticates with a key from settings.
pub struct CompletionClient<T> {
    transport: T,
    settings: Arc<dyn SettingsStore>,
    config: CompletionConfig,
}

impl<T> std::fmt::Debug for CompletionClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("endpoint", &self.config.endpoint)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> CompletionClient<T> {
    /// Create a client.
    #[must_use]
    pub fn new(transport: T, settings: Arc<dyn SettingsStore>, config: CompletionConfig) -> Self {
        Self {
            transport,
            settings,
            config,
        }
    }

    /// Request body for a single user prompt.
    #[must_use]
    pub fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": self.config.system_prompt},
                {"role": "user", "content": prompt},
            ],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        })
    }

    /// Complete `prompt`, returning a reply that is always displayable.
    ///
    /// The key is read from settings on every call so a key saved mid-session
    /// takes effect immediately.
    pub async fn complete(&self, prompt: &str) -> String {
        let key = match load_api_key(self.settings.as_ref()) {
            Ok(Some(key)) => key,
            Ok(None) => return MISSING_KEY_REPLY.to_string(),
            Err(e) => {
                error!("Failed to read API key from settings: {e}");
                return FAILURE_REPLY.to_string();
            }
        };

        match self.request(&key, prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Error fetching completion: {e}");
                FAILURE_REPLY.to_string()
            }
        }
    }

    async fn request(&self, key: &str, prompt: &str) -> Result<String> {
        debug!(model = %self.config.model, "Requesting completion");
        let response = self
            .transport
            .post_json(&self.config.endpoint, key, &self.request_body(prompt))
            .await?;
        extract_content(&response)
    }
}

/// `choices[0].message.content` from a chat-completions response.
fn extract_content(response: &Value) -> Result<String> {
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::unexpected_payload("completion response has no message content"))
}

#[async_trait]
impl<T: Transport> Responder for CompletionClient<T> {
    async fn respond(&self, question: &str) -> String {
        self.complete(question).await
    }
}
