//! OpenAI-compatible `chat/completions` client (Groq by default).
//!
//! One blocking request per turn: no streaming, no retry, no explicit
//! timeout.

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{CompletionClient, CompletionSettings};
use crate::chat::prompt;
use crate::error::{AuthError, CompletionError};

pub struct GroqClient {
    http: Client,
    api_key: String,
    settings: CompletionSettings,
}

impl fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqClient")
            .field("api_key", &"<redacted>")
            .field("settings", &self.settings)
            .finish()
    }
}

impl GroqClient {
    /// Build a client for `api_key`. A missing or blank key is an
    /// [`AuthError::MissingApiKey`].
    pub fn initialize(
        api_key: Option<&str>,
        settings: CompletionSettings,
    ) -> Result<Self, AuthError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(AuthError::MissingApiKey)?;

        let http = Client::builder()
            .build()
            .map_err(|e| AuthError::ClientInit(e.to_string()))?;

        debug!(base_url = %settings.base_url, model = %settings.model, "completion client initialised");
        Ok(Self {
            http,
            api_key: api_key.to_owned(),
            settings,
        })
    }

    /// A client that ignores `HTTP_PROXY` and friends, for loopback tests.
    #[cfg(test)]
    pub(crate) fn direct(api_key: &str, settings: CompletionSettings) -> Self {
        Self {
            http: Client::builder().no_proxy().build().unwrap(),
            api_key: api_key.to_owned(),
            settings,
        }
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    fn request_body(&self, system_prompt: &str, conversation: &str) -> Value {
        json!({
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": conversation },
            ],
            "model": self.settings.model,
            "temperature": self.settings.temperature,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
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

fn first_reply(response: ChatCompletionResponse) -> Result<String, CompletionError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| CompletionError::InvalidResponse("response contained no message content".into()))
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
        context: &str,
    ) -> Result<String, CompletionError> {
        let conversation = prompt::conversation(context, user_text);
        let body = self.request_body(system_prompt, &conversation);
        debug!(model = %self.settings.model, prompt_len = conversation.len(), "requesting completion");

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "completion API returned an error status");
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;
        first_reply(parsed)
    }
}
