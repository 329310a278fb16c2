//! Completion backend.
//!
//! [`CompletionClient`] is the seam between the chat loop and the hosted
//! inference API. [`GroqClient`] talks to any OpenAI-compatible
//! `chat/completions` endpoint; tests substitute scripted clients.

mod groq;

pub use groq::GroqClient;

use async_trait::async_trait;

use crate::error::CompletionError;

/// Groq's OpenAI-compatible API root.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Where and how completions are requested.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Stateless completion client: each call carries its full context.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate one reply.
    ///
    /// `context` is the serialised transcript; implementations combine it
    /// with `user_text` via [`crate::chat::prompt::conversation`]. Failures
    /// are returned, never raised.
    async fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
        context: &str,
    ) -> Result<String, CompletionError>;
}
