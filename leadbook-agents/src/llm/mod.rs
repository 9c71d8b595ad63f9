mod openai;

pub use openai::OpenAiChatClient;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;

/// A single chat-completion request. Every agent call in this crate is one
/// system prompt plus one user message; there is no multi-turn state.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    /// When set, the provider is asked for schema-constrained JSON output;
    /// otherwise plain JSON mode is requested.
    pub response_schema: Option<ResponseSchema>,
}

#[derive(Debug, Clone)]
pub struct ResponseSchema {
    pub name: String,
    pub schema: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("response contained no message content")]
    MissingContent,
}

/// Chat-completion providers the agents can be wired to. The concrete client
/// is constructed once at startup and injected; handlers never build their
/// own.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError>;
}
