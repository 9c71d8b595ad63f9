use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use super::{ChatClient, ChatRequest, ChatResponse, LlmError};

const OPENAI_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// OpenAI chat-completions client. Retries live in the calling agent's
/// [`crate::retry::RetryPolicy`], not here; one `complete` call is one HTTP
/// request.
pub struct OpenAiChatClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiChatClient {
    pub fn new(api_key: &str) -> Result<Self, LlmError> {
        Self::with_base_url(api_key, OPENAI_CHAT_COMPLETIONS_URL)
    }

    /// Point the client at a different completions endpoint, e.g. a local
    /// proxy in development.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
        })
    }

    fn request_body(request: &ChatRequest) -> serde_json::Value {
        let response_format = match &request.response_schema {
            Some(schema) => json!({
                "type": "json_schema",
                "json_schema": {
                    "name": schema.name,
                    "schema": schema.schema,
                    "strict": true,
                }
            }),
            None => json!({ "type": "json_object" }),
        };

        let mut body = json!({
            "model": request.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
            "max_tokens": request.max_tokens,
            "response_format": response_format,
        });

        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }

        body
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let body = Self::request_body(&request);

        let response = self
            .http
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value = response.json().await?;

        let content = payload
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or(LlmError::MissingContent)?;

        Ok(ChatResponse {
            content: content.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ResponseSchema;

    fn request(schema: Option<ResponseSchema>) -> ChatRequest {
        ChatRequest {
            model: "gpt-4o-mini".to_string(),
            system: "system".to_string(),
            user: "user".to_string(),
            max_tokens: 1024,
            temperature: None,
            response_schema: schema,
        }
    }

    #[test]
    fn test_plain_json_mode_body() {
        let body = OpenAiChatClient::request_body(&request(None));
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "user");
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_schema_constrained_body() {
        let schema = ResponseSchema {
            name: "card".to_string(),
            schema: serde_json::json!({ "type": "object" }),
        };
        let body = OpenAiChatClient::request_body(&request(Some(schema)));
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "card");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
    }
}
