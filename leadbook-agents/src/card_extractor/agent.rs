use schemars::schema_for;
use shared_types::AIParsingResponse;
use std::sync::Arc;

use super::types::ExtractedCard;
use crate::error::AgentError;
use crate::llm::{ChatClient, ChatRequest, ResponseSchema};
use crate::retry::RetryPolicy;

const MAX_TOKENS: u32 = 1024;

pub struct CardExtractorAgent {
    client: Arc<dyn ChatClient>,
    model: String,
    retry: RetryPolicy,
}

impl CardExtractorAgent {
    pub fn new(client: Arc<dyn ChatClient>, model: String, retry: RetryPolicy) -> Self {
        Self {
            client,
            model,
            retry,
        }
    }

    /// Extract contact attributes from one piece of raw OCR text.
    ///
    /// Transport failures and structurally invalid payloads both consume an
    /// attempt; once the policy is exhausted the error carries the attempt
    /// count and the caller routes the card to manual entry.
    pub async fn parse(&self, raw_text: &str) -> Result<AIParsingResponse, AgentError> {
        let mut last_error: Option<AgentError> = None;

        for attempt in 1..=self.retry.max_attempts {
            match self.attempt(raw_text).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    tracing::warn!(
                        "card extraction attempt {}/{} failed: {}",
                        attempt,
                        self.retry.max_attempts,
                        e
                    );
                    last_error = Some(e);
                }
            }

            if attempt < self.retry.max_attempts {
                tokio::time::sleep(self.retry.delay_for(attempt)).await;
            }
        }

        Err(AgentError::Exhausted {
            attempts: self.retry.max_attempts,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string()),
        })
    }

    async fn attempt(&self, raw_text: &str) -> Result<AIParsingResponse, AgentError> {
        let request = ChatRequest {
            model: self.model.clone(),
            system: super::system_prompt::build_system_prompt(),
            user: raw_text.to_string(),
            max_tokens: MAX_TOKENS,
            temperature: Some(0.0),
            response_schema: Some(response_schema()),
        };

        let response = self.client.complete(request).await?;

        let card: ExtractedCard = serde_json::from_str(&response.content)
            .map_err(|e| AgentError::InvalidResponse(e.to_string()))?;

        let notes = card.notes.clone();
        let mut parsed = AIParsingResponse::new(card.into_parsed(), raw_text.to_string());
        parsed.processing_notes = notes;

        Ok(parsed)
    }
}

fn response_schema() -> ResponseSchema {
    let schema = schema_for!(ExtractedCard);
    ResponseSchema {
        name: "business_card_extraction".to_string(),
        // schema_for! output is always representable as a JSON value
        schema: serde_json::to_value(schema)
            .unwrap_or_else(|_| serde_json::json!({ "type": "object" })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockChatClient;

    fn card_json(first: &str, last: &str, email_conf: f32) -> String {
        serde_json::json!({
            "first_name": { "value": first, "confidence": 0.95 },
            "last_name": { "value": last, "confidence": 0.93 },
            "email": {
                "value": format!("{}@example.com", first.to_lowercase()),
                "confidence": email_conf
            },
            "phone": { "value": null, "confidence": 0.0 },
            "company": { "value": null, "confidence": 0.0 },
            "title": { "value": null, "confidence": 0.0 },
            "industry": { "value": null, "confidence": 0.0 },
            "address": { "value": null, "confidence": 0.0 },
            "notes": null
        })
        .to_string()
    }

    fn agent(client: Arc<MockChatClient>) -> CardExtractorAgent {
        CardExtractorAgent::new(client, "gpt-4o-mini".to_string(), RetryPolicy::default())
    }

    #[tokio::test]
    async fn test_successful_extraction() {
        let client = Arc::new(MockChatClient::new(|_, _| Ok(card_json("Ada", "Lovelace", 0.98))));
        let result = agent(client.clone()).parse("ADA LOVELACE").await.unwrap();

        assert_eq!(client.call_count(), 1);
        assert_eq!(
            result.parsed_data.first_name.value.as_deref(),
            Some("Ada")
        );
        assert!((result.overall_confidence - 0.9533).abs() < 0.001);
        assert!(!result.parsed_data.needs_review());
        assert_eq!(result.raw_text, "ADA LOVELACE");
    }

    #[tokio::test]
    async fn test_low_confidence_field_is_flagged() {
        let client = Arc::new(MockChatClient::new(|_, _| Ok(card_json("Ada", "Lovelace", 0.45))));
        let result = agent(client).parse("smudged card").await.unwrap();

        assert!(result.parsed_data.email.needs_review);
        assert!(result.parsed_data.needs_review());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_after_three_attempts() {
        let client = Arc::new(MockChatClient::new(|_, _| {
            Err(MockChatClient::api_error(500, "upstream down"))
        }));
        let err = agent(client.clone()).parse("text").await.unwrap_err();

        assert_eq!(client.call_count(), 3);
        match err {
            AgentError::Exhausted { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("expected Exhausted, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_json_retries_like_transport_failure() {
        let client = Arc::new(MockChatClient::new(|index, _| {
            if index < 2 {
                Ok("not json at all".to_string())
            } else {
                Ok(card_json("Ada", "Lovelace", 0.98))
            }
        }));
        let result = agent(client.clone()).parse("text").await.unwrap();

        assert_eq!(client.call_count(), 3);
        assert_eq!(result.parsed_data.last_name.value.as_deref(), Some("Lovelace"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_shape_counts_as_failure() {
        // Structurally valid JSON with a missing attribute set still fails
        let client = Arc::new(MockChatClient::new(|_, _| {
            Ok(r#"{"first_name": {"value": "Jo", "confidence": 0.9}}"#.to_string())
        }));
        let err = agent(client.clone()).parse("text").await.unwrap_err();

        assert_eq!(client.call_count(), 3);
        assert!(matches!(err, AgentError::Exhausted { .. }));
    }

    #[tokio::test]
    async fn test_processing_notes_carried_through() {
        let client = Arc::new(MockChatClient::new(|_, _| {
            let mut value: serde_json::Value =
                serde_json::from_str(&card_json("Ada", "Lovelace", 0.98)).unwrap();
            value["notes"] = serde_json::json!("two phone numbers printed");
            Ok(value.to_string())
        }));
        let result = agent(client).parse("text").await.unwrap();

        assert_eq!(
            result.processing_notes.as_deref(),
            Some("two phone numbers printed")
        );
    }
}
