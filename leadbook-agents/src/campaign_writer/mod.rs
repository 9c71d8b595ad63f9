mod system_prompt;

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use shared_types::Contact;
use std::sync::Arc;

use crate::error::AgentError;
use crate::llm::{ChatClient, ChatRequest, ResponseSchema};
use crate::retry::RetryPolicy;

const MAX_TOKENS: u32 = 2048;

/// Everything the copy writer gets to see about the audience.
pub struct CampaignBrief<'a> {
    pub event_name: &'a str,
    pub group_name: &'a str,
    pub contacts: &'a [Contact],
    pub tone: Option<&'a str>,
    pub instructions: Option<&'a str>,
}

/// Generated email draft. Delivery is someone else's job.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CampaignCopy {
    pub subject: String,
    pub body: String,
}

pub struct CampaignWriterAgent {
    client: Arc<dyn ChatClient>,
    model: String,
    retry: RetryPolicy,
}

impl CampaignWriterAgent {
    pub fn new(client: Arc<dyn ChatClient>, model: String, retry: RetryPolicy) -> Self {
        Self {
            client,
            model,
            retry,
        }
    }

    /// Produce subject and body for a follow-up email to the group. Same
    /// retry semantics as card extraction: malformed payloads and transport
    /// errors both consume attempts.
    pub async fn write(&self, brief: &CampaignBrief<'_>) -> Result<CampaignCopy, AgentError> {
        let mut last_error: Option<AgentError> = None;

        for attempt in 1..=self.retry.max_attempts {
            match self.attempt(brief).await {
                Ok(copy) => return Ok(copy),
                Err(e) => {
                    tracing::warn!(
                        "campaign copy attempt {}/{} failed: {}",
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

    async fn attempt(&self, brief: &CampaignBrief<'_>) -> Result<CampaignCopy, AgentError> {
        let request = ChatRequest {
            model: self.model.clone(),
            system: system_prompt::build_system_prompt(brief),
            user: "Write the campaign email for this group.".to_string(),
            max_tokens: MAX_TOKENS,
            temperature: Some(0.7),
            response_schema: Some(response_schema()),
        };

        let response = self.client.complete(request).await?;

        serde_json::from_str(&response.content)
            .map_err(|e| AgentError::InvalidResponse(e.to_string()))
    }
}

fn response_schema() -> ResponseSchema {
    let schema = schema_for!(CampaignCopy);
    ResponseSchema {
        name: "campaign_copy".to_string(),
        schema: serde_json::to_value(schema)
            .unwrap_or_else(|_| serde_json::json!({ "type": "object" })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockChatClient;
    use shared_types::{ContactSource, ParsedContactData};

    fn contact(first: &str, company: Option<&str>) -> Contact {
        Contact {
            id: 1,
            event_id: 1,
            first_name: Some(first.to_string()),
            last_name: Some("Example".to_string()),
            email: Some(format!("{}@example.com", first.to_lowercase())),
            phone: None,
            company: company.map(|c| c.to_string()),
            title: None,
            industry: None,
            address: None,
            source: ContactSource::Manual,
            image_url: None,
            raw_ocr_text: None,
            field_confidence_scores: ParsedContactData::unverified(),
            overall_confidence: 0.0,
            needs_review: false,
            reviewed_at: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn brief_contacts() -> Vec<Contact> {
        vec![contact("Ada", Some("Analytical Engines")), contact("Grace", None)]
    }

    #[tokio::test]
    async fn test_generates_copy() {
        let client = Arc::new(MockChatClient::new(|_, request| {
            assert!(request.system.contains("Analytical Engines"));
            assert!(request.system.contains("Spring Expo"));
            Ok(r#"{"subject": "Great meeting you", "body": "Hi there"}"#.to_string())
        }));
        let agent = CampaignWriterAgent::new(
            client.clone(),
            "gpt-4o-mini".to_string(),
            RetryPolicy::default(),
        );

        let contacts = brief_contacts();
        let brief = CampaignBrief {
            event_name: "Spring Expo",
            group_name: "Hot leads",
            contacts: &contacts,
            tone: Some("warm"),
            instructions: None,
        };

        let copy = agent.write(&brief).await.unwrap();
        assert_eq!(copy.subject, "Great meeting you");
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_copy_exhausts_retries() {
        let client = Arc::new(MockChatClient::new(|_, _| Ok("{}".to_string())));
        let agent = CampaignWriterAgent::new(
            client.clone(),
            "gpt-4o-mini".to_string(),
            RetryPolicy::default(),
        );

        let contacts = brief_contacts();
        let brief = CampaignBrief {
            event_name: "Spring Expo",
            group_name: "Hot leads",
            contacts: &contacts,
            tone: None,
            instructions: None,
        };

        let err = agent.write(&brief).await.unwrap_err();
        assert_eq!(client.call_count(), 3);
        assert!(matches!(err, AgentError::Exhausted { attempts: 3, .. }));
    }
}
