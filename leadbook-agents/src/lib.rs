pub mod batch;
pub mod campaign_writer;
pub mod card_extractor;
pub mod error;
pub mod llm;
pub mod retry;

pub use batch::parse_batch;
pub use campaign_writer::{CampaignBrief, CampaignCopy, CampaignWriterAgent};
pub use card_extractor::CardExtractorAgent;
pub use error::AgentError;
pub use llm::{ChatClient, ChatRequest, ChatResponse, LlmError, OpenAiChatClient};
pub use retry::RetryPolicy;
