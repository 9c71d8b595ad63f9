mod agent;
mod system_prompt;
mod types;

pub use agent::CardExtractorAgent;
pub use types::{ExtractedCard, ExtractedField};
