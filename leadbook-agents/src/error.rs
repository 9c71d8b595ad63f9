use crate::llm::LlmError;

/// Failure modes shared by the agents in this crate.
///
/// A malformed model payload is handled the same way as a transport failure:
/// both consume a retry attempt and both end in `Exhausted` once the policy
/// runs out.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("invalid model payload: {0}")]
    InvalidResponse(String),

    #[error("failed after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}
