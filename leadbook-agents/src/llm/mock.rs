use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};

use super::{ChatClient, ChatRequest, ChatResponse, LlmError};

type Handler = Box<dyn Fn(u32, &ChatRequest) -> Result<String, LlmError> + Send + Sync>;

/// Scripted [`ChatClient`] for tests. The handler receives the 0-based call
/// index and the request, and returns either message content or an error.
pub struct MockChatClient {
    handler: Handler,
    calls: AtomicU32,
}

impl MockChatClient {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(u32, &ChatRequest) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn api_error(status: u16, body: &str) -> LlmError {
        LlmError::Api {
            status,
            body: body.to_string(),
        }
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        (self.handler)(index, &request).map(|content| ChatResponse { content })
    }
}
