use std::time::Duration;

use async_trait::async_trait;

use crate::llm::openai::OpenAICompatibleAdapter;
use crate::llm::provider::LLMAdapter;
use crate::types::{AppResult, LLMRequest, LLMResponse};

pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

pub struct GroqAdapter {
    inner: OpenAICompatibleAdapter,
}

impl GroqAdapter {
    pub fn new(api_key: &str) -> AppResult<Self> {
        Self::with_options(api_key, None, None)
    }

    pub fn with_options(
        api_key: &str,
        api_base: Option<&str>,
        timeout: Option<Duration>,
    ) -> AppResult<Self> {
        Ok(Self {
            inner: OpenAICompatibleAdapter::new(
                api_key,
                api_base.unwrap_or(GROQ_API_BASE),
                timeout,
            )?,
        })
    }

    pub fn api_base(&self) -> &str {
        self.inner.api_base()
    }
}

#[async_trait]
impl LLMAdapter for GroqAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.inner.create_chat_completion(request).await
    }
}
