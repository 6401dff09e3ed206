use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::types::{AppResult, LLMProvider, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Configuration for building an LLM adapter
#[derive(Clone)]
pub struct LLMProviderConfig {
    pub provider: LLMProvider,
    pub api_key: String,
    pub api_base: Option<String>,
    pub timeout: Option<Duration>,
}

impl LLMProviderConfig {
    pub fn from_config(config: &crate::config::LLMConfig) -> Self {
        Self {
            provider: config.provider,
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
            timeout: config.request_timeout(),
        }
    }
}

/// Client handle shared by every request; cheap to clone.
#[derive(Clone)]
pub struct LLM {
    adapter: Arc<dyn LLMAdapter>,
    provider_name: String,
}

impl LLM {
    pub fn new(config: LLMProviderConfig) -> AppResult<Self> {
        let adapter: Arc<dyn LLMAdapter> = match config.provider {
            LLMProvider::Groq => Arc::new(crate::llm::groq::GroqAdapter::with_options(
                &config.api_key,
                config.api_base.as_deref(),
                config.timeout,
            )?),
            LLMProvider::OpenAI => Arc::new(crate::llm::openai::OpenAICompatibleAdapter::new(
                &config.api_key,
                config
                    .api_base
                    .as_deref()
                    .unwrap_or(crate::llm::openai::OPENAI_API_BASE),
                config.timeout,
            )?),
        };

        Ok(Self {
            adapter,
            provider_name: config.provider.to_string(),
        })
    }

    /// Wrap an already constructed adapter, e.g. a deterministic stub.
    pub fn from_adapter(adapter: Arc<dyn LLMAdapter>) -> Self {
        Self {
            adapter,
            provider_name: "custom".to_string(),
        }
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }
}
