//! Sentiment classification backed by a chat-completion model.
//!
//! The review text is sent verbatim as a single user message and the
//! reply is mapped to a label by case-insensitive substring search.
//! A failed call never aborts the caller; it is logged and counted as
//! neutral.

use tracing::{debug, warn};

use crate::llm::provider::LLM;
use crate::types::{LLMMessage, LLMRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// "positive" anywhere wins, then "negative", otherwise neutral.
    pub fn from_completion(text: &str) -> Self {
        let lowered = text.to_lowercase();
        if lowered.contains("positive") {
            SentimentLabel::Positive
        } else if lowered.contains("negative") {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct SentimentClassifier {
    llm: LLM,
    model: String,
}

impl SentimentClassifier {
    pub fn new(llm: LLM, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, text: &str) -> LLMRequest {
        LLMRequest {
            model: self.model.clone(),
            messages: vec![LLMMessage::user(text)],
        }
    }

    pub async fn classify(&self, text: &str) -> SentimentLabel {
        let request = self.build_request(text);

        match self.llm.create_chat_completion(&request).await {
            Ok(response) => {
                let label = SentimentLabel::from_completion(&response.content);
                debug!(
                    review_len = text.len(),
                    completion_len = response.content.len(),
                    label = %label,
                    "Review classified"
                );
                label
            }
            Err(e) => {
                warn!(
                    provider = %self.llm.provider_name(),
                    error = %e,
                    "Error analyzing sentiment, counting review as neutral"
                );
                SentimentLabel::Neutral
            }
        }
    }
}
