//! Aggregation of per-review labels into a tally.

use futures::stream::{self, StreamExt};
use tracing::info;

use crate::sentiment::{SentimentClassifier, SentimentLabel};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SentimentTally {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentTally {
    pub fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }

    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

pub struct AggregationPipeline {
    classifier: SentimentClassifier,
    concurrency: usize,
}

impl AggregationPipeline {
    pub fn new(classifier: SentimentClassifier) -> Self {
        Self {
            classifier,
            concurrency: 1,
        }
    }

    /// Allow up to `limit` completion calls in flight. Values below 1 are
    /// treated as 1.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub async fn run(&self, reviews: &[String]) -> SentimentTally {
        info!(
            reviews = reviews.len(),
            concurrency = self.concurrency,
            model = %self.classifier.model(),
            "Classifying reviews"
        );

        let tally = if self.concurrency == 1 {
            let mut tally = SentimentTally::default();
            for review in reviews {
                tally.record(self.classifier.classify(review).await);
            }
            tally
        } else {
            let classifier = &self.classifier;
            stream::iter(reviews.iter().cloned())
                .map(|review| async move { classifier.classify(&review).await })
                .buffer_unordered(self.concurrency)
                .fold(SentimentTally::default(), |mut tally, label| async move {
                    tally.record(label);
                    tally
                })
                .await
        };

        info!(
            positive = tally.positive,
            negative = tally.negative,
            neutral = tally.neutral,
            "Classification complete"
        );

        tally
    }
}
