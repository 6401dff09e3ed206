// Review Sentiment - classify uploaded customer reviews with an LLM and count the labels

pub mod config;
pub mod types;
pub mod models;
pub mod llm;
pub mod ingest;
pub mod sentiment;
pub mod pipeline;
pub mod routes;
pub mod middleware;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use ingest::{load_reviews, TabularLoader, UploadFormat, UploadedFile};
pub use models::AppState;
pub use pipeline::{AggregationPipeline, SentimentTally};
pub use sentiment::{SentimentClassifier, SentimentLabel};
pub use types::{AppError, AppResult};

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
