use std::sync::Arc;

use crate::config::Config;
use crate::ingest::TabularLoader;
use crate::pipeline::AggregationPipeline;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub loader: TabularLoader,
    pub pipeline: Arc<AggregationPipeline>,
}

impl AppState {
    pub fn new(config: Config, pipeline: AggregationPipeline) -> Self {
        Self {
            config,
            loader: TabularLoader::new(),
            pipeline: Arc::new(pipeline),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub provider: String,
    pub model: String,
}
