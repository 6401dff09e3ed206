use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use review_sentiment::{
    config::Config,
    llm::{LLMProviderConfig, LLM},
    routes::create_router,
    utils::init_tracing,
    AggregationPipeline, AppState, SentimentClassifier,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // A missing credential stops the process here.
    let config = Config::from_env()?;
    info!(server = ?config.server, llm = ?config.llm, "Configuration loaded");

    // One client for the lifetime of the process, handed to the classifier.
    let llm = LLM::new(LLMProviderConfig::from_config(&config.llm))?;
    let classifier = SentimentClassifier::new(llm, config.llm.model.clone());
    let pipeline = AggregationPipeline::new(classifier).with_concurrency(config.llm.concurrency);

    let state = AppState::new(config.clone(), pipeline);
    let app = create_router(state);

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid HOST {}: {}", config.server.host, e))?;
    let addr = SocketAddr::from((host, config.server.port));
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
