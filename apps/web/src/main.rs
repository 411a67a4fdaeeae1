mod analysis;
mod config;
mod errors;
mod llm_client;
mod reddit_client;
mod render;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::reddit_client::{RedditClient, RedditCredentials};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing credentials)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting subradar v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Reddit client (token is fetched lazily on first request)
    let reddit = RedditClient::new(
        RedditCredentials {
            client_id: config.reddit_client_id.clone(),
            client_secret: config.reddit_client_secret.clone(),
            user_agent: config.reddit_user_agent.clone(),
        },
        config.reddit_auth_url.clone(),
        config.reddit_api_url.clone(),
    )?;
    info!("Reddit client initialized");

    // Initialize LLM client
    let llm = LlmClient::new(
        config.groq_api_key.clone(),
        config.completion_api_url.clone(),
        config.completion_model.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    let state = AppState {
        reddit: Arc::new(reddit),
        llm: Arc::new(llm),
        config: config.clone(),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
