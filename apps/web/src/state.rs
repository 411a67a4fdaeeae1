use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionBackend;
use crate::reddit_client::CommunitySource;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Reddit read API handle. Built once at startup; the OAuth token cache lives inside it.
    pub reddit: Arc<dyn CommunitySource>,
    /// Completion API handle.
    pub llm: Arc<dyn CompletionBackend>,
    pub config: Config,
}
