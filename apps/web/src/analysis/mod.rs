// Subreddit analysis: rules cycle, then top-posts cycle.
// All completion calls go through llm_client and all Reddit reads through reddit_client.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod rules;
pub mod top_posts;
pub mod validation;

use chrono::Utc;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::CompletionBackend;
use crate::reddit_client::{normalize_community_name, CommunitySource};

use models::{AnalysisOutcome, CommunityQuery};

/// Normalizes and checks a community name before any network call.
pub fn resolve_community_name(raw: &str) -> Result<String, AppError> {
    let name = normalize_community_name(raw);
    if name.is_empty() {
        return Err(AppError::Validation("subreddit cannot be empty".to_string()));
    }
    // Reddit names are ASCII letters, digits and underscores; anything else cannot resolve.
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(AppError::CommunityNotFound(name));
    }
    Ok(name)
}

/// Full pipeline for one user action. The rules cycle completes before the
/// top-posts cycle starts; either failure aborts the whole action.
pub async fn run_analysis(
    source: &dyn CommunitySource,
    llm: &dyn CompletionBackend,
    query: &CommunityQuery,
) -> Result<AnalysisOutcome, AppError> {
    let community = resolve_community_name(&query.community)?;
    let span = tracing::info_span!("analysis", id = %Uuid::new_v4(), community = %community);

    async move {
        info!("Starting analysis with stats {:?}", query.stats);

        let rules = rules::analyze_rules(source, llm, &community, &query.stats).await?;
        let top_posts = top_posts::analyze_top_posts(source, llm, &community).await?;

        info!(
            "Analysis complete: diagnosis={}, {} post summaries",
            rules.report.diagnostico_tu_cuenta.as_str(),
            top_posts.top_posts_resumen.len()
        );

        Ok::<_, AppError>(AnalysisOutcome {
            community,
            rules,
            top_posts,
            generated_at: Utc::now(),
        })
    }
    .instrument(span)
    .await
}
