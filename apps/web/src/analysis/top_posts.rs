//! Top posts analysis: the ten all-time best posts → prompt → `TopPostsReport`.

use tracing::info;

use crate::analysis::models::TopPostsReport;
use crate::analysis::prompts::{TOP_POSTS_PROMPT_TEMPLATE, TOP_POSTS_TEMPERATURE};
use crate::errors::AppError;
use crate::llm_client::{parse_content, CompletionBackend};
use crate::reddit_client::{CommunitySource, Post, TOP_POSTS_LIMIT};

/// One line per post, numbered from 1.
pub fn format_post_lines(posts: &[Post]) -> String {
    posts
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "Post {}: Título: {} | Upvotes: {} | Comentarios: {} | URL: {}",
                i + 1,
                p.title,
                p.score,
                p.num_comments,
                p.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_top_posts_prompt(posts: &[Post]) -> String {
    TOP_POSTS_PROMPT_TEMPLATE.replace("{posts_text}", &format_post_lines(posts))
}

/// Parses completion content. The summary count is trusted, not checked.
pub fn parse_top_posts_content(content: &str) -> Result<TopPostsReport, AppError> {
    let raw: serde_json::Value =
        parse_content(content).map_err(|e| AppError::from_llm("top posts analysis", e))?;

    serde_json::from_value(raw).map_err(|e| AppError::Schema(format!("top posts analysis: {e}")))
}

/// Runs the top-posts cycle for an already-normalized community name.
pub async fn analyze_top_posts(
    source: &dyn CommunitySource,
    llm: &dyn CompletionBackend,
    community: &str,
) -> Result<TopPostsReport, AppError> {
    let posts = source.top_posts(community, TOP_POSTS_LIMIT).await?;
    info!("Fetched {} top posts for r/{community}", posts.len());

    let prompt = build_top_posts_prompt(&posts);

    let content = llm
        .complete_json(&prompt, TOP_POSTS_TEMPERATURE)
        .await
        .map_err(|e| AppError::from_llm("top posts analysis", e))?;

    parse_top_posts_content(&content)
}
