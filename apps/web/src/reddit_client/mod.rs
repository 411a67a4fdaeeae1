//! Reddit read client: application-only OAuth plus the three read endpoints the
//! analyzer needs (about, rules, all-time top).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{redirect::Policy, Client, StatusCode};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub mod models;

pub use models::{Community, Post, Rule};

use models::{AboutResponse, ListingResponse, RulesResponse, TokenResponse};

pub const DEFAULT_AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";
pub const DEFAULT_API_URL: &str = "https://oauth.reddit.com";
/// Top posts requested per analysis.
pub const TOP_POSTS_LIMIT: u32 = 10;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
/// Tokens are refreshed this long before Reddit says they expire.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Error)]
pub enum RedditError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authentication failed (status {status}): {message}")]
    Auth { status: u16, message: String },

    #[error("community r/{0} does not exist")]
    NotFound(String),

    #[error("community r/{0} is private, quarantined or banned")]
    Forbidden(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Read access to community metadata. Implemented by `RedditClient`; faked in tests.
#[async_trait]
pub trait CommunitySource: Send + Sync {
    /// Subscriber count, rule set and description of a community.
    async fn community(&self, name: &str) -> Result<Community, RedditError>;

    /// All-time top posts, highest score first.
    async fn top_posts(&self, name: &str, limit: u32) -> Result<Vec<Post>, RedditError>;
}

/// Strips surrounding whitespace, a leading `/`, an `r/` namespace marker and a trailing `/`.
///
/// `"r/rust"`, `"/r/rust/"`, `" R/rust "` and `"rust"` all normalize to `"rust"`.
pub fn normalize_community_name(raw: &str) -> String {
    let name = raw.trim();
    let name = name.strip_prefix('/').unwrap_or(name);
    let name = match name.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("r/") => &name[2..],
        _ => name,
    };
    name.trim_end_matches('/').trim().to_string()
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + chrono::Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) < self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

/// The single Reddit API handle, built once at startup and shared across requests.
#[derive(Clone)]
pub struct RedditClient {
    client: Client,
    credentials: RedditCredentials,
    auth_url: String,
    api_url: String,
    token: Arc<Mutex<Option<AccessToken>>>,
}

impl RedditClient {
    pub fn new(
        credentials: RedditCredentials,
        auth_url: String,
        api_url: String,
    ) -> Result<Self, RedditError> {
        let client = Client::builder()
            .user_agent(credentials.user_agent.clone())
            .timeout(REQUEST_TIMEOUT)
            // Reddit redirects unknown community names to its search page.
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            client,
            credentials,
            auth_url,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: Arc::new(Mutex::new(None)),
        })
    }

    /// Returns a cached bearer token, fetching a new one when missing or about to expire.
    async fn bearer_token(&self) -> Result<String, RedditError> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref().filter(|t| t.is_fresh(Utc::now())) {
            return Ok(token.value.clone());
        }

        let response = self
            .client
            .post(&self.auth_url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RedditError::Auth {
                status: status.as_u16(),
                message,
            });
        }

        let body: TokenResponse = response.json().await?;
        let token = AccessToken {
            value: body.access_token,
            expires_at: Utc::now() + chrono::Duration::seconds(body.expires_in),
        };
        info!("Reddit access token acquired (expires {})", token.expires_at);

        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    /// Authenticated GET against the OAuth API host for a community-scoped path.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        name: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RedditError> {
        let token = self.bearer_token().await?;
        let url = format!("{}/r/{}{}", self.api_url, name, path);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[("raw_json", "1")])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status.is_redirection() {
            return Err(RedditError::NotFound(name.to_string()));
        }
        if status == StatusCode::FORBIDDEN {
            return Err(RedditError::Forbidden(name.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RedditError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CommunitySource for RedditClient {
    async fn community(&self, name: &str) -> Result<Community, RedditError> {
        let about: AboutResponse = self.get_json(name, "/about", &[]).await?;
        // A search listing instead of a t5 thing means the name did not resolve.
        let about = about.into_subreddit(name)?;

        let rules: RulesResponse = self.get_json(name, "/about/rules", &[]).await?;

        Ok(Community::from_parts(about, rules))
    }

    async fn top_posts(&self, name: &str, limit: u32) -> Result<Vec<Post>, RedditError> {
        let limit = limit.to_string();
        let listing: ListingResponse = self
            .get_json(name, "/top", &[("t", "all"), ("limit", limit.as_str())])
            .await?;

        Ok(listing.into_posts())
    }
}
