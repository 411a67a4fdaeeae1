use anyhow::{Context, Result};

use crate::llm_client;
use crate::reddit_client;

/// Application configuration loaded from environment variables.
/// Startup fails if the platform credentials or the completion key are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub reddit_client_id: String,
    pub reddit_client_secret: String,
    pub reddit_user_agent: String,
    pub reddit_auth_url: String,
    pub reddit_api_url: String,
    pub groq_api_key: String,
    pub completion_api_url: String,
    pub completion_model: String,
    pub default_karma_post: u64,
    pub default_karma_comment: u64,
    pub default_account_age_days: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            reddit_client_id: require("REDDIT_CLIENT_ID")?,
            reddit_client_secret: require("REDDIT_CLIENT_SECRET")?,
            reddit_user_agent: require("REDDIT_USER_AGENT")?,
            reddit_auth_url: or_default("REDDIT_AUTH_URL", reddit_client::DEFAULT_AUTH_URL),
            reddit_api_url: or_default("REDDIT_API_URL", reddit_client::DEFAULT_API_URL),
            groq_api_key: require("GROQ_API_KEY")?,
            completion_api_url: or_default("COMPLETION_API_URL", llm_client::DEFAULT_API_URL),
            completion_model: or_default("COMPLETION_MODEL", llm_client::DEFAULT_MODEL),
            default_karma_post: parse_stat(&lookup, "DEFAULT_KARMA_POST", 300)?,
            default_karma_comment: parse_stat(&lookup, "DEFAULT_KARMA_COMMENT", 150)?,
            default_account_age_days: parse_stat(&lookup, "DEFAULT_ACCOUNT_AGE_DAYS", 180)?,
            port: or_default("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }
}

fn parse_stat<F>(lookup: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{key} must be a non-negative integer")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("REDDIT_CLIENT_ID", "id"),
        ("REDDIT_CLIENT_SECRET", "secret"),
        ("REDDIT_USER_AGENT", "subradar/0.1 by tester"),
        ("GROQ_API_KEY", "gsk_test"),
    ];

    #[test]
    fn test_defaults_applied_when_optional_keys_missing() {
        let config = Config::from_lookup(lookup_from(REQUIRED)).unwrap();
        assert_eq!(config.default_karma_post, 300);
        assert_eq!(config.default_karma_comment, 150);
        assert_eq!(config.default_account_age_days, 180);
        assert_eq!(config.port, 8080);
        assert_eq!(config.completion_model, llm_client::DEFAULT_MODEL);
        assert_eq!(config.reddit_api_url, reddit_client::DEFAULT_API_URL);
    }

    #[test]
    fn test_missing_required_key_names_the_variable() {
        let err = Config::from_lookup(lookup_from(&REQUIRED[..3])).unwrap_err();
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn test_blank_required_key_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs[0] = ("REDDIT_CLIENT_ID", "  ");
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn test_stat_overrides_are_parsed() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DEFAULT_KARMA_POST", "1200"));
        pairs.push(("DEFAULT_ACCOUNT_AGE_DAYS", "30"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.default_karma_post, 1200);
        assert_eq!(config.default_account_age_days, 30);
    }

    #[test]
    fn test_negative_stat_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DEFAULT_KARMA_COMMENT", "-5"));
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(err.to_string().contains("DEFAULT_KARMA_COMMENT"));
    }
}
