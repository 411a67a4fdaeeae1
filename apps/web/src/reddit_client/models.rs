use serde::{Deserialize, Serialize};

use super::RedditError;

// ────────────────────────────────────────────────────────────────────────────
// Domain types handed to the analysis layer
// ────────────────────────────────────────────────────────────────────────────

/// A single community rule as shown on the subreddit sidebar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rule {
    pub short_name: String,
    #[serde(default)]
    pub description: String,
}

/// Community metadata needed for the rules analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    pub display_name: String,
    pub subscribers: Option<u64>,
    /// Sidebar text; falls back to the public description, then to empty.
    pub description: String,
    pub rules: Vec<Rule>,
}

/// One all-time top post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub score: i64,
    pub num_comments: u64,
    pub url: String,
}

impl Community {
    pub(super) fn from_parts(about: AboutData, rules: RulesResponse) -> Self {
        let description = [about.description, about.public_description]
            .into_iter()
            .flatten()
            .find(|d| !d.trim().is_empty())
            .unwrap_or_default();

        Community {
            display_name: about.display_name,
            subscribers: about.subscribers,
            description,
            rules: rules.rules,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

/// `/r/{name}/about`: a `t5` thing for real communities.
#[derive(Debug, Deserialize)]
pub(super) struct AboutResponse {
    kind: String,
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(super) struct AboutData {
    display_name: String,
    subscribers: Option<u64>,
    description: Option<String>,
    public_description: Option<String>,
}

impl AboutResponse {
    pub(super) fn into_subreddit(self, requested: &str) -> Result<AboutData, RedditError> {
        if self.kind != "t5" {
            return Err(RedditError::NotFound(requested.to_string()));
        }
        serde_json::from_value(self.data).map_err(|e| RedditError::Api {
            status: 200,
            message: format!("unexpected about payload: {e}"),
        })
    }
}

/// `/r/{name}/about/rules`
#[derive(Debug, Deserialize)]
pub(super) struct RulesResponse {
    #[serde(default)]
    rules: Vec<Rule>,
}

/// `/r/{name}/top`
#[derive(Debug, Deserialize)]
pub(super) struct ListingResponse {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: Post,
}

impl ListingResponse {
    pub(super) fn into_posts(self) -> Vec<Post> {
        self.data.children.into_iter().map(|c| c.data).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn about(description: Option<&str>, public_description: Option<&str>) -> AboutData {
        AboutData {
            display_name: "rust".to_string(),
            subscribers: Some(10),
            description: description.map(str::to_string),
            public_description: public_description.map(str::to_string),
        }
    }

    #[test]
    fn test_description_prefers_sidebar_text() {
        let community = Community::from_parts(
            about(Some("Sidebar"), Some("Public")),
            RulesResponse { rules: vec![] },
        );
        assert_eq!(community.description, "Sidebar");
    }

    #[test]
    fn test_description_falls_back_to_public_description() {
        let community =
            Community::from_parts(about(Some("  "), Some("Public")), RulesResponse { rules: vec![] });
        assert_eq!(community.description, "Public");

        let community = Community::from_parts(about(None, None), RulesResponse { rules: vec![] });
        assert_eq!(community.description, "");
    }

    #[test]
    fn test_listing_payload_is_not_a_community() {
        let response: AboutResponse = serde_json::from_value(json!({
            "kind": "Listing",
            "data": {"children": []}
        }))
        .unwrap();
        assert!(matches!(
            response.into_subreddit("typo"),
            Err(RedditError::NotFound(_))
        ));
    }

    #[test]
    fn test_rule_without_description_deserializes() {
        let rule: Rule = serde_json::from_value(json!({"short_name": "No spam", "kind": "all"})).unwrap();
        assert_eq!(rule.description, "");
    }
}
