use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::reddit_client::RedditError;

/// Hint appended to every failure shown to the user.
pub const REMEDIATION_HINT: &str = "Verifica las keys o el nombre del subreddit.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Community not found: r/{0}")]
    CommunityNotFound(String),

    #[error("Reddit error: {0}")]
    Reddit(String),

    #[error("LLM error: {0}")]
    Llm(String),

    /// The completion content was not valid JSON.
    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),

    /// The completion content was JSON but not the shape we asked for.
    #[error("LLM response does not match the expected schema: {0}")]
    Schema(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wraps a completion failure, keeping invalid JSON distinguishable from transport errors.
    pub fn from_llm(stage: &str, err: LlmError) -> Self {
        match err {
            LlmError::Parse(e) => AppError::MalformedResponse(format!("{stage}: {e}")),
            other => AppError::Llm(format!("{stage}: {other}")),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::CommunityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Reddit(_)
            | AppError::Llm(_)
            | AppError::MalformedResponse(_)
            | AppError::Schema(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::CommunityNotFound(_) => "COMMUNITY_NOT_FOUND",
            AppError::Reddit(_) => "REDDIT_ERROR",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::MalformedResponse(_) => "MALFORMED_LLM_RESPONSE",
            AppError::Schema(_) => "LLM_SCHEMA_MISMATCH",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The single message shown to the user: underlying error text plus the remediation hint.
    pub fn user_message(&self) -> String {
        format!("Error: {}. {}", self, REMEDIATION_HINT)
    }

    fn log(&self) {
        match self {
            AppError::Validation(_) | AppError::CommunityNotFound(_) => {
                tracing::warn!("{}", self)
            }
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            other => tracing::error!("{other}"),
        }
    }
}

impl From<RedditError> for AppError {
    fn from(err: RedditError) -> Self {
        match err {
            RedditError::NotFound(name) => AppError::CommunityNotFound(name),
            other => AppError::Reddit(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.user_message()
            }
        }));

        (self.status(), body).into_response()
    }
}

/// Logs the error and returns the user-facing message for the HTML surface.
pub fn report_for_page(err: &AppError) -> String {
    err.log();
    err.user_message()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failure_maps_to_malformed_response() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = AppError::from_llm("rules analysis", LlmError::Parse(parse_err));
        assert!(matches!(err, AppError::MalformedResponse(_)));
        assert_eq!(err.code(), "MALFORMED_LLM_RESPONSE");
    }

    #[test]
    fn test_api_failure_maps_to_llm_error() {
        let err = AppError::from_llm(
            "top posts analysis",
            LlmError::Api {
                status: 401,
                message: "Invalid API Key".to_string(),
            },
        );
        assert!(matches!(err, AppError::Llm(_)));
        assert!(err.to_string().contains("Invalid API Key"));
    }

    #[test]
    fn test_reddit_not_found_maps_to_community_not_found() {
        let err: AppError = RedditError::NotFound("nosuchsub".to_string()).into();
        assert!(matches!(err, AppError::CommunityNotFound(ref n) if n == "nosuchsub"));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_user_message_carries_error_text_and_hint() {
        let err = AppError::CommunityNotFound("nosuchsub".to_string());
        let message = err.user_message();
        assert!(message.contains("r/nosuchsub"));
        assert!(message.ends_with(REMEDIATION_HINT));
    }

    #[test]
    fn test_into_response_uses_status() {
        let response = AppError::Validation("subreddit cannot be empty".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
