//! Axum route handlers for the analyzer page and its JSON twin.

use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::analysis::models::{
    AccountStats, AnalysisOutcome, CommunityQuery, RulesReport, SchemaWarning, TopPostsReport,
};
use crate::analysis::run_analysis;
use crate::errors::{report_for_page, AppError};
use crate::render::{render_page, FormValues, PageBody};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Form fields posted by the page. Missing stats fall back to the configured defaults.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub subreddit: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub karma_post: Option<u64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub karma_comment: Option<u64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub account_age_days: Option<u64>,
}

/// Accepts a JSON number, a numeric string (urlencoded forms) or a blank field.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stat {
        Number(u64),
        Text(String),
    }

    match Option::<Stat>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Stat::Number(n)) => Ok(Some(n)),
        Some(Stat::Text(raw)) if raw.trim().is_empty() => Ok(None),
        Some(Stat::Text(raw)) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("'{raw}' is not a non-negative integer"))),
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub community: String,
    pub rules_report: RulesReport,
    pub rules_raw: serde_json::Value,
    pub schema_warnings: Vec<SchemaWarning>,
    pub top_posts: TopPostsReport,
    pub generated_at: DateTime<Utc>,
}

impl From<AnalysisOutcome> for AnalyzeResponse {
    fn from(outcome: AnalysisOutcome) -> Self {
        AnalyzeResponse {
            community: outcome.community,
            rules_report: outcome.rules.report,
            rules_raw: outcome.rules.raw,
            schema_warnings: outcome.rules.warnings,
            top_posts: outcome.top_posts,
            generated_at: outcome.generated_at,
        }
    }
}

impl AnalyzeRequest {
    fn form_values(&self, state: &AppState) -> FormValues {
        FormValues {
            subreddit: self.subreddit.clone(),
            karma_post: self.karma_post.unwrap_or(state.config.default_karma_post),
            karma_comment: self
                .karma_comment
                .unwrap_or(state.config.default_karma_comment),
            account_age_days: self
                .account_age_days
                .unwrap_or(state.config.default_account_age_days),
        }
    }
}

fn query_from(values: &FormValues) -> CommunityQuery {
    CommunityQuery {
        community: values.subreddit.clone(),
        stats: AccountStats {
            post_karma: values.karma_post,
            comment_karma: values.karma_comment,
            account_age_days: values.account_age_days,
        },
    }
}

fn default_form(state: &AppState) -> FormValues {
    FormValues {
        subreddit: String::new(),
        karma_post: state.config.default_karma_post,
        karma_comment: state.config.default_karma_comment,
        account_age_days: state.config.default_account_age_days,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
///
/// Empty form pre-filled with the configured default stats.
pub async fn handle_index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&default_form(&state), PageBody::Empty))
}

/// POST /analyze
///
/// Runs both cycles and re-renders the page. Any failure replaces the whole
/// report with a single error banner.
pub async fn handle_analyze_form(
    State(state): State<AppState>,
    form: Result<Form<AnalyzeRequest>, FormRejection>,
) -> Response {
    let request = match form {
        Ok(Form(request)) => request,
        Err(rejection) => {
            let err = AppError::Validation(rejection.body_text());
            let message = report_for_page(&err);
            return (
                err.status(),
                Html(render_page(&default_form(&state), PageBody::Error(&message))),
            )
                .into_response();
        }
    };
    let values = request.form_values(&state);

    if values.subreddit.trim().is_empty() {
        return Html(render_page(&values, PageBody::Empty)).into_response();
    }

    match run_analysis(state.reddit.as_ref(), state.llm.as_ref(), &query_from(&values)).await {
        Ok(outcome) => Html(render_page(&values, PageBody::Report(&outcome))).into_response(),
        Err(err) => {
            let message = report_for_page(&err);
            (
                err.status(),
                Html(render_page(&values, PageBody::Error(&message))),
            )
                .into_response()
        }
    }
}

/// POST /api/v1/analyze
///
/// Same pipeline, JSON in and out.
pub async fn handle_analyze_json(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if request.subreddit.trim().is_empty() {
        return Err(AppError::Validation("subreddit cannot be empty".to_string()));
    }

    let values = request.form_values(&state);
    let outcome = run_analysis(state.reddit.as_ref(), state.llm.as_ref(), &query_from(&values)).await?;

    Ok(Json(outcome.into()))
}
