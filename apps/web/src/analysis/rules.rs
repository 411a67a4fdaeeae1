//! Rules analysis: community metadata → prompt → structured `RulesReport`.

use serde_json::Value;
use tracing::{info, warn};

use crate::analysis::models::{AccountStats, RulesAnalysis, RulesReport};
use crate::analysis::prompts::{rules_schema, RULES_PROMPT_TEMPLATE, RULES_TEMPERATURE};
use crate::analysis::validation::validate_rules_report;
use crate::errors::AppError;
use crate::llm_client::{parse_content, CompletionBackend};
use crate::reddit_client::{Community, CommunitySource, Rule};

/// Plain-text document describing the community, one line per rule.
pub fn build_rules_document(community: &Community) -> String {
    let subscribers = community
        .subscribers
        .map(|s| s.to_string())
        .unwrap_or_else(|| "desconocido".to_string());

    format!(
        "SUBREDDIT: r/{}\nSUSCRIPTORES: {}\nREGLAS:\n{}\nSIDEBAR:\n{}",
        community.display_name,
        subscribers,
        format_rule_lines(&community.rules),
        community.description
    )
}

fn format_rule_lines(rules: &[Rule]) -> String {
    rules
        .iter()
        .enumerate()
        .map(|(i, rule)| format!("Regla {}: {} - {}", i + 1, rule.short_name, rule.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_rules_prompt(document: &str, stats: &AccountStats) -> Result<String, AppError> {
    let schema_json = serde_json::to_string_pretty(&rules_schema())
        .map_err(|e| AppError::Internal(e.into()))?;

    // The community document goes in last so text inside it is never treated as a placeholder.
    Ok(RULES_PROMPT_TEMPLATE
        .replace("{schema_json}", &schema_json)
        .replace("{karma_post}", &stats.post_karma.to_string())
        .replace("{karma_comment}", &stats.comment_karma.to_string())
        .replace("{account_age_days}", &stats.account_age_days.to_string())
        .replace("{rules_document}", document))
}

/// Parses completion content into a typed report, keeping the raw JSON alongside.
pub fn parse_rules_content(content: &str) -> Result<RulesAnalysis, AppError> {
    let raw: Value =
        parse_content(content).map_err(|e| AppError::from_llm("rules analysis", e))?;

    let report: RulesReport = serde_json::from_value(raw.clone())
        .map_err(|e| AppError::Schema(format!("rules analysis: {e}")))?;

    let warnings = validate_rules_report(&report);
    for w in &warnings {
        warn!("rules report field '{}': {}", w.field, w.reason);
    }

    Ok(RulesAnalysis {
        report,
        raw,
        warnings,
    })
}

/// Runs the rules cycle for an already-normalized community name.
pub async fn analyze_rules(
    source: &dyn CommunitySource,
    llm: &dyn CompletionBackend,
    community: &str,
    stats: &AccountStats,
) -> Result<RulesAnalysis, AppError> {
    let community = source.community(community).await?;
    info!(
        "Fetched r/{}: {} rules, {:?} subscribers",
        community.display_name,
        community.rules.len(),
        community.subscribers
    );

    let document = build_rules_document(&community);
    let prompt = build_rules_prompt(&document, stats)?;

    let content = llm
        .complete_json(&prompt, RULES_TEMPERATURE)
        .await
        .map_err(|e| AppError::from_llm("rules analysis", e))?;

    parse_rules_content(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::Diagnosis;
    use crate::test_support::{sample_community, FakeCompletion, FakeReddit, RULES_JSON};

    const STATS: AccountStats = AccountStats {
        post_karma: 500,
        comment_karma: 200,
        account_age_days: 400,
    };

    fn rule_line_count(document: &str) -> usize {
        document.lines().filter(|l| l.starts_with("Regla ")).count()
    }

    #[test]
    fn test_document_has_one_line_per_rule_and_verbatim_description() {
        for n in [0usize, 1, 3, 12] {
            let community = sample_community("rust", n, 1000);
            let document = build_rules_document(&community);
            assert_eq!(rule_line_count(&document), n);
            assert!(document.contains(&community.description));
        }
    }

    #[test]
    fn test_document_layout() {
        let community = sample_community("rust", 2, 1000);
        let document = build_rules_document(&community);
        assert!(document.starts_with("SUBREDDIT: r/rust\nSUSCRIPTORES: 1000\nREGLAS:\nRegla 1: "));
        assert!(document.contains("\nRegla 2: "));
        assert!(document.contains("\nSIDEBAR:\n"));
    }

    #[test]
    fn test_unknown_subscriber_count_is_labelled() {
        let mut community = sample_community("rust", 1, 0);
        community.subscribers = None;
        assert!(build_rules_document(&community).contains("SUSCRIPTORES: desconocido"));
    }

    #[test]
    fn test_prompt_embeds_stats_schema_and_document() {
        let prompt = build_rules_prompt("SUBREDDIT: r/rust", &STATS).unwrap();
        assert!(prompt.contains("SUBREDDIT: r/rust"));
        assert!(prompt.contains("karma post: 500, comment: 200, días: 400"));
        assert!(prompt.contains("\"diagnostico_tu_cuenta\""));
        assert!(!prompt.contains("{schema_json}"));
    }

    #[test]
    fn test_document_placeholders_are_not_expanded() {
        let prompt = build_rules_prompt("sidebar mentions {karma_post}", &STATS).unwrap();
        assert!(prompt.contains("sidebar mentions {karma_post}"));
    }

    #[test]
    fn test_invalid_json_is_a_malformed_response() {
        let err = parse_rules_content("VERDE, todo bien").unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_wrong_shape_is_a_schema_error() {
        let err = parse_rules_content(r#"{"subreddit": "rust"}"#).unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));
    }

    #[test]
    fn test_raw_json_is_preserved() {
        let analysis = parse_rules_content(RULES_JSON).unwrap();
        assert_eq!(analysis.raw["subreddit"], "rust");
        assert_eq!(analysis.report.diagnostico_tu_cuenta, Diagnosis::Verde);
    }

    #[tokio::test]
    async fn test_analyze_rules_sends_document_at_zero_temperature() {
        let reddit = FakeReddit::with_community(sample_community("rust", 3, 1000));
        let llm = FakeCompletion::new(vec![RULES_JSON.to_string()]);

        let analysis = analyze_rules(&reddit, &llm, "rust", &STATS).await.unwrap();
        assert_eq!(analysis.report.subreddit, "rust");

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        let (prompt, temperature) = &calls[0];
        assert_eq!(*temperature, 0.0);
        assert_eq!(rule_line_count(prompt), 3);
        assert!(prompt.contains("SUSCRIPTORES: 1000"));
    }

    #[tokio::test]
    async fn test_unknown_community_never_reaches_the_llm() {
        let reddit = FakeReddit::empty();
        let llm = FakeCompletion::new(vec![RULES_JSON.to_string()]);

        let err = analyze_rules(&reddit, &llm, "nosuchsub", &STATS).await.unwrap_err();
        assert!(matches!(err, AppError::CommunityNotFound(_)));
        assert!(llm.calls().is_empty());
    }
}
