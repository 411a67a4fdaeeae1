use crate::analysis::models::{Diagnosis, PromotionPolicy, RulesReport, SchemaWarning};

/// Soft checks on a report that already deserialized.
///
/// WARN conditions:
/// - Diagnosis outside VERDE / AMARILLO / ROJO
/// - Promotion policy outside its enum
/// - Blank required text fields
/// - Negative numeric minima
/// - `karma_total_min` lower than post + comment minima
///
/// Nothing here blocks rendering.
pub fn validate_rules_report(report: &RulesReport) -> Vec<SchemaWarning> {
    let mut warnings = Vec::new();
    let mut warn = |field: &str, reason: String| {
        warnings.push(SchemaWarning {
            field: field.to_string(),
            reason,
        })
    };

    if let Diagnosis::Other(raw) = &report.diagnostico_tu_cuenta {
        warn(
            "diagnostico_tu_cuenta",
            format!("'{raw}' is not one of VERDE, AMARILLO, ROJO"),
        );
    }

    if let Some(PromotionPolicy::Other(raw)) = &report.promotion_allowed {
        warn(
            "promotion_allowed",
            format!("'{raw}' is not one of Sí, Solo teasers, Solo verificados, No"),
        );
    }

    for (field, value) in [
        ("subreddit", &report.subreddit),
        ("razon_diagnostico", &report.razon_diagnostico),
        ("estrategia_recomendada", &report.estrategia_recomendada),
    ] {
        if value.trim().is_empty() {
            warn(field, "required text is blank".to_string());
        }
    }

    for (field, value) in [
        ("karma_post_min", report.karma_post_min),
        ("karma_comment_min", report.karma_comment_min),
        ("karma_total_min", report.karma_total_min),
        ("account_age_days_min", report.account_age_days_min),
        ("account_age_months_min", report.account_age_months_min),
        ("tamanio_sub", report.tamanio_sub),
    ] {
        if let Some(v) = value.filter(|v| *v < 0.0) {
            warn(field, format!("negative value {v}"));
        }
    }

    if let (Some(total), Some(post), Some(comment)) = (
        report.karma_total_min,
        report.karma_post_min,
        report.karma_comment_min,
    ) {
        if total < post.max(comment) {
            warn(
                "karma_total_min",
                format!("total {total} is below a component minimum ({post} post, {comment} comment)"),
            );
        }
    }

    warnings
}
