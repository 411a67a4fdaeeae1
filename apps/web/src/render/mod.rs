//! HTML rendering of the analyzer page: form, diagnosis, requirements, top posts, raw JSON.

use crate::analysis::models::{AnalysisOutcome, Diagnosis, RulesReport};

/// Placeholder for a field the source material did not state.
pub const NOT_STATED: &str = "no indicado";

/// Display color of a diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayColor {
    Green,
    Yellow,
    Red,
    Neutral,
}

impl DisplayColor {
    pub fn css(self) -> &'static str {
        match self {
            DisplayColor::Green => "#2e7d32",
            DisplayColor::Yellow => "#f9a825",
            DisplayColor::Red => "#c62828",
            DisplayColor::Neutral => "#757575",
        }
    }
}

/// Unrecognized verdicts fall back to neutral instead of failing.
pub fn diagnosis_color(diagnosis: &Diagnosis) -> DisplayColor {
    match diagnosis {
        Diagnosis::Verde => DisplayColor::Green,
        Diagnosis::Amarillo => DisplayColor::Yellow,
        Diagnosis::Rojo => DisplayColor::Red,
        Diagnosis::Other(_) => DisplayColor::Neutral,
    }
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_STATED.to_string(), |v| v.to_string())
}

fn stated(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn text(value: &Option<String>) -> &str {
    stated(value).unwrap_or(NOT_STATED)
}

/// The six human-readable requirement lines. A line whose fields are all unstated is skipped.
pub fn requirement_lines(report: &RulesReport) -> Vec<String> {
    let mut lines = Vec::with_capacity(6);

    if report.karma_post_min.is_some()
        || report.karma_comment_min.is_some()
        || report.karma_total_min.is_some()
    {
        lines.push(format!(
            "Karma mínimo: {} post + {} comment (total {})",
            number(report.karma_post_min),
            number(report.karma_comment_min),
            number(report.karma_total_min)
        ));
    }

    if report.account_age_days_min.is_some() || report.account_age_months_min.is_some() {
        lines.push(format!(
            "Edad cuenta: {} días ({} meses)",
            number(report.account_age_days_min),
            number(report.account_age_months_min)
        ));
    }

    if report.verification_required.is_some() || stated(&report.verification_method).is_some() {
        let required = match report.verification_required {
            Some(true) => "Obligatoria",
            Some(false) => "No",
            None => NOT_STATED,
        };
        lines.push(format!(
            "Verificación: {required} ({})",
            text(&report.verification_method)
        ));
    }

    if let Some(policy) = &report.promotion_allowed {
        lines.push(format!("Abierto para: {}", policy.as_str()));
    }

    if let Some(frequency) = stated(&report.frecuencia_max) {
        lines.push(format!("Frecuencia: {frequency}"));
    }

    if stated(&report.formato_post_obligatorio).is_some() || stated(&report.flair_obligatorio).is_some()
    {
        lines.push(format!(
            "Formato: {} + flair {}",
            text(&report.formato_post_obligatorio),
            text(&report.flair_obligatorio)
        ));
    }

    lines
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Values echoed back into the form.
#[derive(Debug, Clone)]
pub struct FormValues {
    pub subreddit: String,
    pub karma_post: u64,
    pub karma_comment: u64,
    pub account_age_days: u64,
}

/// What goes under the form.
pub enum PageBody<'a> {
    Empty,
    Report(&'a AnalysisOutcome),
    Error(&'a str),
}

pub fn render_page(form: &FormValues, body: PageBody<'_>) -> String {
    let content = match body {
        PageBody::Empty => String::new(),
        PageBody::Report(outcome) => render_report(outcome),
        PageBody::Error(message) => format!(
            "<div class=\"error\" role=\"alert\">{}</div>",
            escape_html(message)
        ),
    };

    fill_template(
        PAGE_TEMPLATE,
        &[
            ("karma_post", form.karma_post.to_string().as_str()),
            ("karma_comment", form.karma_comment.to_string().as_str()),
            ("account_age_days", form.account_age_days.to_string().as_str()),
            ("subreddit", escape_html(&form.subreddit).as_str()),
            ("content", content.as_str()),
        ],
    )
}

/// Single left-to-right pass over `template`. Inserted values are never rescanned,
/// so braces typed by the user or produced by the model stay literal.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let hit = values.iter().find(|(key, _)| {
            tail.strip_prefix(*key)
                .is_some_and(|after| after.starts_with('}'))
        });
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

fn list_items(items: &[String], class: &str) -> String {
    items
        .iter()
        .map(|item| format!("<li class=\"{class}\">{}</li>", escape_html(item)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_report(outcome: &AnalysisOutcome) -> String {
    let report = &outcome.rules.report;
    let color = diagnosis_color(&report.diagnostico_tu_cuenta).css();

    let raw_json = serde_json::to_string_pretty(&outcome.rules.raw)
        .unwrap_or_else(|_| outcome.rules.raw.to_string());

    let warnings = if outcome.rules.warnings.is_empty() {
        String::new()
    } else {
        let items: Vec<String> = outcome
            .rules
            .warnings
            .iter()
            .map(|w| format!("{}: {}", w.field, w.reason))
            .collect();
        format!(
            "<h4>Avisos de formato</h4>\n<ul>\n{}\n</ul>",
            list_items(&items, "schema-warning")
        )
    };

    format!(
        r#"<section class="diagnosis" style="border-color: {color}">
<h3>DIAGNÓSTICO: <span style="color: {color}">{diagnosis}</span></h3>
<p><em>Razón:</em> {reason}</p>
</section>
<section class="requirements">
<h3>REQUISITOS OBLIGATORIOS</h3>
<ul>
{requirements}
</ul>
</section>
<section>
<h3>ESTRATEGIA RECOMENDADA</h3>
<div class="info">{strategy}</div>
</section>
<section class="top-posts">
<h2>Top 10 Posts</h2>
<ul>
{posts}
</ul>
</section>
<section>
<h2>Análisis de Mejores Posts</h2>
<div class="info">{best}</div>
</section>
<details>
<summary>Detalles completos (JSON)</summary>
{warnings}
<pre>{raw_json}</pre>
</details>"#,
        diagnosis = escape_html(report.diagnostico_tu_cuenta.as_str()),
        reason = escape_html(&report.razon_diagnostico),
        requirements = list_items(&requirement_lines(report), "requirement"),
        strategy = escape_html(&report.estrategia_recomendada),
        posts = list_items(&outcome.top_posts.top_posts_resumen, "post-summary"),
        best = escape_html(&outcome.top_posts.analisis_mejores),
        raw_json = escape_html(&raw_json),
    )
}

/// Placeholders: {karma_post}, {karma_comment}, {account_age_days}, {subreddit}, {content}
const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<title>Analizador de Subreddits</title>
<style>
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 1100px; padding: 0 1rem; }
.layout { display: grid; grid-template-columns: 3fr 2fr; gap: 2rem; }
label { display: block; margin-top: .5rem; }
input { width: 100%; padding: .4rem; box-sizing: border-box; }
button { margin-top: 1rem; padding: .5rem 1.5rem; background: #ff4b4b; color: #fff; border: 0; border-radius: 4px; }
.diagnosis { border-left: 6px solid; padding-left: 1rem; }
.info { background: #e8f0fe; padding: .75rem 1rem; border-radius: 4px; white-space: pre-wrap; }
.error { background: #fdecea; color: #611a15; padding: .75rem 1rem; border-radius: 4px; }
pre { background: #f5f5f5; padding: 1rem; overflow-x: auto; }
footer { margin-top: 3rem; color: #888; font-size: .85rem; }
</style>
</head>
<body>
<h1>Analizador de Subreddits</h1>
<p>Ingresa un subreddit para análisis de reglas, diagnóstico y top posts.</p>
<form method="post" action="/analyze" onsubmit="this.querySelector('button').disabled = true; document.getElementById('progress').hidden = false;">
<div class="layout">
<div>
<label for="subreddit">Subreddit (ej: r/OnlyFansPromotions)</label>
<input id="subreddit" name="subreddit" type="text" value="{subreddit}">
<button type="submit">Analizar</button>
<p id="progress" hidden>Analizando reglas y top posts con IA...</p>
</div>
<aside>
<h3>Tus stats</h3>
<label for="karma_post">Post Karma</label>
<input id="karma_post" name="karma_post" type="number" min="0" value="{karma_post}">
<label for="karma_comment">Comment Karma</label>
<input id="karma_comment" name="karma_comment" type="number" min="0" value="{karma_comment}">
<label for="account_age_days">Días de cuenta</label>
<input id="account_age_days" name="account_age_days" type="number" min="0" value="{account_age_days}">
</aside>
</div>
</form>
<main>
{content}
</main>
<footer>Reddit API + Groq</footer>
</body>
</html>
"#;
