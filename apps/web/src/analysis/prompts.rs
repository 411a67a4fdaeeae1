// All LLM prompt constants for the analysis module.
// Templates are filled with `str::replace`; placeholders are listed above each one.

use serde_json::{json, Value};

/// Rules analysis is deterministic.
pub const RULES_TEMPERATURE: f32 = 0.0;
/// Top-posts summaries get a little stylistic variance.
pub const TOP_POSTS_TEMPERATURE: f32 = 0.2;

/// Rules analysis prompt template.
/// Replace: {rules_document}, {schema_json}, {karma_post}, {karma_comment}, {account_age_days}
pub const RULES_PROMPT_TEMPLATE: &str = r#"
Eres experto en reglas de Reddit para promoción NSFW/OnlyFans 2026.
Analiza el texto y extrae datos precisos.

Texto:
{rules_document}

Responde SOLO con JSON válido siguiendo este schema:
{schema_json}

Null si no mencionado. Booleanos: true/false.
Diagnóstico basado en karma post: {karma_post}, comment: {karma_comment}, días: {account_age_days}.
Potencial marketing: Alto si permite promo + actividad alta.
"#;

/// Top posts prompt template.
/// Replace: {posts_text}
pub const TOP_POSTS_PROMPT_TEMPLATE: &str = r#"
Eres experto en análisis de posts Reddit para marketing OnlyFans.
Analiza estos top 10 posts:

{posts_text}

Responde en JSON:
{
  "top_posts_resumen": ["lista de 10 strings con título + upvotes + comentarios"],
  "analisis_mejores": "explicación de qué hace exitosos a los top posts (títulos atractivos, tipo contenido, engagement, estrategia recomendada)"
}
"#;

/// JSON schema the rules report must follow. Sent verbatim inside the rules prompt.
pub fn rules_schema() -> Value {
    let number_or_null = json!({"type": ["number", "null"]});
    let string_or_null = json!({"type": ["string", "null"]});
    let strings_or_null = json!({"type": ["array", "null"], "items": {"type": "string"}});

    json!({
        "type": "object",
        "properties": {
            "subreddit": {"type": "string"},
            "karma_post_min": number_or_null.clone(),
            "karma_comment_min": number_or_null.clone(),
            "karma_total_min": number_or_null.clone(),
            "account_age_days_min": number_or_null.clone(),
            "account_age_months_min": number_or_null.clone(),
            "verification_required": {"type": "boolean"},
            "verification_method": string_or_null.clone(),
            "promotion_allowed": {"type": "string", "enum": ["Sí", "Solo teasers", "Solo verificados", "No"]},
            "link_directo_of": {"type": "boolean"},
            "frecuencia_max": string_or_null.clone(),
            "flair_obligatorio": string_or_null.clone(),
            "tipo_contenido_permitido": strings_or_null.clone(),
            "prohibiciones_clave": strings_or_null.clone(),
            "formato_post_obligatorio": string_or_null.clone(),
            "automod_filtros": strings_or_null.clone(),
            "nivel_actividad": string_or_null.clone(),
            "tamanio_sub": number_or_null.clone(),
            "moderacion_estricta": {"type": "boolean"},
            "reglas_mas_relevantes": strings_or_null.clone(),
            "otras_restricciones_importantes": strings_or_null.clone(),
            "diagnostico_tu_cuenta": {"type": "string", "enum": ["VERDE", "AMARILLO", "ROJO"]},
            "razon_diagnostico": {"type": "string"},
            "estrategia_recomendada": {"type": "string"},
            "riesgo_shadowban": string_or_null.clone(),
            "potencial_marketing": string_or_null.clone()
        },
        "required": ["subreddit", "diagnostico_tu_cuenta", "razon_diagnostico", "estrategia_recomendada"]
    })
}
