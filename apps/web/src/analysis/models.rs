use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Self-reported account numbers the diagnosis is made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStats {
    pub post_karma: u64,
    pub comment_karma: u64,
    pub account_age_days: u64,
}

/// One user action: a community name (not yet normalized) plus account stats.
#[derive(Debug, Clone)]
pub struct CommunityQuery {
    pub community: String,
    pub stats: AccountStats,
}

/// Eligibility verdict. Out-of-schema strings are kept in `Other` instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Diagnosis {
    Verde,
    Amarillo,
    Rojo,
    Other(String),
}

impl From<String> for Diagnosis {
    fn from(raw: String) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "VERDE" => Diagnosis::Verde,
            "AMARILLO" => Diagnosis::Amarillo,
            "ROJO" => Diagnosis::Rojo,
            _ => Diagnosis::Other(raw),
        }
    }
}

impl From<Diagnosis> for String {
    fn from(d: Diagnosis) -> Self {
        d.as_str().to_string()
    }
}

impl Diagnosis {
    pub fn as_str(&self) -> &str {
        match self {
            Diagnosis::Verde => "VERDE",
            Diagnosis::Amarillo => "AMARILLO",
            Diagnosis::Rojo => "ROJO",
            Diagnosis::Other(raw) => raw,
        }
    }
}

/// Whether (and how) self-promotion is allowed in the community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PromotionPolicy {
    Yes,
    TeasersOnly,
    VerifiedOnly,
    No,
    Other(String),
}

impl From<String> for PromotionPolicy {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "Sí" => PromotionPolicy::Yes,
            "Solo teasers" => PromotionPolicy::TeasersOnly,
            "Solo verificados" => PromotionPolicy::VerifiedOnly,
            "No" => PromotionPolicy::No,
            _ => PromotionPolicy::Other(raw),
        }
    }
}

impl From<PromotionPolicy> for String {
    fn from(p: PromotionPolicy) -> Self {
        p.as_str().to_string()
    }
}

impl PromotionPolicy {
    pub fn as_str(&self) -> &str {
        match self {
            PromotionPolicy::Yes => "Sí",
            PromotionPolicy::TeasersOnly => "Solo teasers",
            PromotionPolicy::VerifiedOnly => "Solo verificados",
            PromotionPolicy::No => "No",
            PromotionPolicy::Other(raw) => raw,
        }
    }
}

/// Structured answer of the rules-analysis cycle.
///
/// Field names are the wire names the model is asked for. Everything except the
/// community name and the diagnosis triad is optional: `None` means the source
/// material did not state it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesReport {
    pub subreddit: String,
    pub diagnostico_tu_cuenta: Diagnosis,
    pub razon_diagnostico: String,
    pub estrategia_recomendada: String,

    #[serde(default)]
    pub karma_post_min: Option<f64>,
    #[serde(default)]
    pub karma_comment_min: Option<f64>,
    #[serde(default)]
    pub karma_total_min: Option<f64>,
    #[serde(default)]
    pub account_age_days_min: Option<f64>,
    #[serde(default)]
    pub account_age_months_min: Option<f64>,
    #[serde(default)]
    pub verification_required: Option<bool>,
    #[serde(default)]
    pub verification_method: Option<String>,
    #[serde(default)]
    pub promotion_allowed: Option<PromotionPolicy>,
    #[serde(default)]
    pub link_directo_of: Option<bool>,
    #[serde(default)]
    pub frecuencia_max: Option<String>,
    #[serde(default)]
    pub flair_obligatorio: Option<String>,
    #[serde(default)]
    pub tipo_contenido_permitido: Option<Vec<String>>,
    #[serde(default)]
    pub prohibiciones_clave: Option<Vec<String>>,
    #[serde(default)]
    pub formato_post_obligatorio: Option<String>,
    #[serde(default)]
    pub automod_filtros: Option<Vec<String>>,
    #[serde(default)]
    pub nivel_actividad: Option<String>,
    #[serde(default)]
    pub tamanio_sub: Option<f64>,
    #[serde(default)]
    pub moderacion_estricta: Option<bool>,
    #[serde(default)]
    pub reglas_mas_relevantes: Option<Vec<String>>,
    #[serde(default)]
    pub otras_restricciones_importantes: Option<Vec<String>>,
    #[serde(default)]
    pub riesgo_shadowban: Option<String>,
    #[serde(default)]
    pub potencial_marketing: Option<String>,
}

/// Structured answer of the top-posts cycle. The list length is not enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopPostsReport {
    pub top_posts_resumen: Vec<String>,
    pub analisis_mejores: String,
}

/// A non-fatal deviation of the parsed report from the schema we asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaWarning {
    pub field: String,
    pub reason: String,
}

/// Result of the rules cycle: the typed report plus the untouched JSON for inspection.
#[derive(Debug, Clone, Serialize)]
pub struct RulesAnalysis {
    pub report: RulesReport,
    pub raw: serde_json::Value,
    pub warnings: Vec<SchemaWarning>,
}

/// Both cycles merged for display.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub community: String,
    pub rules: RulesAnalysis,
    pub top_posts: TopPostsReport,
    pub generated_at: DateTime<Utc>,
}
