//! In-process fakes and fixtures shared by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::analysis::models::RulesReport;
use crate::llm_client::{CompletionBackend, LlmError};
use crate::reddit_client::{Community, CommunitySource, Post, RedditError, Rule};

pub const RULES_JSON: &str = r#"{
    "subreddit": "rust",
    "karma_post_min": 100,
    "karma_comment_min": 50,
    "karma_total_min": 150,
    "account_age_days_min": 30,
    "account_age_months_min": 1,
    "verification_required": false,
    "verification_method": null,
    "promotion_allowed": "Solo teasers",
    "link_directo_of": false,
    "frecuencia_max": "1 post al día",
    "flair_obligatorio": null,
    "tipo_contenido_permitido": ["imagen", "texto"],
    "prohibiciones_clave": ["spam"],
    "formato_post_obligatorio": null,
    "automod_filtros": null,
    "nivel_actividad": "alto",
    "tamanio_sub": 1000,
    "moderacion_estricta": true,
    "reglas_mas_relevantes": ["Regla 1"],
    "otras_restricciones_importantes": null,
    "diagnostico_tu_cuenta": "VERDE",
    "razon_diagnostico": "Tu karma supera los mínimos",
    "estrategia_recomendada": "Publica teasers con el flair correcto",
    "riesgo_shadowban": "bajo",
    "potencial_marketing": "Alto"
}"#;

pub const TOP_POSTS_JSON: &str = r#"{
    "top_posts_resumen": [
        "Post 1 - 5000 upvotes - 100 comentarios",
        "Post 2 - 4900 upvotes - 99 comentarios",
        "Post 3 - 4800 upvotes - 98 comentarios",
        "Post 4 - 4700 upvotes - 97 comentarios",
        "Post 5 - 4600 upvotes - 96 comentarios",
        "Post 6 - 4500 upvotes - 95 comentarios",
        "Post 7 - 4400 upvotes - 94 comentarios",
        "Post 8 - 4300 upvotes - 93 comentarios",
        "Post 9 - 4200 upvotes - 92 comentarios",
        "Post 10 - 4100 upvotes - 91 comentarios"
    ],
    "analisis_mejores": "Títulos cortos y contenido original"
}"#;

pub fn sample_report() -> RulesReport {
    serde_json::from_str(RULES_JSON).expect("fixture parses")
}

pub fn sample_community(name: &str, rule_count: usize, subscribers: u64) -> Community {
    Community {
        display_name: name.to_string(),
        subscribers: Some(subscribers),
        description: format!("Bienvenidos a r/{name}.\nLee las reglas antes de publicar."),
        rules: (1..=rule_count)
            .map(|i| Rule {
                short_name: format!("Norma {i}"),
                description: format!("Descripción de la norma {i}"),
            })
            .collect(),
    }
}

pub fn sample_posts(count: usize) -> Vec<Post> {
    (1..=count)
        .map(|i| Post {
            title: format!("Post número {i}"),
            score: 5000 - i as i64 * 100,
            num_comments: 100 - i as u64,
            url: format!("https://www.reddit.com/r/rust/comments/{i}"),
        })
        .collect()
}

/// Serves one fixed community and post list; records every lookup.
#[derive(Default)]
pub struct FakeReddit {
    community: Option<Community>,
    posts: Vec<Post>,
    names: Mutex<Vec<String>>,
    limits: Mutex<Vec<u32>>,
}

impl FakeReddit {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_community(community: Community) -> Self {
        Self {
            community: Some(community),
            ..Self::default()
        }
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts,
            ..Self::default()
        }
    }

    pub fn and_posts(mut self, posts: Vec<Post>) -> Self {
        self.posts = posts;
        self
    }

    pub fn requested_names(&self) -> Vec<String> {
        self.names.lock().unwrap().clone()
    }

    pub fn requested_limits(&self) -> Vec<u32> {
        self.limits.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommunitySource for FakeReddit {
    async fn community(&self, name: &str) -> Result<Community, RedditError> {
        self.names.lock().unwrap().push(name.to_string());
        self.community
            .clone()
            .filter(|c| c.display_name.eq_ignore_ascii_case(name))
            .ok_or_else(|| RedditError::NotFound(name.to_string()))
    }

    async fn top_posts(&self, name: &str, limit: u32) -> Result<Vec<Post>, RedditError> {
        self.names.lock().unwrap().push(name.to_string());
        self.limits.lock().unwrap().push(limit);
        Ok(self.posts.iter().take(limit as usize).cloned().collect())
    }
}

/// Replays canned completion contents in order; records every prompt and temperature.
pub struct FakeCompletion {
    responses: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<(String, f32)>>,
}

impl FakeCompletion {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, f32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for FakeCompletion {
    async fn complete_json(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), temperature));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(LlmError::EmptyContent)
    }
}
