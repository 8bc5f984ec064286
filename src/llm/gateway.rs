//! The language-model boundary: trait, payload types and errors

use crate::processing::document::JobCategory;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("unparsable response: {0}")]
    Unparsable(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A generated question as returned by the model; every field may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawQuestion {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

impl RawQuestion {
    pub fn new(question: &str, category: &str, difficulty: &str) -> Self {
        Self {
            question: Some(question.to_string()),
            category: Some(category.to_string()),
            difficulty: Some(difficulty.to_string()),
            context: None,
        }
    }

    /// Lenient conversion of one array element: bare strings become the
    /// question text, malformed objects become an all-default question.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => Self {
                question: Some(text),
                ..Self::default()
            },
            other => serde_json::from_value(other).unwrap_or_default(),
        }
    }
}

/// Per-answer evaluation. Only `overall_score` is interpreted; everything
/// else the model returns is kept verbatim in `details`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerEvaluation {
    #[serde(default, deserialize_with = "lenient_score", skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl AnswerEvaluation {
    pub fn with_score(score: f64) -> Self {
        Self {
            overall_score: Some(score),
            ..Self::default()
        }
    }

    /// Placeholder for a response that could not be parsed
    pub fn unparsable(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Contribution to the aggregate; a missing score counts as zero
    pub fn score(&self) -> f64 {
        self.overall_score.unwrap_or(0.0)
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Résumé/job match analysis. Missing fields default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    #[serde(default, deserialize_with = "lenient_score_or_zero")]
    pub overall_score: f64,
    #[serde(default)]
    pub section_scores: BTreeMap<String, f64>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub keywords_match: Vec<String>,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
}

/// Numbers, or strings holding numbers; anything else reads as absent
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    })
}

fn lenient_score_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_score(deserializer)?.unwrap_or(0.0))
}

/// Everything the interview and résumé services need from a language model
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn generate_questions(
        &self,
        job_category: JobCategory,
        background: &str,
        count: usize,
    ) -> Result<Vec<RawQuestion>, GatewayError>;

    async fn evaluate_answer(
        &self,
        question: &str,
        answer: &str,
        job_category: JobCategory,
    ) -> Result<AnswerEvaluation, GatewayError>;

    async fn analyze_resume(
        &self,
        resume_text: &str,
        job_description: &str,
        job_category: JobCategory,
    ) -> Result<ResumeAnalysis, GatewayError>;
}
