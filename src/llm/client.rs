//! OpenAI-compatible chat completions gateway
//!
//! One request per operation. There is no retry: regenerating questions or
//! re-scoring answers is not idempotent, so failures go straight back to the
//! caller.

use crate::config::LlmConfig;
use crate::llm::gateway::{AnswerEvaluation, GatewayError, LlmGateway, RawQuestion, ResumeAnalysis};
use crate::llm::prompts::{PromptTemplates, ANALYSIS_SYSTEM, EVALUATION_SYSTEM, QUESTION_SYSTEM};
use crate::processing::document::JobCategory;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Sampling settings for one kind of call
#[derive(Debug, Clone, Copy)]
struct CallParams {
    max_tokens: u32,
    temperature: f32,
}

const QUESTION_PARAMS: CallParams = CallParams { max_tokens: 1000, temperature: 0.7 };
const EVALUATION_PARAMS: CallParams = CallParams { max_tokens: 1000, temperature: 0.3 };
const ANALYSIS_PARAMS: CallParams = CallParams { max_tokens: 1500, temperature: 0.3 };

#[derive(Clone)]
pub struct OpenAiGateway {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    templates: PromptTemplates,
}

impl OpenAiGateway {
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            templates: PromptTemplates::default(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one chat completion and returns the reply text
    async fn call(&self, system: &str, prompt: &str, params: CallParams) -> Result<String, GatewayError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: prompt },
            ],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("LLM API returned {}: {}", status, message);
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;
        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(GatewayError::EmptyContent)
    }

    async fn call_json(&self, system: &str, prompt: &str, params: CallParams) -> Result<Value, GatewayError> {
        let text = self.call(system, prompt, params).await?;
        parse_json_reply(&text)
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn generate_questions(
        &self,
        job_category: JobCategory,
        background: &str,
        count: usize,
    ) -> Result<Vec<RawQuestion>, GatewayError> {
        let prompt = self.templates.render_questions(job_category.as_str(), background, count);
        let value = self.call_json(QUESTION_SYSTEM, &prompt, QUESTION_PARAMS).await?;
        questions_from_value(value)
    }

    async fn evaluate_answer(
        &self,
        question: &str,
        answer: &str,
        job_category: JobCategory,
    ) -> Result<AnswerEvaluation, GatewayError> {
        let prompt = self.templates.render_evaluation(job_category.as_str(), question, answer);
        let value = self.call_json(EVALUATION_SYSTEM, &prompt, EVALUATION_PARAMS).await?;
        serde_json::from_value(value).map_err(|e| GatewayError::Unparsable(e.to_string()))
    }

    async fn analyze_resume(
        &self,
        resume_text: &str,
        job_description: &str,
        job_category: JobCategory,
    ) -> Result<ResumeAnalysis, GatewayError> {
        let prompt = self
            .templates
            .render_resume_analysis(job_category.as_str(), job_description, resume_text);
        let value = self.call_json(ANALYSIS_SYSTEM, &prompt, ANALYSIS_PARAMS).await?;
        serde_json::from_value(value).map_err(|e| GatewayError::Unparsable(e.to_string()))
    }
}

fn parse_json_reply(text: &str) -> Result<Value, GatewayError> {
    let text = strip_json_fences(text);
    serde_json::from_str(text).map_err(|e| {
        let preview: String = text.chars().take(80).collect();
        GatewayError::Unparsable(format!("{} (reply starts with {:?})", e, preview))
    })
}

/// Accepts a bare array or an object wrapping one under `questions`
fn questions_from_value(value: Value) -> Result<Vec<RawQuestion>, GatewayError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("questions") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(GatewayError::Unparsable(
                    "expected a JSON array of questions".to_string(),
                ))
            }
        },
        _ => {
            return Err(GatewayError::Unparsable(
                "expected a JSON array of questions".to_string(),
            ))
        }
    };
    Ok(items.into_iter().map(RawQuestion::from_value).collect())
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped.strip_suffix("```").map(str::trim).unwrap_or(stripped)
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_json_fences() {
        assert_eq!(strip_json_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_json_fences("```\n[1]\n```"), "[1]");
        assert_eq!(strip_json_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_json_reply_rejects_prose() {
        let err = parse_json_reply("Sure! Here are your questions.").unwrap_err();
        assert!(matches!(err, GatewayError::Unparsable(_)));
    }

    #[test]
    fn test_questions_from_array_or_wrapper() {
        let bare = questions_from_value(json!([{"question": "Q1"}, "Q2"])).unwrap();
        assert_eq!(bare.len(), 2);
        assert_eq!(bare[1].question.as_deref(), Some("Q2"));

        let wrapped = questions_from_value(json!({"questions": [{"question": "Q1"}]})).unwrap();
        assert_eq!(wrapped.len(), 1);

        assert!(questions_from_value(json!({"q": []})).is_err());
        assert!(questions_from_value(json!("nope")).is_err());
    }

    #[test]
    fn test_gateway_trims_trailing_slash() {
        let mut config = crate::config::Config::default().llm;
        config.base_url = "http://localhost:8080/v1/".to_string();
        let gateway = OpenAiGateway::new(&config, "key".to_string()).unwrap();
        assert_eq!(gateway.base_url, "http://localhost:8080/v1");
        assert_eq!(gateway.model(), "gpt-3.5-turbo");
    }
}
