//! LLM integration module

pub mod gateway;
pub mod client;
pub mod prompts;

pub use client::OpenAiGateway;
pub use gateway::{AnswerEvaluation, GatewayError, LlmGateway, RawQuestion, ResumeAnalysis};
