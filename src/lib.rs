//! intervu library: résumé scoring and mock interviews backed by an LLM

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod interview;
pub mod processing;
pub mod llm;
pub mod output;

pub use error::{IntervuError, Result};
pub use config::Config;
