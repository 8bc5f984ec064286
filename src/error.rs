//! Error handling for intervu

use crate::llm::gateway::GatewayError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntervuError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to extract text from '{}': {source}", path.display())]
    Extraction {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Interview session not found: {0}")]
    SessionNotFound(String),

    #[error("Interview session already complete: {0}")]
    SessionAlreadyComplete(String),

    #[error("Failed to create interview session: {0}")]
    SessionCreation(#[source] GatewayError),

    #[error("No answers recorded for session: {0}")]
    NoAnswersRecorded(String),

    #[error("LLM gateway timed out after {0}s")]
    GatewayTimeout(u64),

    #[error("LLM gateway returned an unparsable response: {0}")]
    GatewayUnparsableResponse(String),

    #[error("LLM gateway error: {0}")]
    Gateway(#[source] GatewayError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IntervuError>;

impl IntervuError {
    pub(crate) fn extraction<E>(path: impl Into<PathBuf>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        IntervuError::Extraction {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Gateway failures outside session creation keep their kind
impl From<GatewayError> for IntervuError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unparsable(msg) => IntervuError::GatewayUnparsableResponse(msg),
            other => IntervuError::Gateway(other),
        }
    }
}
