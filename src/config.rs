//! Configuration management for intervu

use crate::error::{IntervuError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    pub processing: ProcessingConfig,
    pub interview: InterviewConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible chat completions API
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewConfig {
    pub questions_per_session: usize,
    /// Sessions older than this are evicted; 0 disables eviction
    pub session_ttl_secs: u64,
    pub gateway_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                base_url: "https://api.openai.com/v1".to_string(),
                model: "gpt-3.5-turbo".to_string(),
                api_key_env: "OPENAI_API_KEY".to_string(),
                request_timeout_secs: 120,
            },
            processing: ProcessingConfig {
                chunk_size: 512,
                chunk_overlap: 50,
            },
            interview: InterviewConfig {
                questions_per_session: 5,
                session_ttl_secs: 24 * 60 * 60,
                gateway_timeout_secs: 60,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| IntervuError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| IntervuError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("intervu")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.processing.chunk_size == 0 {
            return Err(IntervuError::Configuration(
                "processing.chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.processing.chunk_overlap >= self.processing.chunk_size {
            return Err(IntervuError::Configuration(
                "processing.chunk_overlap must be smaller than processing.chunk_size".to_string(),
            ));
        }
        if self.interview.questions_per_session == 0 {
            return Err(IntervuError::Configuration(
                "interview.questions_per_session must be greater than zero".to_string(),
            ));
        }
        if self.interview.gateway_timeout_secs == 0 {
            return Err(IntervuError::Configuration(
                "interview.gateway_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Result<String> {
        std::env::var(&self.llm.api_key_env).map_err(|_| {
            IntervuError::Configuration(format!(
                "Environment variable {} is not set",
                self.llm.api_key_env
            ))
        })
    }

    pub fn gateway_timeout(&self) -> Duration {
        self.interview.gateway_timeout()
    }
}

impl InterviewConfig {
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }

    pub fn session_ttl(&self) -> Option<Duration> {
        match self.session_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
