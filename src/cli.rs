//! CLI interface for intervu

use crate::config::OutputFormat;
use crate::processing::document::JobCategory;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "intervu")]
#[command(about = "LLM-backed résumé scoring and mock interviews")]
#[command(long_about = "Extract and section résumés (PDF, DOCX, TXT), score them against a target job, and run turn-based mock interviews through an OpenAI-compatible model")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format: console, json (overrides the configured format)
    #[arg(short, long, global = true, value_parser = parse_output_format)]
    pub format: Option<OutputFormat>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract text from a document
    Extract {
        /// Path to a PDF, DOCX or TXT file
        file: PathBuf,

        /// Print the extractor's chunks instead of the full text
        #[arg(long)]
        chunks: bool,
    },

    /// Split a résumé into education, experience, skills, projects and achievements
    Sections {
        /// Path to the résumé file
        file: PathBuf,
    },

    /// Split a document into overlapping, sentence-aware chunks
    Chunk {
        /// Path to the document
        file: PathBuf,

        /// Maximum chunk length in characters (defaults to processing.chunk_size)
        #[arg(long)]
        size: Option<usize>,

        /// Characters shared by consecutive chunks (defaults to processing.chunk_overlap)
        #[arg(long)]
        overlap: Option<usize>,
    },

    /// Score a résumé against a target job
    Analyze {
        /// Path to the résumé file
        #[arg(short, long)]
        resume: PathBuf,

        /// Target job title
        #[arg(short, long)]
        job: String,

        /// Optional job description file
        #[arg(short, long)]
        description: Option<PathBuf>,

        /// Job category
        #[arg(long, default_value = "software_engineer")]
        category: JobCategory,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Summarize the sections of a résumé
    Summary {
        /// Path to the résumé file
        resume: PathBuf,

        /// Also list improvement suggestions for this target job
        #[arg(short, long)]
        job: Option<String>,
    },

    /// Run an interactive mock interview
    Interview {
        /// Job category
        #[arg(long, default_value = "software_engineer")]
        category: JobCategory,

        /// Free-text candidate background
        #[arg(short, long, conflicts_with = "resume")]
        background: Option<String>,

        /// Use a résumé file as the candidate background
        #[arg(short, long)]
        resume: Option<PathBuf>,

        /// Save the evaluation to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
    }
}
