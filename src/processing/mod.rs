//! Document ingestion pipeline and résumé analysis

pub mod document;
pub mod normalizer;
pub mod chunker;
pub mod sections;
pub mod analyzer;
