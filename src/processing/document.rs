//! Document structures shared by the ingestion pipeline and the services

use crate::error::IntervuError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Result of extracting a raw document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub full_text: String,
    pub chunks: Vec<String>,
}

impl ExtractedDocument {
    pub fn new(full_text: String, chunks: Vec<String>) -> Self {
        Self { full_text, chunks }
    }
}

/// Target job families for analysis and interviews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobCategory {
    SoftwareEngineer,
    DataScientist,
    ProductManager,
    UiUxDesigner,
    Marketing,
    Sales,
    Other,
}

impl JobCategory {
    pub const ALL: [JobCategory; 7] = [
        JobCategory::SoftwareEngineer,
        JobCategory::DataScientist,
        JobCategory::ProductManager,
        JobCategory::UiUxDesigner,
        JobCategory::Marketing,
        JobCategory::Sales,
        JobCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobCategory::SoftwareEngineer => "software_engineer",
            JobCategory::DataScientist => "data_scientist",
            JobCategory::ProductManager => "product_manager",
            JobCategory::UiUxDesigner => "ui_ux_designer",
            JobCategory::Marketing => "marketing",
            JobCategory::Sales => "sales",
            JobCategory::Other => "other",
        }
    }
}

impl fmt::Display for JobCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobCategory {
    type Err = IntervuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        JobCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| IntervuError::InvalidArgument(format!("Unknown job category: {}", s)))
    }
}

/// Résumé sections, declared in classification priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeSection {
    Education,
    Experience,
    Skills,
    Projects,
    Achievements,
}

impl ResumeSection {
    pub const ALL: [ResumeSection; 5] = [
        ResumeSection::Education,
        ResumeSection::Experience,
        ResumeSection::Skills,
        ResumeSection::Projects,
        ResumeSection::Achievements,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResumeSection::Education => "education",
            ResumeSection::Experience => "experience",
            ResumeSection::Skills => "skills",
            ResumeSection::Projects => "projects",
            ResumeSection::Achievements => "achievements",
        }
    }
}

impl fmt::Display for ResumeSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lines assigned to each résumé section. Always holds all five sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionMap {
    buckets: BTreeMap<ResumeSection, Vec<String>>,
}

impl Default for SectionMap {
    fn default() -> Self {
        Self {
            buckets: ResumeSection::ALL.into_iter().map(|s| (s, Vec::new())).collect(),
        }
    }
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, section: ResumeSection) -> &[String] {
        self.buckets.get(&section).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn push(&mut self, section: ResumeSection, line: String) {
        self.buckets.entry(section).or_default().push(line);
    }

    /// Sections in priority order
    pub fn iter(&self) -> impl Iterator<Item = (ResumeSection, &[String])> {
        self.buckets.iter().map(|(s, lines)| (*s, lines.as_slice()))
    }

    pub fn non_empty_count(&self) -> usize {
        self.buckets.values().filter(|lines| !lines.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_category_parsing() {
        assert_eq!("software_engineer".parse::<JobCategory>().unwrap(), JobCategory::SoftwareEngineer);
        assert_eq!("UI-UX-Designer".parse::<JobCategory>().unwrap(), JobCategory::UiUxDesigner);
        assert!("astronaut".parse::<JobCategory>().is_err());
        assert_eq!(JobCategory::DataScientist.to_string(), "data_scientist");
    }

    #[test]
    fn test_job_category_serde_names() {
        let json = serde_json::to_string(&JobCategory::ProductManager).unwrap();
        assert_eq!(json, "\"product_manager\"");
    }

    #[test]
    fn test_section_map_starts_with_all_sections_empty() {
        let map = SectionMap::new();
        assert_eq!(map.iter().count(), 5);
        assert_eq!(map.non_empty_count(), 0);
        assert!(map.get(ResumeSection::Skills).is_empty());
    }

    #[test]
    fn test_section_map_serializes_as_object() {
        let mut map = SectionMap::new();
        map.push(ResumeSection::Skills, "Rust".to_string());
        let value = serde_json::to_value(&map).unwrap();
        assert_eq!(value["skills"], serde_json::json!(["Rust"]));
        assert_eq!(value["education"], serde_json::json!([]));
    }
}
