//! Résumé analysis: LLM scoring against a target job plus local summaries

use crate::error::{IntervuError, Result};
use crate::input::InputManager;
use crate::llm::gateway::{LlmGateway, ResumeAnalysis};
use crate::processing::document::{JobCategory, ResumeSection, SectionMap};
use crate::processing::normalizer::TextNormalizer;
use crate::processing::sections::SectionClassifier;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Lines shown per section in a résumé summary
const PREVIEW_LINES: usize = 3;

const CHECK_INPUT_SUGGESTION: &str = "请检查输入数据格式是否正确";

const GENERIC_SUGGESTIONS: [&str; 5] = [
    "确保简历包含目标岗位的关键技能和关键词",
    "量化工作成果，使用具体的数据和指标",
    "突出与目标岗位相关的项目经验",
    "优化简历格式，确保信息层次清晰",
    "添加相关的认证或培训经历",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeAnalysisRequest {
    pub resume_text: String,
    pub target_job: String,
    #[serde(default)]
    pub job_description: Option<String>,
    pub job_category: JobCategory,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessedUpload {
    pub filename: String,
    pub file_size: u64,
    pub full_text: String,
    pub chunks: Vec<String>,
    pub sections: SectionMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionPreview {
    pub count: usize,
    pub preview: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeSummary {
    pub total_length: usize,
    pub section_count: usize,
    pub sections: BTreeMap<ResumeSection, SectionPreview>,
}

pub struct ResumeAnalyzer {
    gateway: Arc<dyn LlmGateway>,
    normalizer: TextNormalizer,
    classifier: SectionClassifier,
    input: InputManager,
    timeout: Duration,
}

impl ResumeAnalyzer {
    pub fn new(gateway: Arc<dyn LlmGateway>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            gateway,
            normalizer: TextNormalizer::new(),
            classifier: SectionClassifier::new()?,
            input: InputManager::new(),
            timeout,
        })
    }

    /// Score a résumé against a job. Never fails: gateway errors and
    /// timeouts come back as a zero-score analysis carrying the message.
    pub async fn analyze(&self, request: &ResumeAnalysisRequest) -> ResumeAnalysis {
        let cleaned = self.normalizer.clean(&request.resume_text);
        let sections = self.classifier.classify(&self.normalizer.clean_lines(&request.resume_text));
        debug!(
            "Analyzing résumé for {} ({} chars, {} sections)",
            request.target_job,
            cleaned.chars().count(),
            sections.non_empty_count()
        );

        let job_description = request.job_description.as_deref().unwrap_or("");
        let call = self
            .gateway
            .analyze_resume(&cleaned, job_description, request.job_category);

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(analysis)) => {
                info!("Résumé analysis complete: score {:.1}", analysis.overall_score);
                analysis
            }
            Ok(Err(e)) => {
                error!("Résumé analysis failed: {}", e);
                error_analysis(IntervuError::from(e).to_string())
            }
            Err(_) => {
                let e = IntervuError::GatewayTimeout(self.timeout.as_secs());
                error!("Résumé analysis failed: {}", e);
                error_analysis(e.to_string())
            }
        }
    }

    /// Extract, clean and section an uploaded résumé file
    pub async fn process_uploaded_file(&mut self, path: &Path) -> Result<ProcessedUpload> {
        let document = self.input.extract(path).await?;
        let file_size = tokio::fs::metadata(path).await?.len();

        let full_text = self.normalizer.clean(&document.full_text);
        let sections = self.classifier.classify(&self.normalizer.clean_lines(&document.full_text));

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(ProcessedUpload {
            filename,
            file_size,
            full_text,
            chunks: document.chunks,
            sections,
        })
    }
}

/// Section counts and the first few lines of each section. `resume_text`
/// must keep its line breaks.
pub fn summarize_resume(classifier: &SectionClassifier, resume_text: &str) -> ResumeSummary {
    let sections = classifier.classify(resume_text);

    let previews = sections
        .iter()
        .map(|(section, lines)| {
            let preview = SectionPreview {
                count: lines.len(),
                preview: lines.iter().take(PREVIEW_LINES).cloned().collect(),
            };
            (section, preview)
        })
        .collect();

    ResumeSummary {
        total_length: resume_text.chars().count(),
        section_count: sections.non_empty_count(),
        sections: previews,
    }
}

/// Generic advice; does not look at the résumé
pub fn improvement_suggestions(target_job: &str) -> Vec<String> {
    debug!("Generic improvement suggestions for {}", target_job);
    GENERIC_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

fn error_analysis(message: String) -> ResumeAnalysis {
    ResumeAnalysis {
        weaknesses: vec![message],
        suggestions: vec![CHECK_INPUT_SUGGESTION.to_string()],
        ..ResumeAnalysis::default()
    }
}
