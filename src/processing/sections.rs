//! Heuristic résumé section classification

use crate::error::{IntervuError, Result};
use crate::processing::document::{ResumeSection, SectionMap};
use aho_corasick::{AhoCorasick, MatchKind};

/// Heading keywords per section, in priority order
const SECTION_KEYWORDS: [(ResumeSection, &[&str]); 5] = [
    (ResumeSection::Education, &["教育", "education", "学历"]),
    (ResumeSection::Experience, &["经验", "experience", "工作", "实习"]),
    (ResumeSection::Skills, &["技能", "skills", "技术"]),
    (ResumeSection::Projects, &["项目", "projects", "作品"]),
    (ResumeSection::Achievements, &["成就", "achievements", "获奖"]),
];

/// Single-pass line classifier. A line containing a heading keyword switches
/// the current section; other non-empty lines land in the current section.
pub struct SectionClassifier {
    matcher: AhoCorasick,
    pattern_sections: Vec<ResumeSection>,
}

impl SectionClassifier {
    pub fn new() -> Result<Self> {
        let mut patterns = Vec::new();
        let mut pattern_sections = Vec::new();
        for (section, keywords) in SECTION_KEYWORDS {
            for keyword in keywords {
                patterns.push(*keyword);
                pattern_sections.push(section);
            }
        }

        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&patterns)
            .map_err(|e| IntervuError::InvalidArgument(format!("Failed to build section matcher: {}", e)))?;

        Ok(Self {
            matcher,
            pattern_sections,
        })
    }

    /// Highest-priority section whose keyword occurs in the line
    pub fn heading_section(&self, line: &str) -> Option<ResumeSection> {
        let normalized = line.trim().to_lowercase();
        self.matcher
            .find_overlapping_iter(&normalized)
            .map(|m| self.pattern_sections[m.pattern().as_usize()])
            .min()
    }

    pub fn classify(&self, text: &str) -> SectionMap {
        let mut sections = SectionMap::new();
        let mut current: Option<ResumeSection> = None;

        for line in text.split('\n') {
            if let Some(section) = self.heading_section(line) {
                current = Some(section);
                continue;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(section) = current {
                sections.push(section, trimmed.to_string());
            }
        }

        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_chinese_resume() {
        let classifier = SectionClassifier::new().unwrap();
        let sections = classifier.classify("教育背景\n北京大学\n工作经验\n腾讯\n");

        assert_eq!(sections.get(ResumeSection::Education), ["北京大学"]);
        assert_eq!(sections.get(ResumeSection::Experience), ["腾讯"]);
        assert!(sections.get(ResumeSection::Skills).is_empty());
        assert!(sections.get(ResumeSection::Projects).is_empty());
        assert!(sections.get(ResumeSection::Achievements).is_empty());
    }

    #[test]
    fn test_lines_before_first_heading_are_discarded() {
        let classifier = SectionClassifier::new().unwrap();
        let sections = classifier.classify("Jane Doe\njane@example.com\nSKILLS\n  Rust, Go  \n\nPython");

        assert_eq!(sections.get(ResumeSection::Skills), ["Rust, Go", "Python"]);
        assert_eq!(sections.non_empty_count(), 1);
    }

    #[test]
    fn test_multi_section_heading_uses_priority_order() {
        let classifier = SectionClassifier::new().unwrap();
        // "项目经验" matches both projects and experience
        assert_eq!(classifier.heading_section("项目经验"), Some(ResumeSection::Experience));
        assert_eq!(classifier.heading_section("Skills & Education"), Some(ResumeSection::Education));
        assert_eq!(classifier.heading_section("Rust, Go"), None);
    }

    #[test]
    fn test_content_lines_with_keywords_switch_sections() {
        let classifier = SectionClassifier::new().unwrap();
        let text = "Experience\nAcme Corp\nLed projects across teams\nShipped search";
        let sections = classifier.classify(text);

        assert_eq!(sections.get(ResumeSection::Experience), ["Acme Corp"]);
        assert_eq!(sections.get(ResumeSection::Projects), ["Shipped search"]);
    }

    #[test]
    fn test_indented_resume_fills_every_section() {
        let classifier = SectionClassifier::new().unwrap();
        let text = "
        教育背景
        北京大学 计算机科学 本科

        工作经验
        腾讯公司 软件工程师 2年

        技能
        Python, Java, 机器学习

        项目经验
        推荐系统开发

        成就
        获得优秀员工奖
        ";
        let sections = classifier.classify(text);

        assert_eq!(sections.get(ResumeSection::Education), ["北京大学 计算机科学 本科"]);
        assert_eq!(sections.get(ResumeSection::Experience), ["腾讯公司 软件工程师 2年", "推荐系统开发"]);
        assert_eq!(sections.get(ResumeSection::Skills), ["Python, Java, 机器学习"]);
        assert!(sections.get(ResumeSection::Projects).is_empty());
    }
}
