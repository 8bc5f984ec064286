//! Console and JSON rendering of analysis and interview results

use crate::config::OutputFormat;
use crate::error::Result;
use crate::interview::{InterviewEvaluation, Question, SessionSummary};
use crate::llm::gateway::ResumeAnalysis;
use crate::processing::analyzer::ResumeSummary;
use crate::processing::document::SectionMap;
use colored::{Color, Colorize};
use std::path::Path;

/// Renders each result kind the CLI prints
pub trait OutputFormatter {
    fn format_analysis(&self, analysis: &ResumeAnalysis) -> Result<String>;
    fn format_evaluation(&self, evaluation: &InterviewEvaluation) -> Result<String>;
    fn format_session_summary(&self, summary: &SessionSummary) -> Result<String>;
    fn format_resume_summary(&self, summary: &ResumeSummary) -> Result<String>;
    fn format_sections(&self, sections: &SectionMap) -> Result<String>;
    fn format_chunks(&self, chunks: &[String]) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

pub struct ConsoleFormatter {
    use_colors: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub fn formatter_for(format: OutputFormat, use_colors: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Console => Box::new(ConsoleFormatter::new(use_colors)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: f64) -> String {
        let (badge, color) = match score.round() as i64 {
            90..=100 => ("EXCELLENT", Color::Green),
            80..=89 => ("VERY GOOD", Color::BrightGreen),
            70..=79 => ("GOOD", Color::Yellow),
            60..=69 => ("FAIR", Color::BrightYellow),
            50..=59 => ("BELOW AVG", Color::Red),
            _ => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_list(&self, output: &mut String, title: &str, items: &[String], color: Color) {
        if items.is_empty() {
            return;
        }
        output.push_str(&self.format_header(title, 3));
        for item in items {
            output.push_str(&format!("  • {}\n", self.colorize(item, color)));
        }
    }

    /// One interview question as shown during an interactive session
    pub fn format_question(&self, index: usize, total: usize, question: &Question) -> String {
        let mut output = format!(
            "\n{} {}\n",
            self.colorize(&format!("[{}/{}]", index + 1, total), Color::Cyan),
            question.text
        );
        output.push_str(&self.colorize(
            &format!("    {} · {}\n", question.category, question.difficulty),
            Color::BrightBlack,
        ));
        if let Some(context) = &question.context {
            output.push_str(&format!("    {}\n", context));
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_analysis(&self, analysis: &ResumeAnalysis) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("📊 RÉSUMÉ ANALYSIS", 1));
        output.push_str(&format!(
            "Overall Score: {:.1} {}\n",
            analysis.overall_score,
            self.format_score_badge(analysis.overall_score)
        ));

        if !analysis.section_scores.is_empty() {
            output.push_str(&self.format_header("Section Scores", 2));
            for (section, score) in &analysis.section_scores {
                output.push_str(&format!("  {:<14} {:>5.1}\n", section, score));
            }
        }

        self.format_list(&mut output, "✅ Strengths", &analysis.strengths, Color::Green);
        self.format_list(&mut output, "⚠️ Weaknesses", &analysis.weaknesses, Color::Yellow);
        self.format_list(&mut output, "💡 Suggestions", &analysis.suggestions, Color::Cyan);
        self.format_list(&mut output, "Matched Keywords", &analysis.keywords_match, Color::Green);
        self.format_list(&mut output, "Missing Keywords", &analysis.missing_keywords, Color::Red);

        Ok(output)
    }

    fn format_evaluation(&self, evaluation: &InterviewEvaluation) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("🎤 INTERVIEW EVALUATION", 1));
        output.push_str(&format!("Session: {}\n", evaluation.session_id));
        output.push_str(&format!(
            "Answered: {}/{}\n",
            evaluation.answered_questions, evaluation.total_questions
        ));
        output.push_str(&format!(
            "Overall Score: {:.1} {}\n",
            evaluation.overall_score,
            self.format_score_badge(evaluation.overall_score)
        ));

        output.push_str(&self.format_header("Per-answer Scores", 2));
        for (i, eval) in evaluation.evaluations.iter().enumerate() {
            match &eval.error {
                Some(message) => output.push_str(&format!(
                    "  {}. {}\n",
                    i + 1,
                    self.colorize(&format!("unscored ({})", message), Color::Red)
                )),
                None => output.push_str(&format!("  {}. {:.1}\n", i + 1, eval.score())),
            }
            for (key, value) in &eval.details {
                let rendered = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                output.push_str(&self.colorize(&format!("     {}: {}\n", key, rendered), Color::BrightBlack));
            }
        }

        Ok(output)
    }

    fn format_session_summary(&self, summary: &SessionSummary) -> Result<String> {
        let status = if summary.is_completed {
            self.colorize("complete", Color::Green)
        } else {
            self.colorize("in progress", Color::Yellow)
        };
        Ok(format!(
            "Session {} ({}) {}: {}/{} answered, started {}\n",
            summary.session_id,
            summary.job_category,
            status,
            summary.answered_questions,
            summary.total_questions,
            summary.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        ))
    }

    fn format_resume_summary(&self, summary: &ResumeSummary) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("📄 RÉSUMÉ SUMMARY", 1));
        output.push_str(&format!("Length: {} characters\n", summary.total_length));
        output.push_str(&format!("Sections found: {}/{}\n", summary.section_count, summary.sections.len()));

        for (section, preview) in &summary.sections {
            output.push_str(&self.format_header(&format!("{} ({})", section, preview.count), 3));
            for line in &preview.preview {
                output.push_str(&format!("  • {}\n", line));
            }
            if preview.count > preview.preview.len() {
                output.push_str(&self.colorize(
                    &format!("  … {} more\n", preview.count - preview.preview.len()),
                    Color::BrightBlack,
                ));
            }
        }

        Ok(output)
    }

    fn format_sections(&self, sections: &SectionMap) -> Result<String> {
        let mut output = String::new();
        for (section, lines) in sections.iter() {
            output.push_str(&self.format_header(&format!("{} ({})", section, lines.len()), 2));
            for line in lines {
                output.push_str(&format!("  {}\n", line));
            }
        }
        Ok(output)
    }

    fn format_chunks(&self, chunks: &[String]) -> Result<String> {
        let mut output = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            output.push_str(&self.format_header(
                &format!("Chunk {} ({} chars)", i + 1, chunk.chars().count()),
                3,
            ));
            output.push_str(chunk);
            output.push('\n');
        }
        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_analysis(&self, analysis: &ResumeAnalysis) -> Result<String> {
        self.render(analysis)
    }

    fn format_evaluation(&self, evaluation: &InterviewEvaluation) -> Result<String> {
        self.render(evaluation)
    }

    fn format_session_summary(&self, summary: &SessionSummary) -> Result<String> {
        self.render(summary)
    }

    fn format_resume_summary(&self, summary: &ResumeSummary) -> Result<String> {
        self.render(summary)
    }

    fn format_sections(&self, sections: &SectionMap) -> Result<String> {
        self.render(sections)
    }

    fn format_chunks(&self, chunks: &[String]) -> Result<String> {
        self.render(&chunks)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

pub fn save_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}
