//! Prompt templates for the interview and résumé gateways

use log::debug;

pub const QUESTION_SYSTEM: &str = "你是专业面试官";
pub const EVALUATION_SYSTEM: &str = "你是面试评估专家";
pub const ANALYSIS_SYSTEM: &str = "你是简历分析专家";

/// Prompt templates with `{placeholder}` substitution
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub questions: String,
    pub evaluation: String,
    pub resume_analysis: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            questions: QUESTIONS_TEMPLATE.to_string(),
            evaluation: EVALUATION_TEMPLATE.to_string(),
            resume_analysis: RESUME_ANALYSIS_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    pub fn render_questions(&self, job_category: &str, background: &str, count: usize) -> String {
        let prompt = self
            .questions
            .replace("{count}", &count.to_string())
            .replace("{job_category}", job_category)
            .replace("{background}", background);
        debug!("Question prompt: {} chars", prompt.chars().count());
        prompt
    }

    pub fn render_evaluation(&self, job_category: &str, question: &str, answer: &str) -> String {
        let prompt = self
            .evaluation
            .replace("{job_category}", job_category)
            .replace("{question}", question)
            .replace("{answer}", answer);
        debug!("Evaluation prompt: {} chars", prompt.chars().count());
        prompt
    }

    pub fn render_resume_analysis(
        &self,
        job_category: &str,
        job_description: &str,
        resume: &str,
    ) -> String {
        let prompt = self
            .resume_analysis
            .replace("{job_category}", job_category)
            .replace("{job_description}", job_description)
            .replace("{resume}", resume);
        debug!("Resume analysis prompt: {} chars", prompt.chars().count());
        prompt
    }
}

const QUESTIONS_TEMPLATE: &str = r#"生成{count}个面试问题：

岗位类型：{job_category}
用户背景：{background}

请生成相关问题，以JSON数组格式返回，每个元素包含字段：
question（问题内容）、category（问题类别）、difficulty（easy/medium/hard）、context（问题背景，可选）。
只返回JSON，不要包含其他文字。"#;

const EVALUATION_TEMPLATE: &str = r#"评估面试回答：

岗位类型：{job_category}
问题：{question}
回答：{answer}

请评估并返回JSON对象，至少包含字段 overall_score（0-100的数字），
可附加 feedback、strengths、improvement_suggestions 等字段。只返回JSON。"#;

const RESUME_ANALYSIS_TEMPLATE: &str = r#"分析简历与岗位匹配度：

岗位类型：{job_category}
岗位描述：{job_description}
简历内容：{resume}

请分析：
1. 总体匹配度评分（0-100分）
2. 各章节评分
3. 优势分析
4. 改进建议
5. 匹配和缺失的关键词

以JSON格式返回，字段为：overall_score, section_scores（education/experience/skills/projects/achievements 到分数的映射）,
strengths, weaknesses, suggestions, keywords_match, missing_keywords。"#;
