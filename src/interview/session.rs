//! Interview session state

use crate::error::{IntervuError, Result};
use crate::llm::gateway::{AnswerEvaluation, RawQuestion};
use crate::processing::document::JobCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    pub category: String,
    pub difficulty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Question {
    /// Fill in whatever the model left out; `index` is zero-based
    pub fn from_raw(raw: RawQuestion, index: usize) -> Self {
        fn present(field: Option<String>) -> Option<String> {
            field.filter(|s| !s.trim().is_empty())
        }

        Self {
            text: present(raw.question).unwrap_or_else(|| format!("问题{}", index + 1)),
            category: present(raw.category).unwrap_or_else(|| "general".to_string()),
            difficulty: present(raw.difficulty).unwrap_or_else(|| "medium".to_string()),
            context: present(raw.context),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question_index: usize,
    pub content: String,
    pub answered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    AwaitingAnswers,
    Complete,
}

/// One mock interview. Questions are fixed at creation; answers are only
/// appended together with a cursor advance, so `answers.len() == cursor`.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    id: String,
    job_category: JobCategory,
    background: String,
    questions: Vec<Question>,
    cursor: usize,
    created_at: DateTime<Utc>,
    answers: Vec<Answer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitOutcome {
    pub completed: bool,
    pub next_question: Option<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub job_category: JobCategory,
    pub total_questions: usize,
    pub answered_questions: usize,
    pub current_question: usize,
    pub created_at: DateTime<Utc>,
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewEvaluation {
    pub session_id: String,
    pub overall_score: f64,
    pub evaluations: Vec<AnswerEvaluation>,
    pub total_questions: usize,
    pub answered_questions: usize,
}

impl Session {
    pub fn new(job_category: JobCategory, background: String, questions: Vec<Question>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            job_category,
            background,
            questions,
            cursor: 0,
            created_at: Utc::now(),
            answers: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn job_category(&self) -> JobCategory {
        self.job_category
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn state(&self) -> SessionState {
        if self.cursor < self.questions.len() {
            SessionState::AwaitingAnswers
        } else {
            SessionState::Complete
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state() == SessionState::Complete
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    /// Record an answer to the current question and advance
    pub fn record_answer(&mut self, content: String) -> Result<SubmitOutcome> {
        if self.is_complete() {
            return Err(IntervuError::SessionAlreadyComplete(self.id.clone()));
        }

        self.answers.push(Answer {
            question_index: self.cursor,
            content,
            answered_at: Utc::now(),
        });
        self.cursor += 1;

        Ok(SubmitOutcome {
            completed: self.is_complete(),
            next_question: self.current_question().cloned(),
        })
    }

    /// Question/answer text pairs in answer order
    pub fn answered_pairs(&self) -> Vec<(String, String)> {
        self.answers
            .iter()
            .filter_map(|a| {
                self.questions
                    .get(a.question_index)
                    .map(|q| (q.text.clone(), a.content.clone()))
            })
            .collect()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.id.clone(),
            job_category: self.job_category,
            total_questions: self.questions.len(),
            answered_questions: self.answers.len(),
            current_question: self.cursor,
            created_at: self.created_at,
            is_completed: self.is_complete(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(n: usize) -> Session {
        let questions = (0..n)
            .map(|i| Question::from_raw(RawQuestion::new(&format!("Q{}", i), "technical", "easy"), i))
            .collect();
        Session::new(JobCategory::SoftwareEngineer, "background".to_string(), questions)
    }

    #[test]
    fn test_question_defaults() {
        let q = Question::from_raw(RawQuestion::default(), 2);
        assert_eq!(q.text, "问题3");
        assert_eq!(q.category, "general");
        assert_eq!(q.difficulty, "medium");
        assert_eq!(q.context, None);

        let blank = RawQuestion {
            question: Some("  ".to_string()),
            context: Some(String::new()),
            ..RawQuestion::default()
        };
        assert_eq!(Question::from_raw(blank, 0).text, "问题1");
    }

    #[test]
    fn test_cursor_tracks_answers() {
        let mut session = session_with(3);
        assert_eq!(session.state(), SessionState::AwaitingAnswers);

        for k in 1..=3 {
            let outcome = session.record_answer(format!("A{}", k)).unwrap();
            assert_eq!(session.cursor(), k);
            assert_eq!(session.answers().len(), k);
            assert_eq!(outcome.completed, k == 3);
            assert_eq!(outcome.next_question.map(|q| q.text), session.current_question().map(|q| q.text.clone()));
        }

        assert!(session.is_complete());
        assert!(session.current_question().is_none());
        assert_eq!(session.answers()[2].question_index, 2);
    }

    #[test]
    fn test_complete_session_rejects_answers_without_mutation() {
        let mut session = session_with(1);
        session.record_answer("only".to_string()).unwrap();

        let err = session.record_answer("extra".to_string()).unwrap_err();
        assert!(matches!(err, IntervuError::SessionAlreadyComplete(_)));
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn test_zero_question_session_is_complete() {
        let session = session_with(0);
        assert!(session.is_complete());
        assert!(session.summary().is_completed);
    }
}
