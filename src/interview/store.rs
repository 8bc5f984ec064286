//! In-memory registry of interview sessions
//!
//! The registry map sits behind an `RwLock` that is only held for lookups and
//! inserts. Each session has its own `Mutex`, so answers to one session are
//! serialized while unrelated sessions proceed independently. No lock is held
//! across a gateway call.

use crate::config::InterviewConfig;
use crate::error::{IntervuError, Result};
use crate::interview::session::{
    InterviewEvaluation, Question, Session, SessionSummary, SubmitOutcome,
};
use crate::llm::gateway::{AnswerEvaluation, GatewayError, LlmGateway};
use crate::processing::document::JobCategory;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub questions_per_session: usize,
    pub gateway_timeout: Duration,
    /// `None` keeps sessions until the process exits
    pub session_ttl: Option<Duration>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            questions_per_session: 5,
            gateway_timeout: Duration::from_secs(60),
            session_ttl: None,
        }
    }
}

impl From<&InterviewConfig> for StoreSettings {
    fn from(config: &InterviewConfig) -> Self {
        Self {
            questions_per_session: config.questions_per_session,
            gateway_timeout: config.gateway_timeout(),
            session_ttl: config.session_ttl(),
        }
    }
}

struct SessionEntry {
    created_at: DateTime<Utc>,
    session: Arc<Mutex<Session>>,
}

pub struct SessionStore {
    gateway: Arc<dyn LlmGateway>,
    settings: StoreSettings,
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new(gateway: Arc<dyn LlmGateway>, settings: StoreSettings) -> Self {
        Self {
            gateway,
            settings,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Generate questions and register a fresh session
    pub async fn create_session(&self, job_category: JobCategory, background: &str) -> Result<Session> {
        self.purge_expired().await;

        let count = self.settings.questions_per_session;
        let raw = self
            .with_timeout(self.gateway.generate_questions(job_category, background, count))
            .await?
            .map_err(IntervuError::SessionCreation)?;

        if raw.is_empty() {
            return Err(IntervuError::SessionCreation(GatewayError::EmptyContent));
        }

        let questions: Vec<Question> = raw
            .into_iter()
            .enumerate()
            .map(|(i, q)| Question::from_raw(q, i))
            .collect();

        let session = Session::new(job_category, background.to_string(), questions);
        info!(
            "Created interview session {} ({}, {} questions, {} chars of background)",
            session.id(),
            job_category,
            session.questions().len(),
            session.background().chars().count()
        );

        let entry = SessionEntry {
            created_at: session.created_at(),
            session: Arc::new(Mutex::new(session.clone())),
        };
        self.sessions.write().await.insert(session.id().to_string(), entry);

        Ok(session)
    }

    /// The question awaiting an answer, or `None` for unknown or complete sessions
    pub async fn current_question(&self, session_id: &str) -> Option<Question> {
        let session = self.lookup(session_id).await?;
        let session = session.lock().await;
        session.current_question().cloned()
    }

    pub async fn submit_answer(&self, session_id: &str, answer: &str) -> Result<SubmitOutcome> {
        let session = self.require(session_id).await?;
        let mut session = session.lock().await;
        let outcome = session.record_answer(answer.to_string())?;
        debug!(
            "Session {} answered {}/{}",
            session_id,
            session.cursor(),
            session.questions().len()
        );
        Ok(outcome)
    }

    /// Score every recorded answer and average the scores. Transport
    /// failures and timeouts abort the whole evaluation; an unparsable
    /// reply is kept as an error entry that scores zero.
    pub async fn evaluate(&self, session_id: &str) -> Result<InterviewEvaluation> {
        let (job_category, total_questions, pairs) = {
            let session = self.require(session_id).await?;
            let session = session.lock().await;
            if session.answers().is_empty() {
                return Err(IntervuError::NoAnswersRecorded(session_id.to_string()));
            }
            (
                session.job_category(),
                session.questions().len(),
                session.answered_pairs(),
            )
        };

        let mut evaluations = Vec::with_capacity(pairs.len());
        for (question, answer) in &pairs {
            let result = self
                .with_timeout(self.gateway.evaluate_answer(question, answer, job_category))
                .await?;
            match result {
                Ok(evaluation) => evaluations.push(evaluation),
                Err(GatewayError::Unparsable(message)) => {
                    warn!("Unparsable evaluation in session {}: {}", session_id, message);
                    evaluations.push(AnswerEvaluation::unparsable(message));
                }
                Err(e) => return Err(IntervuError::Gateway(e)),
            }
        }

        let overall_score = mean_score(&evaluations);
        info!("Evaluated session {}: overall score {:.1}", session_id, overall_score);

        Ok(InterviewEvaluation {
            session_id: session_id.to_string(),
            overall_score,
            answered_questions: evaluations.len(),
            evaluations,
            total_questions,
        })
    }

    pub async fn summary(&self, session_id: &str) -> Result<SessionSummary> {
        let session = self.require(session_id).await?;
        let session = session.lock().await;
        Ok(session.summary())
    }

    /// Drop sessions older than the configured TTL; returns how many went
    pub async fn purge_expired(&self) -> usize {
        let Some(ttl) = self.settings.session_ttl else {
            return 0;
        };
        let now = Utc::now();

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !is_expired(entry.created_at, ttl, now));
        let removed = before - sessions.len();
        if removed > 0 {
            info!("Evicted {} expired interview sessions", removed);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn lookup(&self, session_id: &str) -> Option<Arc<Mutex<Session>>> {
        let sessions = self.sessions.read().await;
        let entry = sessions.get(session_id)?;
        if let Some(ttl) = self.settings.session_ttl {
            if is_expired(entry.created_at, ttl, Utc::now()) {
                return None;
            }
        }
        Some(Arc::clone(&entry.session))
    }

    async fn require(&self, session_id: &str) -> Result<Arc<Mutex<Session>>> {
        self.lookup(session_id)
            .await
            .ok_or_else(|| IntervuError::SessionNotFound(session_id.to_string()))
    }

    async fn with_timeout<F: Future>(&self, fut: F) -> Result<F::Output> {
        tokio::time::timeout(self.settings.gateway_timeout, fut)
            .await
            .map_err(|_| IntervuError::GatewayTimeout(self.settings.gateway_timeout.as_secs()))
    }
}

fn is_expired(created_at: DateTime<Utc>, ttl: Duration, now: DateTime<Utc>) -> bool {
    match chrono::Duration::from_std(ttl) {
        Ok(ttl) => now - created_at > ttl,
        Err(_) => false,
    }
}

fn mean_score(evaluations: &[AnswerEvaluation]) -> f64 {
    if evaluations.is_empty() {
        return 0.0;
    }
    evaluations.iter().map(AnswerEvaluation::score).sum::<f64>() / evaluations.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_score_handles_empty_and_missing() {
        assert_eq!(mean_score(&[]), 0.0);
        let evals = vec![
            AnswerEvaluation::with_score(70.0),
            AnswerEvaluation::unparsable("bad json"),
            AnswerEvaluation::with_score(80.0),
        ];
        assert_eq!(mean_score(&evals), 50.0);
    }

    #[test]
    fn test_expiry_boundary() {
        let created = Utc::now();
        let ttl = Duration::from_secs(60);
        assert!(!is_expired(created, ttl, created + chrono::Duration::seconds(60)));
        assert!(is_expired(created, ttl, created + chrono::Duration::seconds(61)));
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = crate::config::Config::default().interview;
        config.session_ttl_secs = 0;
        config.questions_per_session = 3;
        let settings = StoreSettings::from(&config);
        assert_eq!(settings.questions_per_session, 3);
        assert_eq!(settings.gateway_timeout, Duration::from_secs(60));
        assert!(settings.session_ttl.is_none());

        config.session_ttl_secs = 90;
        assert_eq!(StoreSettings::from(&config).session_ttl, Some(Duration::from_secs(90)));
    }
}
