//! Integration tests for intervu

use async_trait::async_trait;
use intervu::error::IntervuError;
use intervu::input::InputManager;
use intervu::interview::{SessionStore, StoreSettings};
use intervu::llm::{AnswerEvaluation, GatewayError, LlmGateway, RawQuestion, ResumeAnalysis};
use intervu::processing::analyzer::ResumeAnalyzer;
use intervu::processing::chunker::chunk_text;
use intervu::processing::document::{JobCategory, ResumeSection};
use intervu::processing::normalizer::TextNormalizer;
use intervu::processing::sections::SectionClassifier;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const SAMPLE_RESUME: &str = "tests/fixtures/sample_resume.txt";

#[derive(Clone, Copy)]
enum Reply {
    Score(f64),
    Unparsable,
    ServerError,
}

/// Gateway double: fixed questions, per-answer scripted evaluations
struct ScriptedGateway {
    questions: Option<Vec<RawQuestion>>,
    replies: HashMap<String, Reply>,
    delay: Option<Duration>,
    evaluate_calls: AtomicUsize,
}

impl ScriptedGateway {
    fn with_questions(count: usize) -> Self {
        let questions = (0..count)
            .map(|i| RawQuestion::new(&format!("Question {}", i + 1), "technical", "medium"))
            .collect();
        Self {
            questions: Some(questions),
            replies: HashMap::new(),
            delay: None,
            evaluate_calls: AtomicUsize::new(0),
        }
    }

    fn reply(mut self, answer: &str, reply: Reply) -> Self {
        self.replies.insert(answer.to_string(), reply);
        self
    }

    fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn failing() -> Self {
        Self {
            questions: None,
            ..Self::with_questions(0)
        }
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn generate_questions(
        &self,
        _job_category: JobCategory,
        _background: &str,
        count: usize,
    ) -> Result<Vec<RawQuestion>, GatewayError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.questions {
            Some(questions) => Ok(questions.iter().take(count).cloned().collect()),
            None => Err(GatewayError::Api {
                status: 503,
                message: "overloaded".to_string(),
            }),
        }
    }

    async fn evaluate_answer(
        &self,
        _question: &str,
        answer: &str,
        _job_category: JobCategory,
    ) -> Result<AnswerEvaluation, GatewayError> {
        self.evaluate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.replies.get(answer).copied().unwrap_or(Reply::Score(50.0)) {
            Reply::Score(score) => Ok(AnswerEvaluation::with_score(score)),
            Reply::Unparsable => Err(GatewayError::Unparsable("expected value at line 1".to_string())),
            Reply::ServerError => Err(GatewayError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
        }
    }

    async fn analyze_resume(
        &self,
        _resume_text: &str,
        _job_description: &str,
        _job_category: JobCategory,
    ) -> Result<ResumeAnalysis, GatewayError> {
        Ok(ResumeAnalysis {
            overall_score: 64.0,
            ..ResumeAnalysis::default()
        })
    }
}

fn store_with(gateway: ScriptedGateway, questions_per_session: usize) -> SessionStore {
    let settings = StoreSettings {
        questions_per_session,
        ..StoreSettings::default()
    };
    SessionStore::new(Arc::new(gateway), settings)
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let document = manager.extract(Path::new(SAMPLE_RESUME)).await.unwrap();

    assert!(document.full_text.contains("John Doe"));
    assert!(document.full_text.contains("Software Engineer"));
    assert!(document.full_text.contains("React"));
    assert!(document.full_text.contains("Node.js"));
    assert_eq!(document.chunks.len(), 6);
    assert!(document.chunks[0].starts_with("John Doe"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new(SAMPLE_RESUME);

    let first = manager.extract(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let second = manager.extract(path).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let result = manager.extract(Path::new("tests/fixtures/unsupported.xyz")).await;
    assert!(matches!(result, Err(IntervuError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new().with_cache(false);
    let result = manager.extract(Path::new("tests/fixtures/nonexistent.txt")).await;
    assert!(matches!(result, Err(IntervuError::Extraction { .. })));
}

#[tokio::test]
async fn test_docx_extraction_from_generated_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resume.docx");

    let file = std::fs::File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    zip.start_file("word/document.xml", zip::write::FileOptions::default())
        .unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
<w:p/>
<w:tbl>
<w:tr><w:tc><w:p><w:r><w:t>Skills</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>Rust</w:t></w:r></w:p></w:tc></w:tr>
<w:tr><w:tc><w:p/></w:tc><w:tc><w:p/></w:tc></w:tr>
</w:tbl>
</w:body></w:document>"#,
    )
    .unwrap();
    zip.finish().unwrap();

    let document = InputManager::new().extract(&path).await.unwrap();
    assert_eq!(document.chunks, vec!["Jane Doe", "Skills | Rust"]);
    assert_eq!(document.full_text, "Jane Doe\nSkills | Rust");
}

#[tokio::test]
async fn test_legacy_doc_fails_as_extraction_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resume.doc");
    std::fs::write(&path, b"\xD0\xCF\x11\xE0 legacy binary").unwrap();

    let result = InputManager::new().extract(&path).await;
    assert!(matches!(result, Err(IntervuError::Extraction { .. })));
}

#[tokio::test]
async fn test_sections_from_sample_resume() {
    let document = InputManager::new().extract(Path::new(SAMPLE_RESUME)).await.unwrap();
    let cleaned = TextNormalizer::new().clean_lines(&document.full_text);
    let sections = SectionClassifier::new().unwrap().classify(&cleaned);

    assert_eq!(sections.get(ResumeSection::Education).len(), 1);
    assert_eq!(sections.get(ResumeSection::Experience).len(), 2);
    assert_eq!(sections.get(ResumeSection::Skills).len(), 2);
    assert_eq!(sections.get(ResumeSection::Projects).len(), 1);
    assert_eq!(sections.get(ResumeSection::Achievements), ["Hackathon winner, 2018."]);
    assert_eq!(sections.non_empty_count(), 5);
}

#[tokio::test]
async fn test_chunking_sample_resume() {
    let document = InputManager::new().extract(Path::new(SAMPLE_RESUME)).await.unwrap();
    let chunks = chunk_text(&document.full_text, 120, 20).unwrap();

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 120);
        assert!(!chunk.is_empty());
    }
    assert!(chunk_text(&document.full_text, 20, 20).is_err());
}

#[tokio::test]
async fn test_process_uploaded_file() {
    let gateway = Arc::new(ScriptedGateway::with_questions(0));
    let mut analyzer = ResumeAnalyzer::new(gateway, Duration::from_secs(5)).unwrap();

    let upload = analyzer.process_uploaded_file(Path::new(SAMPLE_RESUME)).await.unwrap();
    assert_eq!(upload.filename, "sample_resume.txt");
    assert!(upload.file_size > 0);
    assert!(!upload.full_text.contains('\n'));
    assert!(!upload.full_text.contains('|'));
    assert_eq!(upload.sections.non_empty_count(), 5);
}

#[tokio::test]
async fn test_full_interview_flow() {
    let gateway = ScriptedGateway::with_questions(2)
        .reply("first answer", Reply::Score(70.0))
        .reply("second answer", Reply::Score(90.0));
    let store = store_with(gateway, 2);

    let session = store
        .create_session(JobCategory::SoftwareEngineer, "Rust developer")
        .await
        .unwrap();
    let id = session.id().to_string();
    assert_eq!(session.questions().len(), 2);
    assert_eq!(session.cursor(), 0);

    let first = store.current_question(&id).await.unwrap();
    assert_eq!(first.text, "Question 1");

    let outcome = store.submit_answer(&id, "first answer").await.unwrap();
    assert!(!outcome.completed);
    assert_eq!(outcome.next_question.unwrap().text, "Question 2");

    let outcome = store.submit_answer(&id, "second answer").await.unwrap();
    assert!(outcome.completed);
    assert!(outcome.next_question.is_none());
    assert!(store.current_question(&id).await.is_none());

    let result = store.submit_answer(&id, "too late").await;
    assert!(matches!(result, Err(IntervuError::SessionAlreadyComplete(_))));

    let evaluation = store.evaluate(&id).await.unwrap();
    assert_eq!(evaluation.overall_score, 80.0);
    assert_eq!(evaluation.answered_questions, 2);
    assert_eq!(evaluation.total_questions, 2);

    let summary = store.summary(&id).await.unwrap();
    assert!(summary.is_completed);
    assert_eq!(summary.answered_questions, 2);
    assert_eq!(summary.current_question, 2);
}

#[tokio::test]
async fn test_evaluation_is_recomputed_each_call() {
    let gateway = Arc::new(ScriptedGateway::with_questions(1));
    let store = SessionStore::new(gateway.clone(), StoreSettings::default());

    let session = store.create_session(JobCategory::Marketing, "").await.unwrap();
    store.submit_answer(session.id(), "answer").await.unwrap();

    store.evaluate(session.id()).await.unwrap();
    store.evaluate(session.id()).await.unwrap();
    assert_eq!(gateway.evaluate_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_unknown_session() {
    let store = store_with(ScriptedGateway::with_questions(1), 1);

    assert!(store.current_question("missing").await.is_none());
    assert!(matches!(
        store.submit_answer("missing", "hi").await,
        Err(IntervuError::SessionNotFound(_))
    ));
    assert!(matches!(store.evaluate("missing").await, Err(IntervuError::SessionNotFound(_))));
    assert!(matches!(store.summary("missing").await, Err(IntervuError::SessionNotFound(_))));
}

#[tokio::test]
async fn test_evaluate_without_answers() {
    let store = store_with(ScriptedGateway::with_questions(3), 3);
    let session = store.create_session(JobCategory::Sales, "").await.unwrap();

    let result = store.evaluate(session.id()).await;
    assert!(matches!(result, Err(IntervuError::NoAnswersRecorded(_))));
}

#[tokio::test]
async fn test_session_creation_failures() {
    let store = store_with(ScriptedGateway::failing(), 5);
    let result = store.create_session(JobCategory::Other, "").await;
    assert!(matches!(result, Err(IntervuError::SessionCreation(GatewayError::Api { .. }))));
    assert!(store.is_empty().await);

    let store = store_with(ScriptedGateway::with_questions(0), 5);
    let result = store.create_session(JobCategory::Other, "").await;
    assert!(matches!(result, Err(IntervuError::SessionCreation(GatewayError::EmptyContent))));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_missing_question_fields_get_defaults() {
    let gateway = ScriptedGateway {
        questions: Some(vec![RawQuestion::default(), RawQuestion::new("Real one", "behavioral", "hard")]),
        ..ScriptedGateway::with_questions(0)
    };
    let store = store_with(gateway, 5);

    let session = store.create_session(JobCategory::ProductManager, "").await.unwrap();
    let first = &session.questions()[0];
    assert_eq!(first.text, "问题1");
    assert_eq!(first.category, "general");
    assert_eq!(first.difficulty, "medium");
    assert_eq!(session.questions()[1].difficulty, "hard");
}

#[tokio::test]
async fn test_unparsable_evaluation_scores_zero() {
    let gateway = ScriptedGateway::with_questions(2)
        .reply("solid", Reply::Score(80.0))
        .reply("garbled", Reply::Unparsable);
    let store = store_with(gateway, 2);

    let session = store.create_session(JobCategory::DataScientist, "").await.unwrap();
    store.submit_answer(session.id(), "solid").await.unwrap();
    store.submit_answer(session.id(), "garbled").await.unwrap();

    let evaluation = store.evaluate(session.id()).await.unwrap();
    assert_eq!(evaluation.overall_score, 40.0);
    assert!(!evaluation.evaluations[0].is_error());
    assert!(evaluation.evaluations[1].is_error());
}

#[tokio::test]
async fn test_gateway_failure_aborts_evaluation() {
    let gateway = ScriptedGateway::with_questions(2)
        .reply("fine", Reply::Score(80.0))
        .reply("unlucky", Reply::ServerError);
    let store = store_with(gateway, 2);

    let session = store.create_session(JobCategory::SoftwareEngineer, "").await.unwrap();
    store.submit_answer(session.id(), "fine").await.unwrap();
    store.submit_answer(session.id(), "unlucky").await.unwrap();

    let result = store.evaluate(session.id()).await;
    assert!(matches!(result, Err(IntervuError::Gateway(GatewayError::Api { status: 500, .. }))));
}

#[tokio::test(start_paused = true)]
async fn test_gateway_timeout() {
    let gateway = ScriptedGateway::with_questions(1).delayed(Duration::from_secs(120));
    let settings = StoreSettings {
        gateway_timeout: Duration::from_secs(10),
        ..StoreSettings::default()
    };
    let store = SessionStore::new(Arc::new(gateway), settings);

    let result = store.create_session(JobCategory::SoftwareEngineer, "").await;
    assert!(matches!(result, Err(IntervuError::GatewayTimeout(10))));
    assert!(store.is_empty().await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submits_never_double_append() {
    let store = Arc::new(store_with(ScriptedGateway::with_questions(5), 5));
    let session = store.create_session(JobCategory::SoftwareEngineer, "").await.unwrap();
    let id = session.id().to_string();

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = Arc::clone(&store);
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            store.submit_answer(&id, &format!("answer {}", i)).await
        }));
    }

    let mut accepted = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(IntervuError::SessionAlreadyComplete(_)) => rejected += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(accepted, 5);
    assert_eq!(rejected, 3);
    let summary = store.summary(&id).await.unwrap();
    assert_eq!(summary.answered_questions, 5);
    assert!(summary.is_completed);
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let store = store_with(ScriptedGateway::with_questions(2), 2);
    let a = store.create_session(JobCategory::Sales, "").await.unwrap();
    let b = store.create_session(JobCategory::Sales, "").await.unwrap();
    assert_ne!(a.id(), b.id());

    store.submit_answer(a.id(), "only a").await.unwrap();
    assert_eq!(store.summary(a.id()).await.unwrap().answered_questions, 1);
    assert_eq!(store.summary(b.id()).await.unwrap().answered_questions, 0);
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn test_expired_sessions_are_purged() {
    let settings = StoreSettings {
        questions_per_session: 1,
        session_ttl: Some(Duration::from_millis(50)),
        ..StoreSettings::default()
    };
    let store = SessionStore::new(Arc::new(ScriptedGateway::with_questions(1)), settings);

    let old = store.create_session(JobCategory::Other, "").await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(matches!(store.summary(old.id()).await, Err(IntervuError::SessionNotFound(_))));
    let fresh = store.create_session(JobCategory::Other, "").await.unwrap();

    assert_eq!(store.len().await, 1);
    assert!(store.summary(fresh.id()).await.is_ok());
    assert_eq!(store.purge_expired().await, 0);
}

#[tokio::test]
async fn test_resume_analysis_through_gateway() {
    let analyzer = ResumeAnalyzer::new(Arc::new(ScriptedGateway::with_questions(0)), Duration::from_secs(5)).unwrap();
    let request = intervu::processing::analyzer::ResumeAnalysisRequest {
        resume_text: "Skills\nRust".to_string(),
        target_job: "Backend Engineer".to_string(),
        job_description: Some("Rust services".to_string()),
        job_category: JobCategory::SoftwareEngineer,
    };

    let analysis = analyzer.analyze(&request).await;
    assert_eq!(analysis.overall_score, 64.0);
    assert!(analysis.weaknesses.is_empty());
}
