//! Mock interview sessions

pub mod session;
pub mod store;

pub use session::{Answer, InterviewEvaluation, Question, Session, SessionState, SessionSummary, SubmitOutcome};
pub use store::{SessionStore, StoreSettings};
