//! Remote interview service abstraction
//!
//! The session controller talks to the question service exclusively through
//! the [`InterviewService`] trait, so tests can swap in a mock and the HTTP
//! transport stays in one place.

pub mod http;

pub use http::HttpInterviewService;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Response to session configuration: how many questions this interview runs
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionPlan {
    #[serde(rename = "numQuestions")]
    pub num_questions: u32,
}

/// One graded answer in the evaluation report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationEntry {
    pub question: Option<String>,
    pub response: Option<String>,
    pub accuracy: Option<String>,
    pub improvised_response: Option<String>,
}

/// A finished recording ready for upload
#[derive(Debug, Clone)]
pub struct RecordedAudio {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub duration_secs: f32,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait InterviewService: Send + Sync {
    /// Configure a new session for the given role and topic selection,
    /// returning the planned question count.
    async fn configure_session(&self, role: &str, topics: &[String]) -> Result<SessionPlan>;

    /// Fetch the next question. `prior_answer` is the transcribed answer to
    /// the previous question (empty for the opening turn), `turn_index` the
    /// zero-based turn being requested.
    async fn next_question(
        &self,
        prior_answer: &str,
        turn_index: u32,
        topics: &[String],
    ) -> Result<String>;

    /// Transcribe a recorded answer. An empty transcript is an error.
    async fn transcribe(&self, audio: RecordedAudio) -> Result<String>;

    /// Fetch the evaluation report covering `completed_turns` answers
    async fn evaluation_report(&self, completed_turns: u32) -> Result<Vec<EvaluationEntry>>;
}
