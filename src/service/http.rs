//! HTTP transport for the interview service

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{EvaluationEntry, InterviewService, RecordedAudio, SessionPlan};
use crate::{Result, VivaError};

/// Shown in place of a question when the service answers with an empty body
pub const NO_RESPONSE_FALLBACK: &str = "No response received";

#[derive(Debug, Serialize)]
struct ConfigureRequest<'a> {
    role: &'a str,
    topics: &'a [String],
}

#[derive(Debug, Serialize)]
struct QuestionRequest<'a> {
    response: &'a str,
    iter: u32,
    topics: &'a [String],
}

#[derive(Debug, Deserialize)]
struct QuestionResponse {
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct EvaluationRequest {
    iter: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EvaluationResponse {
    answers: Vec<EvaluationEntry>,
}

pub struct HttpInterviewService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInterviewService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VivaError::ConfigError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl InterviewService for HttpInterviewService {
    async fn configure_session(&self, role: &str, topics: &[String]) -> Result<SessionPlan> {
        debug!(role, ?topics, "configuring session");
        let response = self
            .client
            .post(self.url("config_question"))
            .json(&ConfigureRequest { role, topics })
            .send()
            .await
            .map_err(|e| VivaError::ConfigurationFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VivaError::ConfigurationFailed(format!(
                "service returned {}",
                response.status()
            )));
        }

        let plan: SessionPlan = response
            .json()
            .await
            .map_err(|e| VivaError::ConfigurationFailed(e.to_string()))?;
        debug!(num_questions = plan.num_questions, "session configured");
        Ok(plan)
    }

    async fn next_question(
        &self,
        prior_answer: &str,
        turn_index: u32,
        topics: &[String],
    ) -> Result<String> {
        debug!(turn_index, "requesting question");
        let response = self
            .client
            .post(self.url("llm_question"))
            .json(&QuestionRequest {
                response: prior_answer,
                iter: turn_index,
                topics,
            })
            .send()
            .await
            .map_err(|e| VivaError::TurnFetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VivaError::TurnFetchFailed(format!(
                "service returned {}",
                response.status()
            )));
        }

        let body: QuestionResponse = response
            .json()
            .await
            .map_err(|e| VivaError::TurnFetchFailed(e.to_string()))?;

        Ok(match body.response {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                warn!(turn_index, "service returned no question text");
                NO_RESPONSE_FALLBACK.to_string()
            }
        })
    }

    async fn transcribe(&self, audio: RecordedAudio) -> Result<String> {
        debug!(
            bytes = audio.bytes.len(),
            duration_secs = audio.duration_secs,
            "uploading recording"
        );
        let part = Part::bytes(audio.bytes)
            .file_name("answer.wav")
            .mime_str(audio.mime)
            .map_err(|e| VivaError::TranscriptionFailed(e.to_string()))?;
        let form = Form::new().part("audio", part);

        let response = self
            .client
            .post(self.url("audio_to_text"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| VivaError::TranscriptionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VivaError::TranscriptionFailed(format!(
                "service returned {}",
                response.status()
            )));
        }

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| VivaError::TranscriptionFailed(e.to_string()))?;

        // An absent or blank transcript means the audio could not be
        // processed; the caller treats this as a recoverable error.
        match body.text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(VivaError::TranscriptionFailed(
                "empty transcription result".to_string(),
            )),
        }
    }

    async fn evaluation_report(&self, completed_turns: u32) -> Result<Vec<EvaluationEntry>> {
        debug!(completed_turns, "fetching evaluation report");
        let response = self
            .client
            .post(self.url("evaluate_responses"))
            .json(&EvaluationRequest {
                iter: completed_turns,
            })
            .send()
            .await
            .map_err(|e| VivaError::EvaluationFetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VivaError::EvaluationFetchFailed(format!(
                "service returned {}",
                response.status()
            )));
        }

        let body: EvaluationResponse = response
            .json()
            .await
            .map_err(|e| VivaError::EvaluationFetchFailed(e.to_string()))?;
        Ok(body.answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_plan_wire_field() {
        let plan: SessionPlan = serde_json::from_str(r#"{"numQuestions": 5}"#).unwrap();
        assert_eq!(plan.num_questions, 5);
    }

    #[test]
    fn test_question_request_wire_shape() {
        let topics = vec!["Statistics".to_string()];
        let body = serde_json::to_value(QuestionRequest {
            response: "my answer",
            iter: 2,
            topics: &topics,
        })
        .unwrap();
        assert_eq!(body["response"], "my answer");
        assert_eq!(body["iter"], 2);
        assert_eq!(body["topics"][0], "Statistics");
    }

    #[test]
    fn test_evaluation_entry_tolerates_missing_fields() {
        let body: EvaluationResponse = serde_json::from_str(
            r#"{"answers": [
                {"question": "What is overfitting?", "accuracy": "85%"},
                {}
            ]}"#,
        )
        .unwrap();
        assert_eq!(body.answers.len(), 2);
        assert_eq!(
            body.answers[0].question.as_deref(),
            Some("What is overfitting?")
        );
        assert_eq!(body.answers[0].accuracy.as_deref(), Some("85%"));
        assert!(body.answers[0].response.is_none());
        assert!(body.answers[1].question.is_none());
    }

    #[test]
    fn test_evaluation_response_tolerates_missing_answers() {
        let body: EvaluationResponse = serde_json::from_str("{}").unwrap();
        assert!(body.answers.is_empty());
    }

    #[test]
    fn test_transcription_response_variants() {
        let full: TranscriptionResponse =
            serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert_eq!(full.text.as_deref(), Some("hello"));

        let empty: TranscriptionResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.text.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let service =
            HttpInterviewService::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            service.url("config_question"),
            "http://localhost:8000/config_question"
        );
    }
}
