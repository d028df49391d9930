//! Application configuration
//!
//! Centralized configuration for the interview session: remote service
//! endpoints, the interview role, the topic catalog and UI timing.

use std::time::Duration;

use crate::{Result, VivaError};

/// Default base URL of the interview service
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8000";

/// The interview is always conducted for this role
pub const INTERVIEW_ROLE: &str = "Machine Learning Engineer";

/// Fixed catalog of selectable interview topics
pub const TOPIC_CATALOG: [&str; 14] = [
    "Linear Regression",
    "Gradient Descent",
    "Data Analysis",
    "Data Manipulation",
    "Transformers",
    "Random Forest",
    "Decision Tree",
    "Deep Learning",
    "Statistics",
    "Regularization",
    "Neural Networks",
    "Hypothesis Testing",
    "Natural Language Processing",
    "Large Language Model",
];

/// Configuration for the complete application
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL of the interview service
    pub service_url: String,

    /// Base URL of an optional speech synthesis service. When absent,
    /// questions are shown as text only.
    pub speech_url: Option<String>,

    /// Role label sent with the configuration request
    pub role: String,

    /// Selectable topic catalog
    pub topics: Vec<String>,

    /// Timeout applied to every remote call
    pub request_timeout: Duration,

    /// How long a surfaced error stays visible before auto-clearing
    pub error_clear_after: Duration,

    /// Whether to enable microphone capture
    pub enable_audio_input: bool,

    /// Whether to enable spoken question playback
    pub enable_audio_output: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            speech_url: None,
            role: INTERVIEW_ROLE.to_string(),
            topics: TOPIC_CATALOG.iter().map(|t| t.to_string()).collect(),
            request_timeout: Duration::from_secs(30),
            error_clear_after: Duration::from_secs(5),
            enable_audio_input: true,
            enable_audio_output: true,
        }
    }
}

impl AppConfig {
    /// Create a configuration with environment overrides applied
    /// (`VIVA_SERVICE_URL`, `VIVA_SPEECH_URL`).
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("VIVA_SERVICE_URL") {
            if !url.trim().is_empty() {
                config.service_url = url;
            }
        }
        if let Ok(url) = std::env::var("VIVA_SPEECH_URL") {
            if !url.trim().is_empty() {
                config.speech_url = Some(url);
            }
        }
        config
    }

    /// Set the interview service URL
    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = url.into();
        self
    }

    /// Set the speech synthesis service URL
    pub fn with_speech_url(mut self, url: impl Into<String>) -> Self {
        self.speech_url = Some(url.into());
        self
    }

    /// Set the error auto-clear delay
    pub fn with_error_clear_after(mut self, delay: Duration) -> Self {
        self.error_clear_after = delay;
        self
    }

    /// Disable microphone capture (text-only mode)
    pub fn without_audio_input(mut self) -> Self {
        self.enable_audio_input = false;
        self
    }

    /// Disable spoken question playback
    pub fn without_audio_output(mut self) -> Self {
        self.enable_audio_output = false;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.service_url.trim().is_empty() {
            return Err(VivaError::ConfigError(
                "Interview service URL is required".to_string(),
            ));
        }
        if !self.service_url.starts_with("http://") && !self.service_url.starts_with("https://") {
            return Err(VivaError::ConfigError(format!(
                "Invalid service URL: {}",
                self.service_url
            )));
        }
        if let Some(url) = &self.speech_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(VivaError::ConfigError(format!(
                    "Invalid speech service URL: {}",
                    url
                )));
            }
        }
        if self.topics.is_empty() {
            return Err(VivaError::ConfigError(
                "Topic catalog must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.service_url, DEFAULT_SERVICE_URL);
        assert_eq!(config.role, INTERVIEW_ROLE);
        assert_eq!(config.topics.len(), 14);
        assert_eq!(config.error_clear_after, Duration::from_secs(5));
        assert!(config.enable_audio_input);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_catalog_has_no_duplicates() {
        let config = AppConfig::default();
        let mut topics = config.topics.clone();
        topics.sort();
        topics.dedup();
        assert_eq!(topics.len(), config.topics.len());
    }

    #[test]
    fn test_config_builder() {
        let config = AppConfig::default()
            .with_service_url("http://service:8000")
            .with_speech_url("http://speech:50021")
            .without_audio_input()
            .without_audio_output();

        assert_eq!(config.service_url, "http://service:8000");
        assert_eq!(config.speech_url.as_deref(), Some("http://speech:50021"));
        assert!(!config.enable_audio_input);
        assert!(!config.enable_audio_output);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let config = AppConfig::default().with_service_url("ftp://nope");
        assert!(config.validate().is_err());

        let config = AppConfig::default().with_service_url("");
        assert!(config.validate().is_err());
    }
}
