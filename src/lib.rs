pub mod audio;
pub mod config;
pub mod messages;
pub mod service;
pub mod session;
pub mod speech;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum VivaError {
    #[error("Session configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("Question fetch failed: {0}")]
    TurnFetchFailed(String),

    #[error("Microphone unavailable: {0}")]
    MicrophoneUnavailable(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Evaluation fetch failed: {0}")]
    EvaluationFetchFailed(String),

    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Speech synthesis error: {0}")]
    SpeechError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl VivaError {
    /// Check if this error is recoverable by retrying the triggering action
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The user can retry these manually; the session stays in its
            // last good state.
            VivaError::ConfigurationFailed(_) => true,
            VivaError::TurnFetchFailed(_) => true,
            VivaError::MicrophoneUnavailable(_) => true,
            VivaError::TranscriptionFailed(_) => true,
            VivaError::EvaluationFetchFailed(_) => true,
            // Speech output failures never break the session
            VivaError::SpeechError(_) => true,
            // Hardware/device errors may require user intervention
            VivaError::AudioDeviceError(_) => false,
            VivaError::ConfigError(_) => false,
            VivaError::ChannelError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            VivaError::ConfigurationFailed(_) => {
                "Could not start the interview. Please try again.".to_string()
            }
            VivaError::TurnFetchFailed(_) => {
                "There was an issue fetching the next question.".to_string()
            }
            VivaError::MicrophoneUnavailable(_) => {
                "Microphone access denied or unavailable.".to_string()
            }
            VivaError::TranscriptionFailed(_) => {
                "There was an issue processing the audio. Please record again.".to_string()
            }
            VivaError::EvaluationFetchFailed(_) => {
                "Error fetching evaluation data.".to_string()
            }
            VivaError::AudioDeviceError(_) => {
                "Audio device error. Please check your microphone/speakers.".to_string()
            }
            VivaError::SpeechError(_) => {
                "Text-to-speech failed. The question will be shown as text.".to_string()
            }
            VivaError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            VivaError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, VivaError>;
