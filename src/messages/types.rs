use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text shown while a recorded answer is being transcribed. The placeholder
/// entry is tracked by message id, never by this literal, so a genuine
/// message with identical text is never affected.
pub const TRANSCRIBING_PLACEHOLDER: &str = "Transcribing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    Assistant,
    User,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            speaker,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, text)
    }

    /// Transient system entry shown while transcription is in flight
    pub fn transcribing_placeholder() -> Self {
        Self::new(Speaker::System, TRANSCRIBING_PLACEHOLDER)
    }
}

/// Uppercase the first character of a message, leaving the rest untouched
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_ids_are_unique() {
        let a = Message::assistant("Hello");
        let b = Message::assistant("Hello");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_placeholder_message() {
        let msg = Message::transcribing_placeholder();
        assert_eq!(msg.speaker, Speaker::System);
        assert_eq!(msg.text, TRANSCRIBING_PLACEHOLDER);
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("hello there"), "Hello there");
        assert_eq!(capitalize_first("Already fine"), "Already fine");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("a"), "A");
        assert_eq!(capitalize_first("über cool"), "Über cool");
    }
}
