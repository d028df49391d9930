use super::types::Message;
use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

/// Append-only conversation transcript, shared between the session
/// controller (writer) and the UI (reader). The only removal ever performed
/// is the transcription placeholder, keyed by message id.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Append a message and return its id
    pub fn push(&self, message: Message) -> Uuid {
        let id = message.id;
        self.messages.write().push(message);
        id
    }

    /// Remove the message with the given id. Returns whether it was present.
    pub fn remove(&self, id: Uuid) -> bool {
        let mut messages = self.messages.write();
        let before = messages.len();
        messages.retain(|m| m.id != id);
        messages.len() != before
    }

    pub fn get_all(&self) -> Vec<Message> {
        self.messages.read().clone()
    }

    pub fn last(&self) -> Option<Message> {
        self.messages.read().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::types::{Speaker, TRANSCRIBING_PLACEHOLDER};

    #[test]
    fn test_push_preserves_order() {
        let transcript = Transcript::new();
        transcript.push(Message::assistant("First"));
        transcript.push(Message::user("Second"));
        transcript.push(Message::assistant("Third"));

        let all = transcript.get_all();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].text, "First");
        assert_eq!(all[1].text, "Second");
        assert_eq!(all[2].text, "Third");
    }

    #[test]
    fn test_remove_by_id() {
        let transcript = Transcript::new();
        transcript.push(Message::assistant("Keep me"));
        let id = transcript.push(Message::transcribing_placeholder());

        assert!(transcript.remove(id));
        assert!(!transcript.remove(id));

        let all = transcript.get_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].text, "Keep me");
    }

    #[test]
    fn test_remove_does_not_match_by_text() {
        // A user answer that happens to equal the placeholder literal must
        // survive placeholder removal.
        let transcript = Transcript::new();
        let decoy = transcript.push(Message::user(TRANSCRIBING_PLACEHOLDER));
        let placeholder = transcript.push(Message::transcribing_placeholder());

        assert!(transcript.remove(placeholder));

        let all = transcript.get_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, decoy);
        assert_eq!(all[0].speaker, Speaker::User);
        assert_eq!(all[0].text, TRANSCRIBING_PLACEHOLDER);
    }

    #[test]
    fn test_shared_view() {
        let transcript = Transcript::new();
        let reader = transcript.clone();
        transcript.push(Message::assistant("Shared"));
        assert_eq!(reader.len(), 1);
        assert_eq!(reader.last().map(|m| m.text), Some("Shared".to_string()));
    }
}
