//! Interview session state machine
//!
//! `Session` is the single aggregate holding all lifecycle state: the stage,
//! the topic selection, turn counters and the recording sub-state. Every
//! mutation goes through a guarded method; callers that fail a guard get a
//! deterministic no-op (`false`) and the state is left untouched.

use std::collections::BTreeSet;

/// Top-level phase of the session. Transitions are strictly forward:
/// Home -> Chat -> Evaluation, with Evaluation terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Home,
    Chat,
    Evaluation,
}

/// Recording sub-state within the Chat stage.
/// Idle -> Recording -> Transcribing -> Idle, re-entrant only from Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingPhase {
    Idle,
    Recording,
    Transcribing,
}

#[derive(Debug, Clone)]
pub struct Session {
    stage: Stage,
    catalog: Vec<String>,
    selected_topics: BTreeSet<String>,
    turn_count: u32,
    total_questions: Option<u32>,
    request_in_flight: bool,
    recording: RecordingPhase,
}

impl Session {
    pub fn new(catalog: Vec<String>) -> Self {
        Self {
            stage: Stage::Home,
            catalog,
            selected_topics: BTreeSet::new(),
            turn_count: 0,
            total_questions: None,
            request_in_flight: false,
            recording: RecordingPhase::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn selected_topics(&self) -> &BTreeSet<String> {
        &self.selected_topics
    }

    /// Selected topics in catalog order, as sent on the wire
    pub fn topics_vec(&self) -> Vec<String> {
        self.catalog
            .iter()
            .filter(|t| self.selected_topics.contains(*t))
            .cloned()
            .collect()
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn total_questions(&self) -> Option<u32> {
        self.total_questions
    }

    pub fn request_in_flight(&self) -> bool {
        self.request_in_flight
    }

    pub fn recording_phase(&self) -> RecordingPhase {
        self.recording
    }

    /// Toggle a topic's membership in the selection. Only valid on the Home
    /// stage; unknown topics are rejected. Returns whether anything changed.
    pub fn toggle_topic(&mut self, topic: &str) -> bool {
        if self.stage != Stage::Home {
            return false;
        }
        if !self.catalog.iter().any(|t| t == topic) {
            return false;
        }
        if !self.selected_topics.remove(topic) {
            self.selected_topics.insert(topic.to_string());
        }
        true
    }

    /// Whether the interview can be started. Starting with zero topics is
    /// rejected locally.
    pub fn can_start(&self) -> bool {
        self.stage == Stage::Home && !self.selected_topics.is_empty() && !self.request_in_flight
    }

    /// Mark the configuration request as in flight
    pub fn begin_configuration(&mut self) -> bool {
        if !self.can_start() {
            return false;
        }
        self.request_in_flight = true;
        true
    }

    /// Configuration response arrived: fix the question count (exactly once)
    /// and move to the Chat stage.
    pub fn apply_configuration(&mut self, num_questions: u32) -> bool {
        if self.stage != Stage::Home || self.total_questions.is_some() {
            return false;
        }
        self.total_questions = Some(num_questions);
        self.request_in_flight = false;
        self.stage = Stage::Chat;
        true
    }

    /// Configuration request failed: stay on Home, clear the gate
    pub fn fail_configuration(&mut self) {
        self.request_in_flight = false;
    }

    /// Gate a question request for `turn_index`. Refuses while another
    /// request is in flight and once the index runs past the final turn, so
    /// duplicate or late calls cannot advance the session.
    pub fn begin_turn_request(&mut self, turn_index: u32) -> bool {
        let Some(total) = self.total_questions else {
            return false;
        };
        if self.stage != Stage::Chat || self.request_in_flight {
            return false;
        }
        if turn_index > total || turn_index != self.turn_count {
            return false;
        }
        self.request_in_flight = true;
        true
    }

    /// A question for `turn_index` arrived; the turn counter advances by
    /// exactly one.
    pub fn complete_turn(&mut self, turn_index: u32) {
        debug_assert_eq!(self.turn_count, turn_index);
        self.request_in_flight = false;
        self.turn_count = turn_index + 1;
    }

    /// The question request failed; the turn counter does not move
    pub fn fail_turn(&mut self) {
        self.request_in_flight = false;
    }

    /// Recording is allowed in Chat, from Idle, while questions remain.
    /// Once the terminal turn has been consumed (`turn_count` past
    /// `total_questions`) there is no question left to answer.
    pub fn can_record(&self) -> bool {
        match self.total_questions {
            Some(total) => {
                self.stage == Stage::Chat
                    && self.recording == RecordingPhase::Idle
                    && self.turn_count <= total
            }
            None => false,
        }
    }

    pub fn begin_recording(&mut self) -> bool {
        if !self.can_record() {
            return false;
        }
        self.recording = RecordingPhase::Recording;
        true
    }

    /// Capture stopped; the audio is now being transcribed
    pub fn recording_stopped(&mut self) -> bool {
        if self.recording != RecordingPhase::Recording {
            return false;
        }
        self.recording = RecordingPhase::Transcribing;
        true
    }

    /// Capture failed to start or was abandoned; back to Idle
    pub fn recording_failed(&mut self) {
        self.recording = RecordingPhase::Idle;
    }

    /// Transcription resolved (either way); the sub-machine returns to Idle
    pub fn transcription_finished(&mut self) {
        self.recording = RecordingPhase::Idle;
    }

    /// The evaluation becomes reachable exactly when the terminal turn has
    /// been consumed.
    pub fn can_enter_evaluation(&self) -> bool {
        self.stage == Stage::Chat
            && self
                .total_questions
                .is_some_and(|total| self.turn_count == total + 1)
    }

    pub fn enter_evaluation(&mut self) -> bool {
        if !self.can_enter_evaluation() {
            return false;
        }
        self.stage = Stage::Evaluation;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<String> {
        vec![
            "Statistics".to_string(),
            "Neural Networks".to_string(),
            "Transformers".to_string(),
        ]
    }

    #[test]
    fn test_topic_toggle_parity() {
        let mut session = Session::new(catalog());

        // Toggled an odd number of times -> selected
        session.toggle_topic("Statistics");
        // Toggled an even number of times -> not selected
        session.toggle_topic("Neural Networks");
        session.toggle_topic("Neural Networks");
        session.toggle_topic("Transformers");
        session.toggle_topic("Transformers");
        session.toggle_topic("Transformers");

        let selected = session.selected_topics();
        assert!(selected.contains("Statistics"));
        assert!(!selected.contains("Neural Networks"));
        assert!(selected.contains("Transformers"));
    }

    #[test]
    fn test_unknown_topic_is_rejected() {
        let mut session = Session::new(catalog());
        assert!(!session.toggle_topic("Quantum Basket Weaving"));
        assert!(session.selected_topics().is_empty());
    }

    #[test]
    fn test_toggle_only_valid_on_home() {
        let mut session = Session::new(catalog());
        session.toggle_topic("Statistics");
        assert!(session.begin_configuration());
        assert!(session.apply_configuration(3));
        assert!(!session.toggle_topic("Transformers"));
    }

    #[test]
    fn test_cannot_start_with_empty_selection() {
        let mut session = Session::new(catalog());
        assert!(!session.can_start());
        assert!(!session.begin_configuration());
        session.toggle_topic("Statistics");
        assert!(session.can_start());
    }

    #[test]
    fn test_total_questions_set_exactly_once() {
        let mut session = Session::new(catalog());
        session.toggle_topic("Statistics");
        assert!(session.begin_configuration());
        assert!(session.apply_configuration(3));
        assert_eq!(session.total_questions(), Some(3));
        assert_eq!(session.stage(), Stage::Chat);

        // A second configuration can never overwrite the count
        assert!(!session.apply_configuration(7));
        assert_eq!(session.total_questions(), Some(3));
    }

    #[test]
    fn test_failed_configuration_stays_home() {
        let mut session = Session::new(catalog());
        session.toggle_topic("Statistics");
        assert!(session.begin_configuration());
        session.fail_configuration();
        assert_eq!(session.stage(), Stage::Home);
        assert_eq!(session.total_questions(), None);
        // A second attempt is possible
        assert!(session.begin_configuration());
    }

    #[test]
    fn test_turn_counter_increments_only_on_success() {
        let mut session = Session::new(catalog());
        session.toggle_topic("Statistics");
        session.begin_configuration();
        session.apply_configuration(3);

        assert!(session.begin_turn_request(0));
        session.fail_turn();
        assert_eq!(session.turn_count(), 0);

        assert!(session.begin_turn_request(0));
        session.complete_turn(0);
        assert_eq!(session.turn_count(), 1);
    }

    #[test]
    fn test_no_concurrent_turn_requests() {
        let mut session = Session::new(catalog());
        session.toggle_topic("Statistics");
        session.begin_configuration();
        session.apply_configuration(3);

        assert!(session.begin_turn_request(0));
        // A second request while one is in flight is refused
        assert!(!session.begin_turn_request(0));
        session.complete_turn(0);
        assert!(session.begin_turn_request(1));
    }

    #[test]
    fn test_late_turn_request_is_noop() {
        let mut session = Session::new(catalog());
        session.toggle_topic("Statistics");
        session.begin_configuration();
        session.apply_configuration(1);

        for idx in 0..=1 {
            assert!(session.begin_turn_request(idx));
            session.complete_turn(idx);
        }
        assert_eq!(session.turn_count(), 2);
        // Index past the terminal turn can never start a request
        assert!(!session.begin_turn_request(2));
        // Stale duplicate of an already-completed index is refused too
        assert!(!session.begin_turn_request(1));
    }

    #[test]
    fn test_full_session_scenario() {
        // Select two topics, configure with 3 questions, run all turns
        let mut session = Session::new(catalog());
        session.toggle_topic("Statistics");
        session.toggle_topic("Neural Networks");
        assert!(session.begin_configuration());
        assert!(session.apply_configuration(3));
        assert_eq!(session.stage(), Stage::Chat);

        // Opening turn
        assert!(session.begin_turn_request(0));
        session.complete_turn(0);
        assert_eq!(session.turn_count(), 1);
        assert!(!session.can_enter_evaluation());

        // Three record/transcribe/turn cycles
        for idx in 1..=3 {
            assert!(session.begin_recording());
            assert!(session.recording_stopped());
            session.transcription_finished();
            assert!(session.begin_turn_request(idx));
            session.complete_turn(idx);
        }

        assert_eq!(session.turn_count(), 4);
        assert!(session.can_enter_evaluation());
        assert!(!session.can_record());
        assert!(session.enter_evaluation());
        assert_eq!(session.stage(), Stage::Evaluation);
        // Terminal stage: no way back, no way forward
        assert!(!session.enter_evaluation());
        assert!(!session.begin_recording());
    }

    #[test]
    fn test_evaluation_unreachable_early() {
        let mut session = Session::new(catalog());
        session.toggle_topic("Statistics");
        session.begin_configuration();
        session.apply_configuration(3);
        session.begin_turn_request(0);
        session.complete_turn(0);

        assert!(!session.can_enter_evaluation());
        assert!(!session.enter_evaluation());
        assert_eq!(session.stage(), Stage::Chat);
    }

    #[test]
    fn test_single_recording_session() {
        let mut session = Session::new(catalog());
        session.toggle_topic("Statistics");
        session.begin_configuration();
        session.apply_configuration(3);
        session.begin_turn_request(0);
        session.complete_turn(0);

        assert!(session.begin_recording());
        // Starting again while active has no effect on the existing session
        assert!(!session.begin_recording());
        assert_eq!(session.recording_phase(), RecordingPhase::Recording);

        assert!(session.recording_stopped());
        assert!(!session.begin_recording());
        session.transcription_finished();
        assert!(session.begin_recording());
    }

    #[test]
    fn test_recording_failure_resets_to_idle() {
        let mut session = Session::new(catalog());
        session.toggle_topic("Statistics");
        session.begin_configuration();
        session.apply_configuration(3);

        assert!(session.begin_recording());
        session.recording_failed();
        assert_eq!(session.recording_phase(), RecordingPhase::Idle);
        assert!(session.begin_recording());
    }

    #[test]
    fn test_recording_requires_configuration() {
        let mut session = Session::new(catalog());
        assert!(!session.can_record());
        assert!(!session.begin_recording());
    }

    #[test]
    fn test_topics_vec_follows_catalog_order() {
        let mut session = Session::new(catalog());
        session.toggle_topic("Neural Networks");
        session.toggle_topic("Statistics");
        assert_eq!(
            session.topics_vec(),
            vec!["Statistics".to_string(), "Neural Networks".to_string()]
        );
    }
}
