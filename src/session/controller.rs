//! Session controller: owns the interview lifecycle
//!
//! Runs on a dedicated worker thread, receiving commands from the UI and
//! emitting events back. Remote calls run on a current-thread tokio runtime
//! and block the worker, which is what serializes the turn loop: while a
//! question request is in flight no other command can slip past it.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::RwLock;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::state::{RecordingPhase, Session, Stage};
use crate::audio::{encode_wav, AudioCapture};
use crate::config::AppConfig;
use crate::messages::{capitalize_first, Message, Transcript};
use crate::service::{EvaluationEntry, InterviewService};
use crate::speech::SpeechCommand;
use crate::{Result, VivaError};

#[derive(Debug, Clone)]
pub enum ControllerCommand {
    /// Toggle a topic on the Home stage
    ToggleTopic(String),

    /// Configure the session and fetch the opening question
    StartInterview,

    /// Start capturing a spoken answer
    BeginRecording,

    /// Stop capturing and run transcription plus the next turn
    EndRecording,

    /// Fetch the evaluation report and move to the Evaluation stage
    EnterEvaluation,

    /// Shut down the controller
    Shutdown,
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    /// The topic selection changed
    TopicsChanged,

    /// The session was configured with this many questions
    SessionConfigured { num_questions: u32 },

    /// The stage changed
    StageChanged(Stage),

    /// A question for this turn index arrived and was appended
    TurnCompleted { turn_index: u32 },

    /// Recording has started
    RecordingStarted,

    /// Recording has stopped, transcription in flight
    RecordingStopped,

    /// The evaluation report arrived
    EvaluationReady(Vec<EvaluationEntry>),

    /// A recoverable error, already phrased for the user
    Error(String),

    /// The controller has shut down
    Shutdown,
}

/// Handle for driving the controller from the UI
pub struct ControllerHandle {
    command_tx: Sender<ControllerCommand>,
    event_rx: Receiver<ControllerEvent>,
    session: Arc<RwLock<Session>>,
    transcript: Transcript,
}

impl ControllerHandle {
    pub fn send_command(&self, cmd: ControllerCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .map_err(|e| VivaError::ChannelError(format!("Failed to send command: {}", e)))
    }

    pub fn try_recv_event(&self) -> Option<ControllerEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn event_receiver(&self) -> Receiver<ControllerEvent> {
        self.event_rx.clone()
    }

    /// Snapshot of the current session state
    pub fn session(&self) -> Session {
        self.session.read().clone()
    }

    pub fn transcript(&self) -> Transcript {
        self.transcript.clone()
    }
}

/// The controller worker. Created via [`SessionController::spawn`].
pub struct SessionController {
    config: AppConfig,
    service: Arc<dyn InterviewService>,
    capture: Box<dyn AudioCapture>,
    speech_tx: Option<Sender<SpeechCommand>>,
    session: Arc<RwLock<Session>>,
    transcript: Transcript,
    command_rx: Receiver<ControllerCommand>,
    event_tx: Sender<ControllerEvent>,
    audio_tx: Sender<Vec<f32>>,
    audio_rx: Receiver<Vec<f32>>,
    samples: Vec<f32>,
}

impl SessionController {
    /// Spawn the controller worker thread and return its handle
    pub fn spawn(
        config: AppConfig,
        service: Arc<dyn InterviewService>,
        capture: Box<dyn AudioCapture>,
        speech_tx: Option<Sender<SpeechCommand>>,
    ) -> (ControllerHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = bounded(64);
        let (event_tx, event_rx) = bounded(64);
        let (audio_tx, audio_rx) = bounded(256);

        let session = Arc::new(RwLock::new(Session::new(config.topics.clone())));
        let transcript = Transcript::new();

        let handle = ControllerHandle {
            command_tx,
            event_rx,
            session: Arc::clone(&session),
            transcript: transcript.clone(),
        };

        let controller = Self {
            config,
            service,
            capture,
            speech_tx,
            session,
            transcript,
            command_rx,
            event_tx,
            audio_tx,
            audio_rx,
            samples: Vec::new(),
        };

        let join = thread::spawn(move || controller.run());
        (handle, join)
    }

    fn run(mut self) {
        info!("Session controller starting");

        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                error!("Failed to build runtime: {}", e);
                let _ = self
                    .event_tx
                    .send(ControllerEvent::Error(format!("Runtime error: {}", e)));
                let _ = self.event_tx.send(ControllerEvent::Shutdown);
                return;
            }
        };

        loop {
            let recording = self.session.read().recording_phase() == RecordingPhase::Recording;

            let cmd = if recording {
                // Keep draining captured samples while waiting for commands
                match self.command_rx.recv_timeout(Duration::from_millis(10)) {
                    Ok(cmd) => Some(cmd),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            } else {
                match self.command_rx.recv() {
                    Ok(cmd) => Some(cmd),
                    Err(_) => break,
                }
            };

            if recording {
                self.drain_captured_audio();
            }

            match cmd {
                Some(ControllerCommand::ToggleTopic(topic)) => self.handle_toggle_topic(&topic),
                Some(ControllerCommand::StartInterview) => self.handle_start_interview(&rt),
                Some(ControllerCommand::BeginRecording) => self.handle_begin_recording(),
                Some(ControllerCommand::EndRecording) => self.handle_end_recording(&rt),
                Some(ControllerCommand::EnterEvaluation) => self.handle_enter_evaluation(&rt),
                Some(ControllerCommand::Shutdown) => {
                    info!("Session controller shutting down");
                    let _ = self.capture.stop();
                    if let Some(tx) = &self.speech_tx {
                        let _ = tx.send(SpeechCommand::Shutdown);
                    }
                    let _ = self.event_tx.send(ControllerEvent::Shutdown);
                    break;
                }
                None => {}
            }
        }

        info!("Session controller stopped");
    }

    fn drain_captured_audio(&mut self) {
        while let Ok(chunk) = self.audio_rx.try_recv() {
            self.samples.extend_from_slice(&chunk);
        }
    }

    fn emit(&self, event: ControllerEvent) {
        if let Err(e) = self.event_tx.send(event) {
            warn!("Failed to emit event: {}", e);
        }
    }

    fn emit_error(&self, err: &VivaError) {
        error!("{}", err);
        self.emit(ControllerEvent::Error(err.user_message()));
    }

    fn speak(&self, text: &str) {
        if let Some(tx) = &self.speech_tx {
            let cmd = SpeechCommand::Speak {
                text: text.to_string(),
                utterance: Uuid::new_v4(),
            };
            if tx.try_send(cmd).is_err() {
                debug!("Speech queue full, skipping utterance");
            }
        }
    }

    fn handle_toggle_topic(&self, topic: &str) {
        if self.session.write().toggle_topic(topic) {
            self.emit(ControllerEvent::TopicsChanged);
        }
    }

    fn handle_start_interview(&self, rt: &tokio::runtime::Runtime) {
        if !self.session.write().begin_configuration() {
            debug!("Ignoring StartInterview: not startable");
            return;
        }

        let topics = self.session.read().topics_vec();
        let result = rt.block_on(
            self.service
                .configure_session(&self.config.role, &topics),
        );

        match result {
            Ok(plan) => {
                self.session.write().apply_configuration(plan.num_questions);
                info!(num_questions = plan.num_questions, "interview configured");
                self.emit(ControllerEvent::SessionConfigured {
                    num_questions: plan.num_questions,
                });
                self.emit(ControllerEvent::StageChanged(Stage::Chat));

                // Opening question carries no prior answer
                self.request_turn(rt, "", 0);
            }
            Err(e) => {
                self.session.write().fail_configuration();
                self.emit_error(&e);
            }
        }
    }

    fn request_turn(&self, rt: &tokio::runtime::Runtime, prior_answer: &str, turn_index: u32) {
        if !self.session.write().begin_turn_request(turn_index) {
            debug!(turn_index, "Ignoring turn request: not permitted");
            return;
        }

        let topics = self.session.read().topics_vec();
        let result = rt.block_on(
            self.service
                .next_question(prior_answer, turn_index, &topics),
        );

        match result {
            Ok(text) => {
                let text = capitalize_first(&text);
                self.transcript.push(Message::assistant(&text));
                self.session.write().complete_turn(turn_index);
                self.speak(&text);
                self.emit(ControllerEvent::TurnCompleted { turn_index });
            }
            Err(e) => {
                self.session.write().fail_turn();
                self.emit_error(&e);
            }
        }
    }

    fn handle_begin_recording(&mut self) {
        if !self.session.read().can_record() {
            debug!("Ignoring BeginRecording: not recordable");
            return;
        }

        self.samples.clear();
        match self.capture.start(self.audio_tx.clone()) {
            Ok(()) => {
                self.session.write().begin_recording();
                self.emit(ControllerEvent::RecordingStarted);
            }
            Err(e) => {
                self.session.write().recording_failed();
                self.emit_error(&e);
            }
        }
    }

    fn handle_end_recording(&mut self, rt: &tokio::runtime::Runtime) {
        if self.session.read().recording_phase() != RecordingPhase::Recording {
            debug!("Ignoring EndRecording: not recording");
            return;
        }

        if let Err(e) = self.capture.stop() {
            warn!("Failed to stop capture: {}", e);
        }
        self.drain_captured_audio();
        self.session.write().recording_stopped();
        self.emit(ControllerEvent::RecordingStopped);

        let placeholder_id = self.transcript.push(Message::transcribing_placeholder());

        let result = encode_wav(&self.samples, self.capture.sample_rate())
            .and_then(|audio| rt.block_on(self.service.transcribe(audio)));
        self.samples.clear();

        match result {
            Ok(text) => {
                self.transcript.remove(placeholder_id);
                let text = capitalize_first(&text);
                self.transcript.push(Message::user(&text));
                self.session.write().transcription_finished();

                let turn_index = self.session.read().turn_count();
                self.request_turn(rt, &text, turn_index);
            }
            Err(e) => {
                // The placeholder never outlives the request, success or not
                self.transcript.remove(placeholder_id);
                self.session.write().transcription_finished();
                self.emit_error(&e);
            }
        }
    }

    fn handle_enter_evaluation(&self, rt: &tokio::runtime::Runtime) {
        if !self.session.read().can_enter_evaluation() {
            debug!("Ignoring EnterEvaluation: not reachable");
            return;
        }

        let completed_turns = self.session.read().turn_count();
        match rt.block_on(self.service.evaluation_report(completed_turns)) {
            Ok(entries) => {
                if let Some(tx) = &self.speech_tx {
                    let _ = tx.try_send(SpeechCommand::Cancel);
                }
                self.session.write().enter_evaluation();
                self.emit(ControllerEvent::StageChanged(Stage::Evaluation));
                self.emit(ControllerEvent::EvaluationReady(entries));
            }
            // Stage stays on Chat so the user can retry
            Err(e) => self.emit_error(&e),
        }
    }
}
