//! Spoken question playback
//!
//! Questions are synthesized by a remote speech service and played through an
//! [`AudioSink`]. Synthesis runs on its own worker thread so a slow service
//! never blocks the session; speaking a new question cancels whatever is
//! still playing.

pub mod synth;

pub use synth::{HttpSynthesizer, SpeechClip, Synthesizer};

use crossbeam_channel::{bounded, Receiver, Sender};
use std::thread;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Playback destination for synthesized speech. Lives here rather than in
/// the audio module so the pipeline compiles without the `audio-io` feature.
pub trait AudioSink: Send {
    fn enqueue(&self, samples: &[f32], sample_rate: u32);
    fn clear(&self);
}

#[derive(Clone, Debug)]
pub enum SpeechCommand {
    /// Synthesize and play `text`, cancelling any earlier utterance
    Speak { text: String, utterance: Uuid },
    /// Stop playback without starting anything new
    Cancel,
    Shutdown,
}

#[derive(Clone, Debug)]
pub enum SpeechEvent {
    /// Playback of an utterance has started
    Started { utterance: Uuid },
    Error { error: String, utterance: Option<Uuid> },
    Shutdown,
}

/// Channel-based speech worker, one utterance at a time
pub struct SpeechPipeline {
    command_tx: Sender<SpeechCommand>,
    command_rx: Receiver<SpeechCommand>,
    event_tx: Sender<SpeechEvent>,
    event_rx: Receiver<SpeechEvent>,
}

impl SpeechPipeline {
    pub fn new() -> Self {
        let (command_tx, command_rx) = bounded(16);
        let (event_tx, event_rx) = bounded(16);

        Self {
            command_tx,
            command_rx,
            event_tx,
            event_rx,
        }
    }

    pub fn command_sender(&self) -> Sender<SpeechCommand> {
        self.command_tx.clone()
    }

    pub fn event_receiver(&self) -> Receiver<SpeechEvent> {
        self.event_rx.clone()
    }

    /// Start the worker thread. The worker owns the synthesizer and the sink
    /// and runs until `Shutdown` or the command channel closes.
    pub fn start_worker(
        self,
        synthesizer: Box<dyn Synthesizer>,
        sink: Box<dyn AudioSink>,
    ) -> thread::JoinHandle<()> {
        let command_rx = self.command_rx.clone();
        let event_tx = self.event_tx.clone();

        thread::spawn(move || {
            info!("Speech worker starting");

            loop {
                match command_rx.recv() {
                    Ok(SpeechCommand::Speak { text, utterance }) => {
                        // A new question always pre-empts the current one
                        sink.clear();

                        let preview: String = text.chars().take(50).collect();
                        debug!("Synthesizing: {}", preview);
                        match synthesizer.synthesize(&text) {
                            Ok(clip) => {
                                if clip.samples.is_empty() {
                                    continue;
                                }
                                sink.enqueue(&clip.samples, clip.sample_rate);
                                let _ = event_tx.send(SpeechEvent::Started { utterance });
                            }
                            Err(e) => {
                                warn!("Speech synthesis failed: {}", e);
                                let _ = event_tx.send(SpeechEvent::Error {
                                    error: e.to_string(),
                                    utterance: Some(utterance),
                                });
                            }
                        }
                    }

                    Ok(SpeechCommand::Cancel) => {
                        sink.clear();
                    }

                    Ok(SpeechCommand::Shutdown) => {
                        info!("Speech worker shutting down");
                        sink.clear();
                        let _ = event_tx.send(SpeechEvent::Shutdown);
                        break;
                    }

                    Err(e) => {
                        error!("Speech command channel error: {}", e);
                        break;
                    }
                }
            }

            info!("Speech worker stopped");
        })
    }
}

impl Default for SpeechPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VivaError;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    struct FakeSynth {
        fail: bool,
    }

    impl Synthesizer for FakeSynth {
        fn synthesize(&self, text: &str) -> crate::Result<SpeechClip> {
            if self.fail {
                return Err(VivaError::SpeechError("synthesis refused".into()));
            }
            Ok(SpeechClip {
                samples: vec![0.1; text.len()],
                sample_rate: 22_050,
            })
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink {
        enqueued: Arc<Mutex<Vec<usize>>>,
        clears: Arc<Mutex<u32>>,
    }

    impl AudioSink for RecordingSink {
        fn enqueue(&self, samples: &[f32], _sample_rate: u32) {
            self.enqueued.lock().push(samples.len());
        }

        fn clear(&self) {
            *self.clears.lock() += 1;
        }
    }

    #[test]
    fn test_speak_clears_before_enqueue() {
        let pipeline = SpeechPipeline::new();
        let cmd_tx = pipeline.command_sender();
        let event_rx = pipeline.event_receiver();
        let sink = RecordingSink::default();
        let sink_view = sink.clone();

        let handle =
            pipeline.start_worker(Box::new(FakeSynth { fail: false }), Box::new(sink));

        let utterance = Uuid::new_v4();
        cmd_tx
            .send(SpeechCommand::Speak {
                text: "What is overfitting?".to_string(),
                utterance,
            })
            .unwrap();

        let event = event_rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(matches!(event, SpeechEvent::Started { utterance: u } if u == utterance));

        cmd_tx.send(SpeechCommand::Shutdown).unwrap();
        handle.join().unwrap();

        assert_eq!(sink_view.enqueued.lock().len(), 1);
        // One clear per Speak plus one at shutdown
        assert_eq!(*sink_view.clears.lock(), 2);
    }

    #[test]
    fn test_long_multibyte_text_is_spoken() {
        // A question whose 50th byte falls inside a multibyte character must
        // not kill the worker.
        let pipeline = SpeechPipeline::new();
        let cmd_tx = pipeline.command_sender();
        let event_rx = pipeline.event_receiver();
        let sink = RecordingSink::default();
        let sink_view = sink.clone();

        let handle =
            pipeline.start_worker(Box::new(FakeSynth { fail: false }), Box::new(sink));

        let text = format!("{}é and some more of the question", "x".repeat(49));
        let utterance = Uuid::new_v4();
        cmd_tx
            .send(SpeechCommand::Speak {
                text,
                utterance,
            })
            .unwrap();

        let event = event_rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(matches!(event, SpeechEvent::Started { utterance: u } if u == utterance));

        // The worker is still alive and accepts further utterances
        cmd_tx
            .send(SpeechCommand::Speak {
                text: "次の質問です。このテキストは五十バイトよりずっと長いです。".to_string(),
                utterance: Uuid::new_v4(),
            })
            .unwrap();
        let event = event_rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(matches!(event, SpeechEvent::Started { .. }));

        cmd_tx.send(SpeechCommand::Shutdown).unwrap();
        handle.join().unwrap();

        assert_eq!(sink_view.enqueued.lock().len(), 2);
    }

    #[test]
    fn test_synthesis_failure_reports_error() {
        let pipeline = SpeechPipeline::new();
        let cmd_tx = pipeline.command_sender();
        let event_rx = pipeline.event_receiver();
        let sink = RecordingSink::default();
        let sink_view = sink.clone();

        let handle = pipeline.start_worker(Box::new(FakeSynth { fail: true }), Box::new(sink));

        cmd_tx
            .send(SpeechCommand::Speak {
                text: "Hello".to_string(),
                utterance: Uuid::new_v4(),
            })
            .unwrap();

        let event = event_rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(matches!(event, SpeechEvent::Error { .. }));

        cmd_tx.send(SpeechCommand::Shutdown).unwrap();
        handle.join().unwrap();

        assert!(sink_view.enqueued.lock().is_empty());
    }

    #[test]
    fn test_cancel_clears_sink() {
        let pipeline = SpeechPipeline::new();
        let cmd_tx = pipeline.command_sender();
        let event_rx = pipeline.event_receiver();
        let sink = RecordingSink::default();
        let sink_view = sink.clone();

        let handle =
            pipeline.start_worker(Box::new(FakeSynth { fail: false }), Box::new(sink));

        cmd_tx.send(SpeechCommand::Cancel).unwrap();
        cmd_tx.send(SpeechCommand::Shutdown).unwrap();

        let event = event_rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(matches!(event, SpeechEvent::Shutdown));
        handle.join().unwrap();

        assert_eq!(*sink_view.clears.lock(), 2);
    }
}
