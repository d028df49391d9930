use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use viva::audio::{AudioCapture, NullCapture};
use viva::config::AppConfig;
use viva::service::HttpInterviewService;
use viva::session::SessionController;
use viva::ui::VivaApp;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "viva=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Viva mock interviewer");

    let config = AppConfig::from_env();
    config.validate()?;

    let service = Arc::new(HttpInterviewService::new(
        &config.service_url,
        config.request_timeout,
    )?);

    let capture = build_capture(&config);
    let (speech_tx, _audio_output, _speech_worker) = build_speech(&config);

    let (handle, _controller_worker) =
        SessionController::spawn(config.clone(), service, capture, speech_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([600.0, 480.0])
            .with_title("Viva"),
        ..Default::default()
    };

    let app_config = config.clone();
    eframe::run_native(
        "Viva",
        options,
        Box::new(move |cc| Ok(Box::new(VivaApp::new(cc, handle, app_config)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {}", e))?;

    Ok(())
}

fn build_capture(config: &AppConfig) -> Box<dyn AudioCapture> {
    if !config.enable_audio_input {
        return Box::new(NullCapture);
    }

    #[cfg(feature = "audio-io")]
    {
        match viva::audio::AudioInput::new() {
            Ok(input) => return Box::new(input),
            Err(e) => warn!("Microphone unavailable: {}", e),
        }
    }

    Box::new(NullCapture)
}

type SpeechParts = (
    Option<crossbeam_channel::Sender<viva::speech::SpeechCommand>>,
    Option<Box<dyn std::any::Any>>,
    Option<std::thread::JoinHandle<()>>,
);

/// Wire up spoken question playback when a speech service is configured.
/// Returns the command sender plus the output device and worker handle, which
/// must stay alive for the lifetime of the app.
fn build_speech(config: &AppConfig) -> SpeechParts {
    let Some(speech_url) = &config.speech_url else {
        return (None, None, None);
    };
    if !config.enable_audio_output {
        return (None, None, None);
    }

    #[cfg(feature = "audio-io")]
    {
        use viva::speech::{HttpSynthesizer, SpeechPipeline};

        let synthesizer = match HttpSynthesizer::new(speech_url, config.request_timeout) {
            Ok(s) => s,
            Err(e) => {
                warn!("Speech synthesis disabled: {}", e);
                return (None, None, None);
            }
        };

        let mut output = match viva::audio::AudioOutput::new() {
            Ok(o) => o,
            Err(e) => {
                warn!("Speech playback disabled: {}", e);
                return (None, None, None);
            }
        };
        if let Err(e) = output.start_playback() {
            warn!("Speech playback disabled: {}", e);
            return (None, None, None);
        }

        let sink = output.sink();
        let pipeline = SpeechPipeline::new();
        let speech_tx = pipeline.command_sender();
        let worker = pipeline.start_worker(Box::new(synthesizer), Box::new(sink));

        info!("Spoken questions enabled via {}", speech_url);
        return (Some(speech_tx), Some(Box::new(output)), Some(worker));
    }

    #[cfg(not(feature = "audio-io"))]
    {
        warn!(
            "Speech service {} configured but audio output is unavailable",
            speech_url
        );
        (None, None, None)
    }
}
