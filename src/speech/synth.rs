//! Speech synthesis backends

use hound::{SampleFormat, WavReader};
use serde::Serialize;
use std::io::Cursor;
use std::time::Duration;
use tracing::debug;

use crate::{Result, VivaError};

/// Synthesized audio, mono f32
#[derive(Clone, Debug)]
pub struct SpeechClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl SpeechClip {
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Text-to-speech backend. Synchronous because it runs on the dedicated
/// speech worker thread.
pub trait Synthesizer: Send {
    fn synthesize(&self, text: &str) -> Result<SpeechClip>;
}

#[derive(Debug, Serialize)]
struct SynthesizeRequest<'a> {
    text: &'a str,
}

/// Synthesizer backed by an HTTP speech service that answers with a WAV body
pub struct HttpSynthesizer {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpSynthesizer {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VivaError::ConfigError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: format!("{}/synthesize", base_url.into().trim_end_matches('/')),
        })
    }
}

impl Synthesizer for HttpSynthesizer {
    fn synthesize(&self, text: &str) -> Result<SpeechClip> {
        if text.trim().is_empty() {
            return Ok(SpeechClip {
                samples: Vec::new(),
                sample_rate: 22_050,
            });
        }

        let response = self
            .client
            .post(&self.url)
            .json(&SynthesizeRequest { text })
            .send()
            .map_err(|e| VivaError::SpeechError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VivaError::SpeechError(format!(
                "speech service returned {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| VivaError::SpeechError(e.to_string()))?;

        let clip = decode_wav(&bytes)?;
        debug!(
            samples = clip.samples.len(),
            sample_rate = clip.sample_rate,
            "synthesized clip"
        );
        Ok(clip)
    }
}

/// Decode a WAV body into mono f32 samples
fn decode_wav(bytes: &[u8]) -> Result<SpeechClip> {
    let mut reader = WavReader::new(Cursor::new(bytes))
        .map_err(|e| VivaError::SpeechError(format!("invalid WAV response: {}", e)))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| VivaError::SpeechError(format!("corrupt WAV response: {}", e)))?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| VivaError::SpeechError(format!("corrupt WAV response: {}", e)))?
        }
    };

    // Downmix to mono if necessary
    let channels = spec.channels as usize;
    let mono = if channels == 1 {
        samples
    } else {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    Ok(SpeechClip {
        samples: mono,
        sample_rate: spec.sample_rate,
    })
}
