//! Audio capture and playback
//!
//! Real devices live behind the `audio-io` feature; the controller only sees
//! the [`AudioCapture`] trait so it runs (and tests) without any hardware.

pub mod encode;

#[cfg(feature = "audio-io")]
pub mod input;
#[cfg(feature = "audio-io")]
pub mod output;

pub use encode::{encode_wav, WAV_MIME};

#[cfg(feature = "audio-io")]
pub use input::AudioInput;
#[cfg(feature = "audio-io")]
pub use output::{AudioOutput, PlaybackSink};

use crossbeam_channel::Sender;
#[cfg(test)]
use mockall::automock;

use crate::{Result, VivaError};

/// Microphone abstraction. Captured samples are mono f32 chunks pushed into
/// the channel handed to `start`.
#[cfg_attr(test, automock)]
pub trait AudioCapture: Send {
    fn start(&mut self, audio_tx: Sender<Vec<f32>>) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
    fn sample_rate(&self) -> u32;
    fn is_active(&self) -> bool;
}

/// Capture backend used when no microphone is available (or the `audio-io`
/// feature is off). Starting it reports the microphone as unavailable, which
/// surfaces to the user as a recoverable error.
pub struct NullCapture;

impl AudioCapture for NullCapture {
    fn start(&mut self, _audio_tx: Sender<Vec<f32>>) -> Result<()> {
        Err(VivaError::MicrophoneUnavailable(
            "no capture backend configured".to_string(),
        ))
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    fn sample_rate(&self) -> u32 {
        16_000
    }

    fn is_active(&self) -> bool {
        false
    }
}

/// Linear resampling between sample rates. Good enough for speech; the
/// transcription service does its own preprocessing anyway.
pub fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = ((samples.len() as f64) / ratio).floor() as usize;
    let mut out = Vec::with_capacity(out_len);

    for i in 0..out_len {
        let pos = i as f64 * ratio;
        let idx = pos as usize;
        let frac = (pos - idx as f64) as f32;
        let a = samples[idx];
        let b = samples.get(idx + 1).copied().unwrap_or(a);
        out.push(a + (b - a) * frac);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn test_null_capture_reports_unavailable() {
        let mut capture = NullCapture;
        let (tx, _rx) = bounded(4);
        let err = capture.start(tx).unwrap_err();
        assert!(matches!(err, VivaError::MicrophoneUnavailable(_)));
        assert!(!capture.is_active());
        assert!(capture.stop().is_ok());
    }

    #[test]
    fn test_resample_identity() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(resample_linear(&samples, 16_000, 16_000), samples);
    }

    #[test]
    fn test_resample_downsamples_length() {
        let samples: Vec<f32> = (0..480).map(|i| (i as f32 / 480.0).sin()).collect();
        let out = resample_linear(&samples, 48_000, 16_000);
        assert_eq!(out.len(), 160);
    }

    #[test]
    fn test_resample_upsample_interpolates() {
        let samples = vec![0.0, 1.0];
        let out = resample_linear(&samples, 8_000, 16_000);
        assert_eq!(out.len(), 4);
        assert!((out[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_resample_empty() {
        assert!(resample_linear(&[], 48_000, 16_000).is_empty());
    }
}
