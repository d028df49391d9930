//! WAV encoding of captured samples for upload

use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

use crate::service::RecordedAudio;
use crate::{Result, VivaError};

pub const WAV_MIME: &str = "audio/wav";

/// Encode mono f32 samples into a 16-bit PCM WAV blob ready for upload
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<RecordedAudio> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)
            .map_err(|e| VivaError::AudioDeviceError(format!("failed to create WAV writer: {}", e)))?;
        for &sample in samples {
            let clamped = sample.clamp(-1.0, 1.0);
            writer
                .write_sample((clamped * i16::MAX as f32) as i16)
                .map_err(|e| VivaError::AudioDeviceError(format!("failed to write sample: {}", e)))?;
        }
        writer
            .finalize()
            .map_err(|e| VivaError::AudioDeviceError(format!("failed to finalize WAV: {}", e)))?;
    }

    Ok(RecordedAudio {
        bytes: cursor.into_inner(),
        mime: WAV_MIME,
        duration_secs: samples.len() as f32 / sample_rate as f32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavReader;

    #[test]
    fn test_encode_produces_readable_wav() {
        let samples: Vec<f32> = (0..1600)
            .map(|i| (i as f32 * 0.01).sin() * 0.5)
            .collect();
        let audio = encode_wav(&samples, 16_000).unwrap();

        assert_eq!(audio.mime, WAV_MIME);
        assert!((audio.duration_secs - 0.1).abs() < 1e-6);

        let reader = WavReader::new(Cursor::new(audio.bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 16_000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), 1600);
    }

    #[test]
    fn test_encode_clamps_out_of_range() {
        let audio = encode_wav(&[2.0, -2.0], 16_000).unwrap();
        let mut reader = WavReader::new(Cursor::new(audio.bytes)).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples[0], i16::MAX);
        assert_eq!(samples[1], -i16::MAX);
    }

    #[test]
    fn test_encode_empty_recording() {
        let audio = encode_wav(&[], 16_000).unwrap();
        assert_eq!(audio.duration_secs, 0.0);
        let reader = WavReader::new(Cursor::new(audio.bytes)).unwrap();
        assert_eq!(reader.len(), 0);
    }
}
