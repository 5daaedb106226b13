//! Boundary to the external music-generation model.
//!
//! The model itself is a black box: given a prompt and a target length it
//! returns a WAV file. Two transports are supported, an HTTP inference server
//! and a local program writing the WAV to stdout.

use std::io::{self, Cursor};
use std::time::Duration;

use thiserror::Error;

use crate::config::{ModelBackend, ModelSettings};

mod command;
mod http;

pub use command::CommandModel;
pub use http::HttpModel;

/// Decoded audio returned by a model.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    /// Interleaved samples in `-1.0..=1.0`.
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn duration(&self) -> Duration {
        if self.channels == 0 || self.sample_rate == 0 {
            return Duration::ZERO;
        }
        let frames = self.samples.len() as f64 / self.channels as f64;
        Duration::from_secs_f64(frames / self.sample_rate as f64)
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("request to model server failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("model server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("model process exited with {status}: {stderr}")]
    Process { status: String, stderr: String },
    #[error("model output is not a valid WAV file: {0}")]
    Decode(#[from] hound::Error),
    #[error("model returned an empty clip")]
    EmptyClip,
}

pub trait MusicModel: Send + Sync {
    /// Generate one clip for `prompt`, roughly `duration` long. Blocks until done.
    fn generate(&self, prompt: &str, duration: Duration) -> Result<AudioClip, ModelError>;
}

/// Build the configured model backend.
pub fn from_settings(settings: &ModelSettings) -> Result<Box<dyn MusicModel>, ModelError> {
    Ok(match settings.backend {
        ModelBackend::Http => Box::new(HttpModel::new(
            &settings.endpoint,
            Duration::from_secs(settings.timeout_secs),
        )?),
        ModelBackend::Command => Box::new(CommandModel::new(&settings.program, &settings.args)),
    })
}

/// Decode a complete WAV file held in memory.
pub fn decode_wav(bytes: &[u8]) -> Result<AudioClip, ModelError> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    if samples.is_empty() {
        return Err(ModelError::EmptyClip);
    }

    Ok(AudioClip {
        samples,
        channels: spec.channels,
        sample_rate: spec.sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_bytes(spec: hound::WavSpec, write: impl FnOnce(&mut hound::WavWriter<Cursor<&mut Vec<u8>>>)) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut writer = hound::WavWriter::new(Cursor::new(&mut buf), spec).unwrap();
            write(&mut writer);
            writer.finalize().unwrap();
        }
        buf
    }

    #[test]
    fn decode_wav_reads_float_samples() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 32_000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let bytes = wav_bytes(spec, |w| {
            for s in [0.0f32, 0.5, -0.5, 1.0] {
                w.write_sample(s).unwrap();
            }
        });

        let clip = decode_wav(&bytes).unwrap();
        assert_eq!(clip.sample_rate, 32_000);
        assert_eq!(clip.channels, 1);
        assert_eq!(clip.samples, vec![0.0, 0.5, -0.5, 1.0]);
    }

    #[test]
    fn decode_wav_scales_pcm16_to_unit_range() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let bytes = wav_bytes(spec, |w| {
            for s in [i16::MIN, 0, 16_384, 0] {
                w.write_sample(s).unwrap();
            }
        });

        let clip = decode_wav(&bytes).unwrap();
        assert_eq!(clip.channels, 2);
        assert_eq!(clip.samples, vec![-1.0, 0.0, 0.5, 0.0]);
    }

    #[test]
    fn decode_wav_rejects_garbage_and_empty_clips() {
        assert!(matches!(decode_wav(b"definitely not riff"), Err(ModelError::Decode(_))));

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 32_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let bytes = wav_bytes(spec, |_| {});
        assert!(matches!(decode_wav(&bytes), Err(ModelError::EmptyClip)));
    }

    #[test]
    fn clip_duration_uses_frames() {
        let clip = AudioClip {
            samples: vec![0.0; 64_000],
            channels: 2,
            sample_rate: 32_000,
        };
        assert_eq!(clip.duration(), Duration::from_secs(1));
    }
}
