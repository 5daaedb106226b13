use std::fs;
use std::path::{Path, PathBuf};

use crate::config::WavFormat;
use crate::model::AudioClip;

use super::GenerateError;

/// Write `clip` to `path` as a WAV file at the clip's own sample rate.
///
/// The data goes to a hidden `.<name>.part` sibling first and is renamed into
/// place once complete; on failure the partial file is removed and `path` is
/// never created.
pub fn write_clip(path: &Path, clip: &AudioClip, format: WavFormat) -> Result<(), GenerateError> {
    let part = part_path(path);

    let encoded = encode(&part, clip, format);
    if let Err(e) = encoded {
        let _ = fs::remove_file(&part);
        return Err(e);
    }

    fs::rename(&part, path).map_err(|source| {
        let _ = fs::remove_file(&part);
        GenerateError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn encode(part: &Path, clip: &AudioClip, format: WavFormat) -> Result<(), GenerateError> {
    let spec = match format {
        WavFormat::Float32 => hound::WavSpec {
            channels: clip.channels,
            sample_rate: clip.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        },
        WavFormat::Pcm16 => hound::WavSpec {
            channels: clip.channels,
            sample_rate: clip.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        },
    };

    let encode_err = |source: hound::Error| match source {
        hound::Error::IoError(source) => GenerateError::Write {
            path: part.to_path_buf(),
            source,
        },
        source => GenerateError::Encode {
            path: part.to_path_buf(),
            source,
        },
    };

    let mut writer = hound::WavWriter::create(part, spec).map_err(encode_err)?;
    match format {
        WavFormat::Float32 => {
            for &sample in &clip.samples {
                writer.write_sample(sample).map_err(encode_err)?;
            }
        }
        WavFormat::Pcm16 => {
            for &sample in &clip.samples {
                let scaled = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                writer.write_sample(scaled).map_err(encode_err)?;
            }
        }
    }
    writer.finalize().map_err(encode_err)
}

fn part_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.part"))
}
