//! Audio-related small types and handles.
//!
//! This module defines the commands accepted by the audio thread and the
//! playback info it publishes.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCmd {
    /// Start playing the file at the given path, replacing the current one.
    Play(PathBuf),
    /// Stop playback immediately.
    Stop,
    /// Toggle pause/resume.
    TogglePause,
    /// Seek by the specified number of seconds (positive or negative).
    SeekBy(i32),
    /// Set the output volume, 0..=100.
    SetVolume(u8),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no audio output device: {0}")]
    Device(String),
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

/// Runtime playback information shared with the UI.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    /// File currently loaded in the sink, if any.
    pub path: Option<PathBuf>,
    /// Elapsed playback time for the current file.
    pub elapsed: Duration,
    /// Whether playback is currently active.
    pub playing: bool,
    /// Last playback failure, until the UI takes it or the next `Play` succeeds.
    pub error: Option<String>,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// Map a 0..=100 volume to a rodio gain.
pub fn volume_to_gain(percent: u8) -> f32 {
    percent.min(100) as f32 / 100.0
}

/// New position after scrubbing `secs` from `elapsed`, clamped at zero.
pub fn seek_target(elapsed: Duration, secs: i32) -> Duration {
    let cur = elapsed.as_secs() as i64;
    Duration::from_secs((cur + secs as i64).max(0) as u64)
}
