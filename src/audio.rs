//! Playback engine: a dedicated thread owning the rodio output stream.
//!
//! The UI talks to it with `AudioCmd` messages and reads `PlaybackInfo`
//! through a shared handle.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::*;

#[cfg(test)]
mod tests;
