//! Flat-file persistence for prompts and generated tracks.
//!
//! Both stores are newline-delimited UTF-8 files. They are owned and written by
//! the UI thread only; there is no file locking, so two processes sharing the
//! same files can interleave or lose lines.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

mod lines;
mod prompts;
mod tracks;

pub use prompts::PromptStore;
pub use tracks::TrackStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("refusing to store an empty entry")]
    EmptyEntry,
}

#[cfg(test)]
mod tests;
