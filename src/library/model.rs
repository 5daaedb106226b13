use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Filename inside the track directory, e.g. `track_3.wav`.
    pub name: String,
    pub path: PathBuf,
    /// Read from the file's audio properties; `None` if the file could not be probed.
    pub duration: Option<Duration>,
}
