use std::path::PathBuf;

use super::StoreError;
use super::lines::LineLog;

/// Filenames of generated tracks, mirrored against the track directory.
///
/// Lines naming files that have disappeared from the directory are skipped on
/// load; the next `remove` rewrites the file without them.
pub struct TrackStore {
    log: LineLog,
    names: Vec<String>,
}

impl TrackStore {
    pub fn load(path: impl Into<PathBuf>, track_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let log = LineLog::new(path);
        let track_dir = track_dir.into();
        if log.ensure_exists(None)? {
            log::info!("created tracks file {}", log.path().display());
        }

        let mut names: Vec<String> = Vec::new();
        let mut stale = 0usize;
        for line in log.read_lines()? {
            if names.contains(&line) {
                continue;
            }
            if track_dir.join(&line).is_file() {
                names.push(line);
            } else {
                stale += 1;
                log::debug!("skipping missing track {line}");
            }
        }
        if stale > 0 {
            log::info!(
                "{} has {stale} entries without a file in {}",
                log.path().display(),
                track_dir.display()
            );
        }

        Ok(Self { log, names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn append(&mut self, name: &str) -> Result<(), StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::EmptyEntry);
        }
        self.log.append(name)?;
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
        Ok(())
    }

    /// Forget `name` and rewrite the log from the remaining live entries.
    ///
    /// Returns `false` if the name was not known; the log is compacted either way.
    pub fn remove(&mut self, name: &str) -> Result<bool, StoreError> {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        self.log.rewrite(&self.names)?;
        Ok(self.names.len() != before)
    }
}
