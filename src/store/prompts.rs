use std::path::PathBuf;

use super::StoreError;
use super::lines::{LineLog, sanitize_line};

/// Distinct prompts in the order they were first used.
pub struct PromptStore {
    log: LineLog,
    prompts: Vec<String>,
}

impl PromptStore {
    /// Open the prompts file, creating it (with `seed` as the first prompt) if absent.
    ///
    /// Duplicate lines already on disk are shown once.
    pub fn load(path: impl Into<PathBuf>, seed: Option<&str>) -> Result<Self, StoreError> {
        let log = LineLog::new(path);
        if log.ensure_exists(seed)? {
            log::info!("created prompts file {}", log.path().display());
        }

        let mut prompts: Vec<String> = Vec::new();
        for line in log.read_lines()? {
            if !prompts.contains(&line) {
                prompts.push(line);
            }
        }

        Ok(Self { log, prompts })
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn contains(&self, prompt: &str) -> bool {
        self.prompts.iter().any(|p| p == prompt)
    }

    /// Record `prompt` unless an identical one is already stored.
    ///
    /// Returns `Ok(true)` when the prompt was new and has been appended.
    pub fn insert(&mut self, prompt: &str) -> Result<bool, StoreError> {
        let prompt = sanitize_line(prompt);
        if prompt.is_empty() {
            return Err(StoreError::EmptyEntry);
        }
        if self.contains(&prompt) {
            return Ok(false);
        }

        self.log.append(&prompt)?;
        self.prompts.push(prompt);
        Ok(true)
    }
}
