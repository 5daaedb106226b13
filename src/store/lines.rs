//! Newline-delimited text file used as an append-only log.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use super::StoreError;

pub struct LineLog {
    path: PathBuf,
}

impl LineLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file if it does not exist yet, writing `seed` as its first line.
    ///
    /// Returns `true` when the file was created.
    pub fn ensure_exists(&self, seed: Option<&str>) -> Result<bool, StoreError> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }

        let mut file = File::create(&self.path).map_err(|e| self.io_err(e))?;
        if let Some(seed) = seed.map(sanitize_line).filter(|s| !s.is_empty()) {
            writeln!(file, "{seed}").map_err(|e| self.io_err(e))?;
        }
        Ok(true)
    }

    /// Read all non-blank lines, trimmed. A missing file reads as empty.
    pub fn read_lines(&self) -> Result<Vec<String>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_err(e)),
        };

        let mut lines = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| self.io_err(e))?;
            let line = line.trim();
            if !line.is_empty() {
                lines.push(line.to_string());
            }
        }
        Ok(lines)
    }

    /// Append one line. Embedded line breaks are flattened to spaces.
    pub fn append(&self, line: &str) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        writeln!(file, "{}", sanitize_line(line)).map_err(|e| self.io_err(e))
    }

    /// Replace the whole file with `lines`.
    ///
    /// Writes a sibling temp file and renames it over the log, so a crash
    /// mid-write leaves the previous contents intact.
    pub fn rewrite(&self, lines: &[String]) -> Result<(), StoreError> {
        let tmp = self.tmp_path();
        let result = (|| {
            let mut file = File::create(&tmp)?;
            for line in lines {
                writeln!(file, "{}", sanitize_line(line))?;
            }
            file.sync_all()?;
            fs::rename(&tmp, &self.path)
        })();

        if let Err(e) = result {
            let _ = fs::remove_file(&tmp);
            return Err(self.io_err(e));
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Flatten line breaks so one record always occupies exactly one line.
pub(crate) fn sanitize_line(line: &str) -> String {
    line.replace(['\r', '\n'], " ").trim().to_string()
}
