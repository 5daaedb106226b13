//! Application model: the session controller behind the terminal UI.
//!
//! `App` owns the two stores, the generation worker and everything the UI
//! shows. It is constructed once in the runtime and passed around by
//! reference.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::audio::PlaybackHandle;
use crate::generate::{GenerationJob, JobEvent, SubmitError, Worker};
use crate::library::{self, Track};
use crate::store::{PromptStore, TrackStore};

/// The playback state of the application.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// State of the generate trigger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenState {
    Idle,
    Generating {
        job_id: u64,
        prompt: String,
        started: Instant,
    },
}

/// Which list receives navigation keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    Tracks,
    Prompts,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Keystrokes go into the prompt field.
    Editing,
    /// Waiting for a yes/no on deleting `tracks[selected_track]`.
    ConfirmDelete,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Hint,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
}

/// Where tracks and prompts live, plus the UI defaults `App` starts from.
pub struct AppOptions {
    pub track_dir: PathBuf,
    pub tag_sets: Vec<Vec<String>>,
    pub volume: u8,
    pub confirm_delete: bool,
}

/// The main application model.
pub struct App {
    pub tracks: Vec<Track>,
    pub prompts: Vec<String>,
    pub selected_track: usize,
    pub selected_prompt: usize,
    pub focus: Focus,
    pub mode: InputMode,

    /// Prompt field contents. Never cleared by generation.
    pub input: String,
    pub generation: GenState,
    pub status: Option<StatusLine>,

    pub playback: PlaybackState,
    pub playback_handle: Option<PlaybackHandle>,
    pub volume: u8,

    pub tag_sets: Vec<Vec<String>>,
    pub tag_set: usize,
    pub confirm_delete: bool,

    track_dir: PathBuf,
    track_store: TrackStore,
    prompt_store: PromptStore,
    worker: Worker,
    next_job_id: u64,
}

impl App {
    /// Create a new `App` over already-loaded stores.
    pub fn new(
        options: AppOptions,
        track_store: TrackStore,
        prompt_store: PromptStore,
        worker: Worker,
    ) -> Self {
        let tracks = track_store
            .names()
            .iter()
            .map(|name| library::probe(&options.track_dir, name))
            .collect();
        let prompts = prompt_store.prompts().to_vec();

        Self {
            tracks,
            prompts,
            selected_track: 0,
            selected_prompt: 0,
            focus: Focus::Tracks,
            mode: InputMode::Normal,

            input: String::new(),
            generation: GenState::Idle,
            status: None,

            playback: PlaybackState::Stopped,
            playback_handle: None,
            volume: options.volume.min(100),

            tag_sets: options.tag_sets,
            tag_set: 0,
            confirm_delete: options.confirm_delete,

            track_dir: options.track_dir,
            track_store,
            prompt_store,
            worker,
            next_job_id: 1,
        }
    }

    /// Attach a `PlaybackHandle` used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    pub fn track_dir(&self) -> &std::path::Path {
        &self.track_dir
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.generation, GenState::Generating { .. })
    }

    /// Time spent on the in-flight job, if any.
    pub fn generating_for(&self) -> Option<Duration> {
        match &self.generation {
            GenState::Generating { started, .. } => Some(started.elapsed()),
            GenState::Idle => None,
        }
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusLine {
            kind,
            text: text.into(),
        });
    }

    /// Start generating a track for the current prompt.
    ///
    /// `Idle -> Generating` only; an empty prompt or a job already in flight
    /// is rejected and leaves the state untouched.
    pub fn submit(&mut self) -> Result<u64, SubmitError> {
        let prompt = self.input.trim().to_string();
        if prompt.is_empty() {
            self.set_status(StatusKind::Hint, "Type a prompt first (press i to edit).");
            return Err(SubmitError::EmptyPrompt);
        }
        if self.is_generating() || self.worker.is_busy() {
            self.set_status(StatusKind::Hint, "Still generating the previous track.");
            return Err(SubmitError::Busy);
        }

        let job_id = self.next_job_id;
        let job = GenerationJob {
            id: job_id,
            prompt: prompt.clone(),
            track_dir: self.track_dir.clone(),
        };
        if let Err(e) = self.worker.spawn(job) {
            self.set_status(StatusKind::Hint, e.to_string());
            return Err(e);
        }

        self.next_job_id += 1;
        self.generation = GenState::Generating {
            job_id,
            prompt,
            started: Instant::now(),
        };
        self.set_status(StatusKind::Info, "Generating…");
        Ok(job_id)
    }

    /// Apply a worker's completion message. Always ends in `Idle` for the
    /// in-flight job; events for any other job id are ignored.
    pub fn on_job_event(&mut self, event: JobEvent) {
        let in_flight = match &self.generation {
            GenState::Generating { job_id, .. } => *job_id,
            GenState::Idle => {
                log::warn!("ignoring result of job {} while idle", event.job_id);
                return;
            }
        };
        if event.job_id != in_flight {
            log::warn!("ignoring result of stale job {}", event.job_id);
            return;
        }
        self.generation = GenState::Idle;

        let done = match event.outcome {
            Ok(done) => done,
            Err(e) => {
                self.set_status(StatusKind::Error, e.to_string());
                return;
            }
        };

        let mut problems: Vec<String> = Vec::new();
        if let Err(e) = self.track_store.append(&done.filename) {
            log::warn!("could not record {}: {e}", done.filename);
            problems.push(e.to_string());
        }
        if !self.tracks.iter().any(|t| t.name == done.filename) {
            self.tracks.push(library::probe(&self.track_dir, &done.filename));
        }

        match self.prompt_store.insert(&event.prompt) {
            Ok(true) => self.prompts = self.prompt_store.prompts().to_vec(),
            Ok(false) => {}
            Err(e) => {
                log::warn!("could not record prompt: {e}");
                problems.push(e.to_string());
            }
        }

        if problems.is_empty() {
            self.set_status(
                StatusKind::Info,
                format!(
                    "Generated {} in {:.2}s",
                    done.filename,
                    done.elapsed.as_secs_f64()
                ),
            );
        } else {
            self.set_status(
                StatusKind::Error,
                format!("Generated {}, but {}", done.filename, problems.join("; ")),
            );
        }
    }

    /// Ask before deleting the selected track, or delete straight away when
    /// confirmation is turned off. Returns the deleted path in that case.
    pub fn request_delete(&mut self) -> Option<PathBuf> {
        if self.tracks.is_empty() {
            return None;
        }
        if self.confirm_delete {
            self.mode = InputMode::ConfirmDelete;
            None
        } else {
            self.delete_selected()
        }
    }

    pub fn cancel_delete(&mut self) {
        if self.mode == InputMode::ConfirmDelete {
            self.mode = InputMode::Normal;
        }
    }

    /// Remove the selected track's file, store line and list entry.
    ///
    /// A file that is already gone is not an error. Returns the path that was
    /// removed so the caller can stop playback of it.
    pub fn delete_selected(&mut self) -> Option<PathBuf> {
        self.mode = InputMode::Normal;
        let track = self.tracks.get(self.selected_track)?.clone();

        match fs::remove_file(&track.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("{} was already gone", track.path.display());
            }
            Err(e) => {
                self.set_status(
                    StatusKind::Error,
                    format!("Could not delete {}: {e}", track.name),
                );
                return None;
            }
        }

        self.tracks.remove(self.selected_track);
        if self.selected_track >= self.tracks.len() {
            self.selected_track = self.tracks.len().saturating_sub(1);
        }

        match self.track_store.remove(&track.name) {
            Ok(_) => self.set_status(StatusKind::Info, format!("Deleted {}", track.name)),
            Err(e) => self.set_status(
                StatusKind::Error,
                format!("Deleted {}, but the track list was not updated: {e}", track.name),
            ),
        }
        Some(track.path)
    }

    pub fn selected_track_path(&self) -> Option<PathBuf> {
        self.tracks.get(self.selected_track).map(|t| t.path.clone())
    }

    /// Index of the track currently loaded in the player, if it is in the list.
    pub fn now_playing_index(&self) -> Option<usize> {
        let handle = self.playback_handle.as_ref()?;
        let path = handle.lock().ok()?.path.clone()?;
        self.tracks.iter().position(|t| t.path == path)
    }

    /// Copy the selected stored prompt into the prompt field.
    pub fn use_selected_prompt(&mut self) {
        if let Some(p) = self.prompts.get(self.selected_prompt) {
            self.input = p.clone();
        }
    }

    /// Replace the prompt field with a random stored prompt.
    pub fn random_prompt(&mut self) {
        if self.prompts.is_empty() {
            return;
        }
        let i = rand::random_range(0..self.prompts.len());
        self.selected_prompt = i;
        self.input = self.prompts[i].clone();
    }

    /// Append `tag` to the prompt, comma-separated.
    pub fn add_tag(&mut self, tag: &str) {
        if !self.input.is_empty() && !self.input.ends_with(',') {
            self.input.push_str(", ");
        }
        self.input.push_str(tag);
    }

    /// Append the `n`th tag (0-based) of the current tag set.
    pub fn add_tag_at(&mut self, n: usize) {
        let tag = self
            .tag_sets
            .get(self.tag_set)
            .and_then(|set| set.get(n))
            .cloned();
        if let Some(tag) = tag {
            self.add_tag(&tag);
        }
    }

    pub fn current_tags(&self) -> &[String] {
        self.tag_sets
            .get(self.tag_set)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn cycle_tag_set(&mut self) {
        if !self.tag_sets.is_empty() {
            self.tag_set = (self.tag_set + 1) % self.tag_sets.len();
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Tracks => Focus::Prompts,
            Focus::Prompts => Focus::Tracks,
        };
    }

    /// Move selection down in the focused list.
    pub fn next(&mut self) {
        match self.focus {
            Focus::Tracks => {
                if self.selected_track + 1 < self.tracks.len() {
                    self.selected_track += 1;
                }
            }
            Focus::Prompts => {
                if self.selected_prompt + 1 < self.prompts.len() {
                    self.selected_prompt += 1;
                }
            }
        }
    }

    /// Move selection up in the focused list.
    pub fn prev(&mut self) {
        match self.focus {
            Focus::Tracks => self.selected_track = self.selected_track.saturating_sub(1),
            Focus::Prompts => self.selected_prompt = self.selected_prompt.saturating_sub(1),
        }
    }

    pub fn change_volume(&mut self, delta: i16) -> u8 {
        self.volume = (self.volume as i16 + delta).clamp(0, 100) as u8;
        self.volume
    }
}
