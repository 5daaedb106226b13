//! Background generation worker.
//!
//! A job runs on its own thread: translate the prompt, ask the model for a
//! clip, write it into the track directory, and report back with a single
//! `JobEvent` on an mpsc channel. The UI thread never waits on any of this.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;

use crate::config::WavFormat;
use crate::model::{ModelError, MusicModel};
use crate::translate::{TranslateError, Translator};

mod wav;
mod worker;

pub use wav::write_clip;
pub use worker::run_job;

/// One request/response cycle against the model.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub id: u64,
    /// The prompt as the user typed it, before translation.
    pub prompt: String,
    pub track_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Finished {
    pub filename: String,
    pub elapsed: Duration,
}

/// Completion message for a job, sent exactly once per job.
#[derive(Debug)]
pub struct JobEvent {
    pub job_id: u64,
    pub prompt: String,
    pub outcome: Result<Finished, GenerateError>,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("translation failed: {0}")]
    Translate(#[from] TranslateError),
    #[error("generation failed: {0}")]
    Model(#[from] ModelError),
    #[error("generator crashed: {0}")]
    Panicked(String),
    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("type a prompt first")]
    EmptyPrompt,
    #[error("a track is already being generated")]
    Busy,
}

#[derive(Debug, Clone)]
pub struct JobOptions {
    pub duration: Duration,
    pub wav_format: WavFormat,
}

/// Spawns generation jobs, at most one at a time.
pub struct Worker {
    model: Arc<dyn MusicModel>,
    translator: Arc<dyn Translator>,
    options: JobOptions,
    events: Sender<JobEvent>,
    in_flight: Arc<AtomicBool>,
}

/// Clears the in-flight flag when the job thread finishes, even by unwinding.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Worker {
    pub fn new(
        model: Arc<dyn MusicModel>,
        translator: Arc<dyn Translator>,
        options: JobOptions,
        events: Sender<JobEvent>,
    ) -> Self {
        Self {
            model,
            translator,
            options,
            events,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Start `job` on a background thread.
    ///
    /// Fails with `SubmitError::Busy` while a previous job has not reported back.
    pub fn spawn(&self, job: GenerationJob) -> Result<JoinHandle<()>, SubmitError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SubmitError::Busy);
        }

        let guard = InFlightGuard(self.in_flight.clone());
        let model = self.model.clone();
        let translator = self.translator.clone();
        let options = self.options.clone();
        let events = self.events.clone();

        let handle = thread::spawn(move || {
            let job_id = job.id;
            let prompt = job.prompt.clone();
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                run_job(&job, model.as_ref(), translator.as_ref(), &options)
            }))
            .unwrap_or_else(|payload| Err(GenerateError::Panicked(panic_message(payload.as_ref()))));

            match &outcome {
                Ok(done) => log::info!(
                    "job {job_id}: wrote {} in {:.2}s",
                    done.filename,
                    done.elapsed.as_secs_f64()
                ),
                Err(e) => log::warn!("job {job_id}: {e}"),
            }

            // Free the slot before reporting, so the receiver can submit right away.
            drop(guard);
            let _ = events.send(JobEvent {
                job_id,
                prompt,
                outcome,
            });
        });

        Ok(handle)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
