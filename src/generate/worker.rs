use std::fs;
use std::time::Instant;

use crate::library::next_track_name;
use crate::model::MusicModel;
use crate::translate::Translator;

use super::{Finished, GenerateError, GenerationJob, JobOptions, write_clip};

/// Run one job to completion on the calling thread.
///
/// Nothing is written to the track directory unless the model produced a clip.
/// Elapsed time is wall-clock from the start of translation to the rename of
/// the finished file.
pub fn run_job(
    job: &GenerationJob,
    model: &dyn MusicModel,
    translator: &dyn Translator,
    options: &JobOptions,
) -> Result<Finished, GenerateError> {
    let started = Instant::now();
    log::info!("job {}: generating \"{}\"", job.id, job.prompt);

    let translated = translator.translate(&job.prompt)?;
    if translated != job.prompt {
        log::debug!("job {}: translated to \"{translated}\"", job.id);
    }

    let clip = model.generate(&translated, options.duration)?;
    log::debug!(
        "job {}: got {:.1}s of audio at {} Hz",
        job.id,
        clip.duration().as_secs_f64(),
        clip.sample_rate
    );

    let io_err = |source| GenerateError::Write {
        path: job.track_dir.clone(),
        source,
    };
    fs::create_dir_all(&job.track_dir).map_err(io_err)?;
    let filename = next_track_name(&job.track_dir).map_err(io_err)?;

    write_clip(&job.track_dir.join(&filename), &clip, options.wav_format)?;

    Ok(Finished {
        filename,
        elapsed: started.elapsed(),
    })
}
