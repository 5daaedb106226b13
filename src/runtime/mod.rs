use std::env;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, AppOptions};
use crate::audio::AudioPlayer;
use crate::generate::{JobEvent, JobOptions, Worker};
use crate::store::{PromptStore, TrackStore};
use crate::{model, translate};

mod event_loop;
mod logging;
mod settings;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = settings::load_settings();

    if let Some(dir) = env::args().nth(1) {
        settings.paths.track_dir = PathBuf::from(dir);
    }

    logging::init(&settings.log);
    log::info!(
        "starting: tracks in {}, {:?} backend",
        settings.paths.track_dir.display(),
        settings.model.backend
    );

    let seed = Some(settings.paths.seed_prompt.trim()).filter(|s| !s.is_empty());
    let prompt_store = PromptStore::load(&settings.paths.prompts_file, seed)?;
    let track_store = TrackStore::load(&settings.paths.tracks_file, &settings.paths.track_dir)?;

    let music_model: Arc<dyn model::MusicModel> = Arc::from(model::from_settings(&settings.model)?);
    let translator: Arc<dyn translate::Translator> =
        Arc::from(translate::from_settings(&settings.translation)?);

    let (job_tx, job_rx) = mpsc::channel::<JobEvent>();
    let worker = Worker::new(
        music_model,
        translator,
        JobOptions {
            duration: Duration::from_secs(settings.model.duration_secs),
            wav_format: settings.model.wav_format,
        },
        job_tx,
    );

    let audio_player = AudioPlayer::new(settings.audio.volume);
    let mut app = App::new(
        AppOptions {
            track_dir: settings.paths.track_dir.clone(),
            tag_sets: settings.ui.tag_sets.clone(),
            volume: settings.audio.volume,
            confirm_delete: settings.ui.confirm_delete,
        },
        track_store,
        prompt_store,
        worker,
    );
    app.set_playback_handle(audio_player.playback_handle());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &audio_player, &job_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if app.is_generating() {
        log::info!("quitting with a generation still running; its result is dropped");
    }
    log::info!("exiting");
    run_result
}
