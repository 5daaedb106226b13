use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Effect, InputMode, Intent, PlaybackState, StatusKind};
use crate::audio::AudioPlayer;
use crate::config;
use crate::generate::JobEvent;
use crate::ui;

/// Main terminal event loop: applies finished jobs, syncs playback, draws
/// and handles input. Returns `Ok(())` when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    job_rx: &Receiver<JobEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(ev) = job_rx.try_recv() {
            app.on_job_event(ev);
        }

        sync_playback(app);

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let Some(intent) = intent_for(app.mode, key, &settings.controls) else {
                    continue;
                };
                match app.dispatch(intent) {
                    Effect::None => {}
                    Effect::Audio(cmd) => {
                        if audio_player.send(cmd).is_err() {
                            app.set_status(StatusKind::Error, "Audio output is not available.");
                        }
                    }
                    Effect::Quit => {
                        audio_player
                            .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Mirror the audio thread's state into `app` and surface playback errors.
fn sync_playback(app: &mut App) {
    // Clone the Arc handle to avoid borrowing `app` immutably across mutations.
    let Some(handle) = app.playback_handle.as_ref().cloned() else {
        return;
    };
    let Ok(mut info) = handle.lock() else {
        return;
    };
    let error = info.error.take();
    let state = match (&info.path, info.playing) {
        (None, _) => PlaybackState::Stopped,
        (Some(_), true) => PlaybackState::Playing,
        (Some(_), false) => PlaybackState::Paused,
    };
    drop(info);

    app.playback = state;
    if let Some(e) = error {
        app.set_status(StatusKind::Error, e);
    }
}

/// Map a key press to an intent for the current input mode.
pub fn intent_for(
    mode: InputMode,
    key: KeyEvent,
    controls: &config::ControlsSettings,
) -> Option<Intent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Intent::Quit),
            KeyCode::Char('u') if mode == InputMode::Editing => Some(Intent::ClearInput),
            _ => None,
        };
    }

    match mode {
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(Intent::StopEditing),
            KeyCode::Enter => Some(Intent::Generate),
            KeyCode::Backspace => Some(Intent::InputBackspace),
            KeyCode::Char(c) => Some(Intent::InputChar(c)),
            _ => None,
        },
        InputMode::ConfirmDelete => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(Intent::ConfirmDelete),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Intent::CancelDelete),
            _ => None,
        },
        InputMode::Normal => {
            let scrub = controls.scrub_seconds.min(i32::MAX as u64) as i32;
            let step = i16::from(controls.volume_step);
            match key.code {
                KeyCode::Char('q') => Some(Intent::Quit),
                KeyCode::Char('i') | KeyCode::Char('/') => Some(Intent::EditPrompt),
                KeyCode::Char('g') => Some(Intent::Generate),
                KeyCode::Char('c') => Some(Intent::ClearInput),
                KeyCode::Char('r') => Some(Intent::RandomPrompt),
                KeyCode::Char('t') => Some(Intent::CycleTags),
                KeyCode::Char(c @ '1'..='9') => Some(Intent::AddTag(c as usize - '1' as usize)),
                KeyCode::Tab => Some(Intent::ToggleFocus),
                KeyCode::Char('j') | KeyCode::Down => Some(Intent::SelectNext),
                KeyCode::Char('k') | KeyCode::Up => Some(Intent::SelectPrev),
                KeyCode::Enter => Some(Intent::Activate),
                KeyCode::Char(' ') | KeyCode::Char('p') => Some(Intent::PlayPause),
                KeyCode::Char('l') => Some(Intent::NextTrack),
                KeyCode::Char('h') => Some(Intent::PrevTrack),
                KeyCode::Char('L') => Some(Intent::SeekBy(scrub)),
                KeyCode::Char('H') => Some(Intent::SeekBy(-scrub)),
                KeyCode::Char('+') | KeyCode::Char('=') => Some(Intent::VolumeBy(step)),
                KeyCode::Char('-') => Some(Intent::VolumeBy(-step)),
                KeyCode::Char('d') | KeyCode::Delete => Some(Intent::RequestDelete),
                _ => None,
            }
        }
    }
}
