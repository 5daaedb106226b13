//! UI intents and their dispatch onto the `App` model.
//!
//! The runtime maps key presses to `Intent`s; `App::dispatch` applies them and
//! returns the side effect the runtime has to carry out.

use crate::audio::AudioCmd;

use super::model::{App, Focus, InputMode, PlaybackState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Quit,
    /// Focus the prompt field.
    EditPrompt,
    /// Leave the prompt field without generating.
    StopEditing,
    InputChar(char),
    InputBackspace,
    ClearInput,
    /// Generate a track from the prompt field.
    Generate,
    ToggleFocus,
    SelectNext,
    SelectPrev,
    /// Play the selected track, or copy the selected prompt into the field.
    Activate,
    PlayPause,
    NextTrack,
    PrevTrack,
    SeekBy(i32),
    VolumeBy(i16),
    RequestDelete,
    ConfirmDelete,
    CancelDelete,
    RandomPrompt,
    /// Append the nth tag of the current tag set.
    AddTag(usize),
    CycleTags,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    Audio(AudioCmd),
}

impl App {
    pub fn dispatch(&mut self, intent: Intent) -> Effect {
        match intent {
            Intent::Quit => return Effect::Quit,
            Intent::EditPrompt => self.mode = InputMode::Editing,
            Intent::StopEditing => self.mode = InputMode::Normal,
            Intent::InputChar(c) => {
                if !c.is_control() {
                    self.input.push(c);
                }
            }
            Intent::InputBackspace => {
                self.input.pop();
            }
            Intent::ClearInput => self.input.clear(),
            Intent::Generate => {
                self.mode = InputMode::Normal;
                // Rejections are reported through the status line.
                let _ = self.submit();
            }
            Intent::ToggleFocus => self.toggle_focus(),
            Intent::SelectNext => self.next(),
            Intent::SelectPrev => self.prev(),
            Intent::Activate => match self.focus {
                Focus::Tracks => return self.play_selected(),
                Focus::Prompts => self.use_selected_prompt(),
            },
            Intent::PlayPause => return self.play_pause(),
            Intent::NextTrack => {
                if self.selected_track + 1 < self.tracks.len() {
                    self.selected_track += 1;
                    return self.play_selected();
                }
            }
            Intent::PrevTrack => {
                if self.selected_track > 0 && !self.tracks.is_empty() {
                    self.selected_track -= 1;
                    return self.play_selected();
                }
            }
            Intent::SeekBy(secs) => {
                if self.playback != PlaybackState::Stopped {
                    return Effect::Audio(AudioCmd::SeekBy(secs));
                }
            }
            Intent::VolumeBy(delta) => {
                let volume = self.change_volume(delta);
                return Effect::Audio(AudioCmd::SetVolume(volume));
            }
            Intent::RequestDelete => {
                if let Some(path) = self.request_delete() {
                    return self.stop_if_playing(path);
                }
            }
            Intent::ConfirmDelete => {
                if self.mode == InputMode::ConfirmDelete {
                    if let Some(path) = self.delete_selected() {
                        return self.stop_if_playing(path);
                    }
                }
            }
            Intent::CancelDelete => self.cancel_delete(),
            Intent::RandomPrompt => self.random_prompt(),
            Intent::AddTag(n) => self.add_tag_at(n),
            Intent::CycleTags => self.cycle_tag_set(),
        }
        Effect::None
    }

    fn play_selected(&mut self) -> Effect {
        match self.selected_track_path() {
            Some(path) => {
                self.playback = PlaybackState::Playing;
                Effect::Audio(AudioCmd::Play(path))
            }
            None => Effect::None,
        }
    }

    fn play_pause(&mut self) -> Effect {
        match self.playback {
            PlaybackState::Stopped => self.play_selected(),
            PlaybackState::Playing => {
                self.playback = PlaybackState::Paused;
                Effect::Audio(AudioCmd::TogglePause)
            }
            PlaybackState::Paused => {
                self.playback = PlaybackState::Playing;
                Effect::Audio(AudioCmd::TogglePause)
            }
        }
    }

    fn stop_if_playing(&mut self, deleted: std::path::PathBuf) -> Effect {
        let playing = self
            .playback_handle
            .as_ref()
            .and_then(|h| h.lock().ok().and_then(|info| info.path.clone()));
        if playing.as_deref() == Some(deleted.as_path()) {
            self.playback = PlaybackState::Stopped;
            Effect::Audio(AudioCmd::Stop)
        } else {
            Effect::None
        }
    }
}
