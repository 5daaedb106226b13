use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use super::sink::create_sink_at;
use super::types::{AudioCmd, PlaybackError, PlaybackHandle, seek_target, volume_to_gain};

/// State owned by the audio thread.
struct Playback {
    sink: Option<Sink>,
    path: Option<PathBuf>,
    paused: bool,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
    gain: f32,
    info: PlaybackHandle,
}

impl Playback {
    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn report_error(&self, err: &PlaybackError) {
        log::warn!("{err}");
        if let Ok(mut info) = self.info.lock() {
            info.error = Some(err.to_string());
        }
    }

    fn play(&mut self, stream: &OutputStream, path: &Path) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }

        let new_sink = match create_sink_at(stream, path, Duration::ZERO) {
            Ok(s) => s,
            Err(e) => {
                self.report_error(&e);
                self.stop();
                return;
            }
        };
        new_sink.set_volume(self.gain);
        new_sink.play();

        self.sink = Some(new_sink);
        self.path = Some(path.to_path_buf());
        self.paused = false;
        self.started_at = Some(Instant::now());
        self.accumulated = Duration::ZERO;

        if let Ok(mut info) = self.info.lock() {
            info.path = Some(path.to_path_buf());
            info.elapsed = Duration::ZERO;
            info.playing = true;
            info.error = None;
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.path = None;
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        if let Ok(mut info) = self.info.lock() {
            info.path = None;
            info.elapsed = Duration::ZERO;
            info.playing = false;
        }
    }

    fn toggle_pause(&mut self) {
        let Some(ref s) = self.sink else {
            return;
        };
        if self.paused {
            s.play();
            self.started_at = Some(Instant::now());
        } else {
            s.pause();
            if let Some(st) = self.started_at.take() {
                self.accumulated += st.elapsed();
            }
        }
        self.paused = !self.paused;
        if let Ok(mut info) = self.info.lock() {
            info.playing = !self.paused;
        }
    }

    /// Scrubbing: rebuild the current sink and skip into the file.
    fn seek_by(&mut self, stream: &OutputStream, secs: i32) {
        let Some(path) = self.path.clone() else {
            return;
        };
        if self.sink.is_none() {
            return;
        }

        let new_elapsed = seek_target(self.elapsed(), secs);
        let new_sink = match create_sink_at(stream, &path, new_elapsed) {
            Ok(s) => s,
            Err(e) => {
                self.report_error(&e);
                return;
            }
        };
        if let Some(s) = self.sink.take() {
            s.stop();
        }

        new_sink.set_volume(self.gain);
        if self.paused {
            self.started_at = None;
        } else {
            new_sink.play();
            self.started_at = Some(Instant::now());
        }
        self.sink = Some(new_sink);
        self.accumulated = new_elapsed;
        if let Ok(mut info) = self.info.lock() {
            info.elapsed = new_elapsed;
        }
    }

    fn set_volume(&mut self, percent: u8) {
        self.gain = volume_to_gain(percent);
        if let Some(ref s) = self.sink {
            s.set_volume(self.gain);
        }
    }

    /// Periodic bookkeeping: publish elapsed time and notice the end of a track.
    fn tick(&mut self) {
        let finished = matches!(self.sink, Some(ref s) if !self.paused && s.empty());
        if finished {
            self.stop();
            return;
        }
        if self.sink.is_some() {
            let elapsed = self.elapsed();
            if let Ok(mut info) = self.info.lock() {
                info.elapsed = elapsed;
            }
        }
    }

    fn fade_out(&self, fade_out_ms: u64) {
        let Some(ref sink) = self.sink else {
            return;
        };
        if fade_out_ms == 0 || self.paused {
            sink.set_volume(0.0);
            return;
        }
        let steps: u64 = 20;
        let step_ms = (fade_out_ms / steps).max(1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            sink.set_volume(self.gain * (1.0 - t));
            thread::sleep(Duration::from_millis(step_ms));
        }
        sink.set_volume(0.0);
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    volume: u8,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut state = Playback {
            sink: None,
            path: None,
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
            gain: volume_to_gain(volume),
            info: playback_info,
        };

        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                state.report_error(&PlaybackError::Device(e.to_string()));
                // Keep draining commands so senders never block or error out.
                while let Ok(cmd) = rx.recv() {
                    if matches!(cmd, AudioCmd::Quit { .. }) {
                        break;
                    }
                }
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Play(path) => state.play(&stream, &path),
                    AudioCmd::Stop => state.stop(),
                    AudioCmd::TogglePause => state.toggle_pause(),
                    AudioCmd::SeekBy(secs) => state.seek_by(&stream, secs),
                    AudioCmd::SetVolume(percent) => state.set_volume(percent),
                    AudioCmd::Quit { fade_out_ms } => {
                        state.fade_out(fade_out_ms);
                        state.stop();
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => state.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
