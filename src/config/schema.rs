use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cadenza/config.toml` or `~/.config/cadenza/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CADENZA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub paths: PathSettings,
    pub model: ModelSettings,
    pub translation: TranslationSettings,
    pub audio: AudioSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Directory holding the generated `track_<N>.wav` files. Created if absent.
    pub track_dir: PathBuf,
    /// Newline-delimited list of prompts used so far.
    pub prompts_file: PathBuf,
    /// Newline-delimited list of generated track filenames.
    pub tracks_file: PathBuf,
    /// Prompt written into a freshly created prompts file.
    /// Set to an empty string to start with an empty list.
    pub seed_prompt: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            track_dir: PathBuf::from("tracks"),
            prompts_file: PathBuf::from("prompts.txt"),
            tracks_file: PathBuf::from("tracks.txt"),
            seed_prompt: "dark synthwave beat in the style of Mr Kitty".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelBackend {
    /// POST the prompt to an inference server that answers with a WAV body.
    Http,
    /// Run a local program that prints a WAV file to stdout.
    Command,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WavFormat {
    #[serde(alias = "f32", alias = "float")]
    Float32,
    #[serde(alias = "i16", alias = "pcm-16", alias = "pcm_16")]
    Pcm16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub backend: ModelBackend,
    /// Target clip length requested from the model (seconds).
    pub duration_secs: u64,
    /// Sample encoding used when writing tracks to disk.
    pub wav_format: WavFormat,

    /// `http` backend: generation endpoint.
    pub endpoint: String,
    /// `http` backend: request timeout (seconds). Generation can be slow on CPU.
    pub timeout_secs: u64,

    /// `command` backend: program to run.
    pub program: String,
    /// `command` backend: arguments; `{prompt}` and `{duration}` are substituted.
    pub args: Vec<String>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            backend: ModelBackend::Http,
            duration_secs: 15,
            wav_format: WavFormat::Float32,
            endpoint: "http://127.0.0.1:8000/generate".to_string(),
            timeout_secs: 900,
            program: "python3".to_string(),
            args: vec![
                "musicgen_cli.py".to_string(),
                "--model".to_string(),
                "facebook/musicgen-medium".to_string(),
                "--duration".to_string(),
                "{duration}".to_string(),
                "--prompt".to_string(),
                "{prompt}".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    /// Translate prompts before handing them to the model.
    pub enabled: bool,
    /// Language the prompts are typed in.
    pub source_lang: String,
    /// Language the model expects.
    pub target_lang: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            source_lang: "ru".to_string(),
            target_lang: "en".to_string(),
            endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Initial playback volume, 0..=100.
    pub volume: u8,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 50,
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Volume change per `+` / `-` press.
    pub volume_step: u8,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Ask before deleting a track.
    pub confirm_delete: bool,
    /// Quick tags appended to the prompt with the number keys. `t` cycles sets.
    pub tag_sets: Vec<Vec<String>>,
}

impl Default for UiSettings {
    fn default() -> Self {
        let set = |tags: &[&str]| tags.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        Self {
            header_text: " ~ Describe it, and cadenza plays it ~ ".to_string(),
            confirm_delete: true,
            tag_sets: vec![
                set(&["piano", "violin", "bass", "drums", "slow", "fast", "happy", "sad"]),
                set(&["epic", "cinematic", "ambient", "dark", "synthwave", "retro", "lofi", "trap"]),
                set(&[
                    "energetic",
                    "melancholic",
                    "classical",
                    "jazz",
                    "funk",
                    "dreamy",
                    "spacey",
                    "industrial",
                ]),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log file path. The terminal is owned by the UI, so logs never go to stderr.
    /// Empty disables logging.
    pub file: String,
    /// `env_logger` filter, e.g. `info` or `cadenza=debug`.
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: "cadenza.log".to_string(),
            level: "info".to_string(),
        }
    }
}
