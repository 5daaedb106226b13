use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_cadenza_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", "/tmp/cadenza-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/cadenza-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("cadenza")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("cadenza")
            .join("config.toml")
    );
}

#[test]
fn defaults_point_at_local_files() {
    let s = Settings::default();
    assert_eq!(s.paths.track_dir, std::path::PathBuf::from("tracks"));
    assert_eq!(s.paths.prompts_file, std::path::PathBuf::from("prompts.txt"));
    assert_eq!(s.paths.tracks_file, std::path::PathBuf::from("tracks.txt"));
    assert_eq!(s.model.duration_secs, 15);
    assert_eq!(s.audio.volume, 50);
    assert_eq!(s.translation.source_lang, "ru");
    assert_eq!(s.translation.target_lang, "en");
    assert_eq!(s.ui.tag_sets.len(), 3);
    assert!(s.ui.tag_sets.iter().all(|set| set.len() == 8));
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file_and_parse_enum_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[paths]
track_dir = "/srv/music/generated"
seed_prompt = ""

[model]
backend = "command"
duration_secs = 8
wav_format = "i16"
program = "musicgen"
args = ["{prompt}"]

[translation]
enabled = false

[audio]
volume = 80
quit_fade_out_ms = 0

[controls]
scrub_seconds = 9
volume_step = 10

[ui]
header_text = "hello"
confirm_delete = false
tag_sets = [["a", "b"], ["c"]]

[log]
file = ""
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CADENZA__AUDIO__VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.paths.track_dir, std::path::PathBuf::from("/srv/music/generated"));
    assert_eq!(s.paths.seed_prompt, "");
    assert_eq!(s.model.backend, ModelBackend::Command);
    assert_eq!(s.model.duration_secs, 8);
    assert_eq!(s.model.wav_format, WavFormat::Pcm16);
    assert_eq!(s.model.program, "musicgen");
    assert_eq!(s.model.args, vec!["{prompt}".to_string()]);
    assert!(!s.translation.enabled);
    assert_eq!(s.audio.volume, 80);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.controls.volume_step, 10);
    assert_eq!(s.ui.header_text, "hello");
    assert!(!s.ui.confirm_delete);
    assert_eq!(s.ui.tag_sets, vec![vec!["a", "b"], vec!["c"]]);
    assert_eq!(s.log.file, "");
    assert_eq!(s.log.level, "debug");
    // Untouched sections keep their defaults.
    assert_eq!(s.paths.prompts_file, std::path::PathBuf::from("prompts.txt"));
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
volume = 20
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("CADENZA__AUDIO__VOLUME", "70");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.volume, 70);
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    s.model.duration_secs = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.volume = 101;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.ui.tag_sets = Vec::new();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.ui.tag_sets.push(Vec::new());
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.paths.track_dir = std::path::PathBuf::new();
    assert!(s.validate().is_err());
}
