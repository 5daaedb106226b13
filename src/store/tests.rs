use super::*;
use std::fs;
use tempfile::tempdir;

fn lines_of(path: &std::path::Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn prompt_store_seeds_a_new_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prompts.txt");

    let store = PromptStore::load(&path, Some("dark synthwave beat")).unwrap();
    assert_eq!(store.prompts(), ["dark synthwave beat".to_string()]);
    assert_eq!(lines_of(&path), vec!["dark synthwave beat"]);

    // Seeding only happens on creation.
    fs::write(&path, "").unwrap();
    let store = PromptStore::load(&path, Some("dark synthwave beat")).unwrap();
    assert!(store.prompts().is_empty());
}

#[test]
fn prompt_store_skips_blank_lines_and_duplicates_on_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prompts.txt");
    fs::write(&path, "lofi piano\n\n   \nlofi piano\n  epic drums  \n").unwrap();

    let store = PromptStore::load(&path, None).unwrap();
    assert_eq!(store.prompts(), ["lofi piano".to_string(), "epic drums".to_string()]);
}

#[test]
fn prompt_store_insert_deduplicates_exact_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prompts.txt");
    let mut store = PromptStore::load(&path, None).unwrap();

    assert!(store.insert("dark synthwave").unwrap());
    assert!(!store.insert("dark synthwave").unwrap());
    // Exact match only: case differs, so this is a new prompt.
    assert!(store.insert("Dark synthwave").unwrap());

    assert_eq!(lines_of(&path), vec!["dark synthwave", "Dark synthwave"]);

    let reloaded = PromptStore::load(&path, None).unwrap();
    assert_eq!(reloaded.prompts().len(), 2);
}

#[test]
fn prompt_store_flattens_line_breaks_and_rejects_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prompts.txt");
    let mut store = PromptStore::load(&path, None).unwrap();

    assert!(store.insert("slow\nsad piano").unwrap());
    assert_eq!(store.prompts(), ["slow sad piano".to_string()]);
    assert!(matches!(store.insert("  \n "), Err(StoreError::EmptyEntry)));
    assert_eq!(lines_of(&path), vec!["slow sad piano"]);
}

#[test]
fn track_store_load_omits_missing_files() {
    let dir = tempdir().unwrap();
    let track_dir = dir.path().join("tracks");
    fs::create_dir_all(&track_dir).unwrap();
    fs::write(track_dir.join("track_1.wav"), b"RIFF").unwrap();

    let path = dir.path().join("tracks.txt");
    fs::write(&path, "track_1.wav\ntrack_9.wav\n\n").unwrap();

    let store = TrackStore::load(&path, &track_dir).unwrap();
    assert_eq!(store.names(), ["track_1.wav".to_string()]);
    // The stale line is left alone until the log is compacted.
    assert_eq!(lines_of(&path), vec!["track_1.wav", "track_9.wav", ""]);
}

#[test]
fn track_store_creates_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("tracks.txt");

    let store = TrackStore::load(&path, dir.path()).unwrap();
    assert!(store.names().is_empty());
    assert!(path.is_file());
}

#[test]
fn track_store_append_then_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tracks.txt");
    let mut store = TrackStore::load(&path, dir.path()).unwrap();

    fs::write(dir.path().join("track_1.wav"), b"RIFF").unwrap();
    store.append("track_1.wav").unwrap();
    assert_eq!(store.names(), ["track_1.wav".to_string()]);

    let reloaded = TrackStore::load(&path, dir.path()).unwrap();
    assert_eq!(reloaded.names(), ["track_1.wav".to_string()]);
}

#[test]
fn track_store_remove_rewrites_and_compacts() {
    let dir = tempdir().unwrap();
    for name in ["track_1.wav", "track_2.wav"] {
        fs::write(dir.path().join(name), b"RIFF").unwrap();
    }
    let path = dir.path().join("tracks.txt");
    fs::write(&path, "track_1.wav\ntrack_7.wav\ntrack_2.wav\n").unwrap();

    let mut store = TrackStore::load(&path, dir.path()).unwrap();
    fs::remove_file(dir.path().join("track_1.wav")).unwrap();
    assert!(store.remove("track_1.wav").unwrap());

    assert_eq!(store.names(), ["track_2.wav".to_string()]);
    assert_eq!(lines_of(&path), vec!["track_2.wav"]);
    assert!(!dir.path().join("tracks.txt.tmp").exists());

    // Unknown names are reported but still leave a clean log.
    assert!(!store.remove("track_1.wav").unwrap());

    let reloaded = TrackStore::load(&path, dir.path()).unwrap();
    assert_eq!(reloaded.names(), ["track_2.wav".to_string()]);
}
