use super::*;
use super::scan::{count_entries, track_file_name};
use std::fs;
use tempfile::tempdir;

#[test]
fn track_file_name_format() {
    assert_eq!(track_file_name(1), "track_1.wav");
    assert_eq!(track_file_name(42), "track_42.wav");
}

#[test]
fn next_track_name_counts_up_from_empty_dir() {
    let dir = tempdir().unwrap();

    let mut names = Vec::new();
    for _ in 0..3 {
        let name = next_track_name(dir.path()).unwrap();
        fs::write(dir.path().join(&name), b"RIFF").unwrap();
        names.push(name);
    }

    assert_eq!(names, vec!["track_1.wav", "track_2.wav", "track_3.wav"]);
}

#[test]
fn next_track_name_counts_every_entry() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), b"").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub").join("nested.wav"), b"").unwrap();

    assert_eq!(count_entries(dir.path()).unwrap(), 2);
    assert_eq!(next_track_name(dir.path()).unwrap(), "track_3.wav");
}

#[test]
fn next_track_name_skips_names_left_by_out_of_order_deletes() {
    let dir = tempdir().unwrap();
    for n in 1..=3 {
        fs::write(dir.path().join(track_file_name(n)), b"RIFF").unwrap();
    }
    fs::remove_file(dir.path().join("track_2.wav")).unwrap();

    // Two entries left, so the count-based name would be track_3.wav,
    // which still exists.
    assert_eq!(next_track_name(dir.path()).unwrap(), "track_4.wav");
}

#[test]
fn count_entries_fails_for_missing_dir() {
    let dir = tempdir().unwrap();
    assert!(count_entries(&dir.path().join("nope")).is_err());
}

#[test]
fn probe_tolerates_unreadable_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("track_1.wav"), b"not a real wav").unwrap();

    let track = probe(dir.path(), "track_1.wav");
    assert_eq!(track.name, "track_1.wav");
    assert_eq!(track.path, dir.path().join("track_1.wav"));
    assert_eq!(track.duration, None);
}
