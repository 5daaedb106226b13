use std::io;
use std::path::Path;

use lofty::prelude::AudioFile;
use walkdir::WalkDir;

use super::model::Track;

/// `track_<n>.wav`
pub fn track_file_name(n: usize) -> String {
    format!("track_{n}.wav")
}

/// Number of entries (files, directories, anything) directly inside `dir`.
pub fn count_entries(dir: &Path) -> io::Result<usize> {
    let mut count = 0;
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        entry.map_err(io::Error::from)?;
        count += 1;
    }
    Ok(count)
}

/// Pick the filename for the next generated track in `dir`.
///
/// Numbering starts at one past the number of entries in the directory. When
/// earlier tracks were deleted out of order that name can already be taken, in
/// which case the number is bumped until it is free.
pub fn next_track_name(dir: &Path) -> io::Result<String> {
    let mut n = count_entries(dir)? + 1;
    loop {
        let name = track_file_name(n);
        if !dir.join(&name).exists() {
            return Ok(name);
        }
        log::debug!("{name} already exists, trying the next number");
        n += 1;
    }
}

/// Build a `Track` for `name` inside `dir`, reading its duration when possible.
pub fn probe(dir: &Path, name: &str) -> Track {
    let path = dir.join(name);
    let duration = match lofty::read_from_path(&path) {
        Ok(tagged) => Some(tagged.properties().duration()),
        Err(e) => {
            log::debug!("could not read properties of {}: {e}", path.display());
            None
        }
    };

    Track {
        name: name.to_string(),
        path,
        duration,
    }
}
