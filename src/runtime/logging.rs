use std::fs::OpenOptions;
use std::path::Path;

use crate::config::LogSettings;

/// Send `log` records to the configured file.
///
/// The terminal belongs to the UI, so nothing is logged to stderr. An empty
/// `log.file` leaves logging off.
pub fn init(settings: &LogSettings) {
    let file = settings.file.trim();
    if file.is_empty() {
        return;
    }

    let path = Path::new(file);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("cadenza: cannot create log directory {}: {e}", parent.display());
            return;
        }
    }

    let target = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("cadenza: cannot open log file {}: {e}", path.display());
            return;
        }
    };

    let result = env_logger::Builder::new()
        .parse_filters(&settings.level)
        .target(env_logger::Target::Pipe(Box::new(target)))
        .try_init();
    if let Err(e) = result {
        eprintln!("cadenza: logging disabled: {e}");
    }
}
