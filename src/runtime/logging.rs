use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Settings;

/// Environment variable overriding `logging.level`.
const LOG_ENV: &str = "MEDLEY_LOG";

/// Install the file subscriber. The terminal belongs to the UI, so when no
/// log file can be opened logging stays off. Returns the file in use.
pub fn init(settings: &Settings) -> Option<PathBuf> {
    let path = settings.log_file()?;
    let file = match open_log(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("medley: logging disabled, cannot open {}: {e}", path.display());
            return None;
        }
    };

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .ok()?;
    Some(path)
}

fn open_log(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
