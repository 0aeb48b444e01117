use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `KEYFORGE_LOG=keyforge=debug`
pub const LOG_ENV: &str = "KEYFORGE_LOG";

/// Install a file-backed subscriber when `KEYFORGE_LOG` is set.
///
/// The terminal belongs to the TUI, so nothing is ever written to stdout or
/// stderr. Returns whether logging was enabled.
pub fn init(path: &Path) -> io::Result<bool> {
    let Ok(filter) = std::env::var(LOG_ENV) else {
        return Ok(false);
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .is_ok();

    Ok(installed)
}
