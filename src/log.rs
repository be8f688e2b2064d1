// src/log.rs
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, time::Uptime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{Error, Result};

pub const LOG_FILE: &str = "affe_data.log";

/// Install the global subscriber.
///
/// Console gets `info` (override with `RUST_LOG`), the log file in `data_dir`
/// gets everything from this crate down to `debug`. Both stamp lines with the
/// time elapsed since start.
pub fn init(data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE))?;

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(Uptime::default())
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        );

    let to_file = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_timer(Uptime::default())
        .with_filter(EnvFilter::new("info,affe_data=debug"));

    tracing_subscriber::registry()
        .with(console)
        .with(to_file)
        .try_init()
        .map_err(|e| Error::Config(format!("logging already initialised: {e}")))
}
