//! Log sinks of the training program.

use crate::common::*;
use std::{
    env,
    fs::{File, OpenOptions},
};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

pub const LOG_FILE_NAME: &str = "log.txt";

/// Installs the console and `log.txt` log sinks.
///
/// The filter comes from `RUST_LOG`, and defaults to the info level.
pub fn init_logging(output_dir: &Path) -> Result<()> {
    let log_file = Arc::new(open_log_file(output_dir)?);

    let filter_layer = {
        let filter = EnvFilter::from_default_env();
        if env::var("RUST_LOG").is_err() {
            filter.add_directive(LevelFilter::INFO.into())
        } else {
            filter
        }
    };
    let console_layer = fmt::layer().with_target(true).compact();
    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(log_file);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// Opens `log.txt` for appending, so resumed runs keep the earlier history.
pub fn open_log_file(output_dir: &Path) -> Result<File> {
    let log_path = output_dir.join(LOG_FILE_NAME);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file '{}'", log_path.display()))
}
